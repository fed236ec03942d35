//! Integration tests for structural validation.

use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;

use stratum_iac::{CodeScan, IacError, StructuralValidator};
use stratum_intent::{AppStack, Database, Intent};
use stratum_templates::TemplateEngine;

fn generate(intent: &Intent) -> String {
    TemplateEngine::new().unwrap().expand(intent).unwrap().into_code()
}

#[test]
fn test_generated_two_tier_is_valid() {
    let intent = Intent::builder()
        .app_stack(AppStack::Golang)
        .database(Database::Mysql)
        .app_count(1)
        .build();
    let result = StructuralValidator::new().validate(&generate(&intent));

    assert!(result.valid, "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    // Nine network resources, one app, the db security group and the db host.
    assert_eq!(result.resource_count, 12);
    assert!(result
        .suggestions
        .contains(&"Using t2.micro instance type (free tier eligible)".to_string()));
}

#[test]
fn test_generated_load_balancer_suggests_deletion_protection() {
    let intent = Intent::builder().load_balancer(true).app_count(2).build();
    let result = StructuralValidator::new().validate(&generate(&intent));

    assert!(result.valid);
    assert_eq!(result.resource_count, 16);
    assert!(result
        .suggestions
        .iter()
        .any(|s| s.contains("deletion protection")));
}

#[test]
fn test_generated_code_has_no_literal_credentials() {
    for database in Database::all() {
        let intent = Intent::builder().database(database).build();
        let code = generate(&intent);
        assert!(CodeScan::new(&code).literal_credentials().is_empty());
        assert!(CodeScan::new(&code).open_admin_ingress().is_empty());
    }
}

#[test]
fn test_validate_dir_concatenates_files() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("main.tf"),
        "terraform {\n}\nprovider \"aws\" {\n}\nresource \"aws_vpc\" \"main\" {\n}\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("security.tf"),
        "resource \"aws_security_group\" \"app\" {\n  vpc_id = aws_vpc.main.id\n}\n",
    )
    .unwrap();
    fs::write(dir.path().join("variables.tf"), "variable \"region\" {\n}\n").unwrap();
    fs::write(dir.path().join("README.md"), "{{{").unwrap();

    let result = StructuralValidator::new().validate_dir(dir.path()).unwrap();
    assert!(result.valid, "{:?}", result.errors);
    assert_eq!(result.resource_count, 2);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_dir_errors() {
    let dir = tempdir().unwrap();
    let validator = StructuralValidator::new();

    let err = validator.validate_dir(dir.path()).unwrap_err();
    assert!(matches!(err, IacError::NoConfiguration(_)));

    let err = validator.validate_dir(&dir.path().join("missing")).unwrap_err();
    assert!(matches!(err, IacError::NotFound(_)));
}

#[test]
fn test_stray_closing_brace_is_fatal() {
    let mut code = generate(&Intent::default());
    code.push_str("}\n");
    let result = StructuralValidator::new().validate(&code);

    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Unmatched braces"));
}

proptest! {
    #[test]
    fn validate_never_panics(code in "\\PC{0,400}") {
        let result = StructuralValidator::new().validate(&code);
        prop_assert_eq!(result.valid, result.errors.is_empty());
    }

    #[test]
    fn resource_count_matches_declarations(n in 0usize..20) {
        let code: String = (0..n)
            .map(|i| format!("resource \"aws_instance\" \"app{}\" {{\n}}\n", i))
            .collect();
        prop_assert_eq!(StructuralValidator::new().validate(&code).resource_count, n);
    }
}
