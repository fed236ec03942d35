//! Integration tests for template expansion.

use proptest::prelude::*;
use regex::Regex;

use stratum_intent::{
    AppStack, Architecture, Availability, Database, InstanceType, Intent, SecurityFeature,
};
use stratum_templates::TemplateEngine;

fn app_blocks(code: &str) -> Vec<String> {
    let re = Regex::new(r#"resource\s+"aws_instance"\s+"(app\d+)""#).unwrap();
    re.captures_iter(code).map(|c| c[1].to_string()).collect()
}

fn attachments(code: &str) -> Vec<String> {
    let re = Regex::new(r#"resource\s+"aws_lb_target_group_attachment"\s+"(app\d+)""#).unwrap();
    re.captures_iter(code).map(|c| c[1].to_string()).collect()
}

#[test]
fn test_two_tier_mysql_example() {
    let engine = TemplateEngine::new().unwrap();
    let intent = Intent::builder()
        .app_stack(AppStack::Golang)
        .database(Database::Mysql)
        .architecture(Architecture::TwoTier)
        .load_balancer(false)
        .app_count(1)
        .instance_type(InstanceType::T2Micro)
        .build();

    let artifact = engine.expand(&intent).unwrap();
    let code = artifact.code();

    assert_eq!(app_blocks(code), vec!["app1"]);
    assert_eq!(code.matches(r#"resource "aws_instance" "db""#).count(), 1);
    assert!(!code.contains(r#"resource "aws_lb""#));
    assert!(code.contains("dnf install -y golang git"));
    assert!(code.contains(r#"Engine = "mysql""#));
    assert_eq!(
        artifact.fragments,
        vec!["provider", "network", "compute", "database", "variables", "outputs"]
    );
}

#[test]
fn test_high_availability_binds_every_app() {
    let engine = TemplateEngine::new().unwrap();
    let intent = Intent::builder()
        .availability(Availability::High)
        .load_balancer(true)
        .app_count(2)
        .build();

    let code = engine.expand(&intent).unwrap().into_code();

    assert_eq!(app_blocks(&code), vec!["app1", "app2"]);
    assert_eq!(attachments(&code), vec!["app1", "app2"]);
    assert!(code.contains("target_id        = aws_instance.app1.id"));
    assert!(code.contains("target_id        = aws_instance.app2.id"));
    assert!(code.contains(r#"output "load_balancer_dns""#));
}

#[test]
fn test_outputs_follow_conditionals() {
    let engine = TemplateEngine::new().unwrap();
    let code = engine.expand(&Intent::default()).unwrap().into_code();

    assert!(code.contains(r#"output "vpc_id""#));
    assert!(code.contains("value       = [aws_instance.app1.public_ip]"));
    assert!(!code.contains("database_private_ip"));
    assert!(!code.contains("load_balancer_dns"));
    assert!(code.contains(r#"variable "admin_cidr""#));
}

#[test]
fn test_region_and_size_flow_into_variables() {
    let engine = TemplateEngine::new().unwrap();
    let intent = Intent::builder()
        .region("eu-central-1")
        .instance_type(InstanceType::T3Medium)
        .build();
    let code = engine.expand(&intent).unwrap().into_code();

    assert!(code.contains(r#"default     = "eu-central-1""#));
    assert!(code.contains(r#"default     = "t3.medium""#));
}

fn intent_strategy() -> impl Strategy<Value = Intent> {
    (
        prop::sample::select(AppStack::all()),
        prop::sample::select(Database::all()),
        any::<bool>(),
        any::<bool>(),
        1i64..=10,
        prop::sample::select(InstanceType::all()),
        any::<bool>(),
    )
        .prop_map(|(stack, database, lb, ha, count, size, encrypted)| {
            let mut builder = Intent::builder()
                .app_stack(stack)
                .database(database)
                .load_balancer(lb)
                .app_count(count)
                .instance_type(size);
            if ha {
                builder = builder.availability(Availability::High);
            }
            if encrypted {
                builder = builder.security_feature(SecurityFeature::Encryption);
            }
            builder.build()
        })
}

proptest! {
    #[test]
    fn expansion_is_pure(intent in intent_strategy()) {
        let engine = TemplateEngine::new().unwrap();
        let a = engine.expand(&intent).unwrap();
        let b = TemplateEngine::new().unwrap().expand(&intent.clone()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn one_app_block_per_instance(intent in intent_strategy()) {
        let engine = TemplateEngine::new().unwrap();
        let code = engine.expand(&intent).unwrap().into_code();
        prop_assert_eq!(app_blocks(&code), intent.app_ids());
    }

    #[test]
    fn three_tier_iff_load_balancer_bound(intent in intent_strategy()) {
        let engine = TemplateEngine::new().unwrap();
        let code = engine.expand(&intent).unwrap().into_code();

        let has_lb = code.contains(r#"resource "aws_lb" "main""#);
        let bound = attachments(&code) == intent.app_ids();
        prop_assert_eq!(intent.architecture() == Architecture::ThreeTier, has_lb && bound);
        if !has_lb {
            prop_assert!(attachments(&code).is_empty());
        }
    }

    #[test]
    fn braces_are_balanced(intent in intent_strategy()) {
        let engine = TemplateEngine::new().unwrap();
        let code = engine.expand(&intent).unwrap().into_code();
        prop_assert_eq!(code.matches('{').count(), code.matches('}').count());
    }
}
