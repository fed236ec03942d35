//! Structural validation of Terraform code.
//!
//! Validation is a fixed, ordered table of [`StructuralRule`]s. Every rule
//! runs on every input; an `Error` rule firing makes the result invalid,
//! `Warning` and `Info` rules only add advice.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{IacError, IacResult};
use crate::scan::CodeScan;

/// Rule severity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
}

/// One structural check. `check` returns the message when the rule fires.
#[derive(Debug, Clone, Copy)]
pub struct StructuralRule {
    pub id: &'static str,
    pub severity: RuleSeverity,
    pub check: fn(&CodeScan<'_>) -> Option<String>,
}

/// Validation result with details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
    pub resource_count: usize,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            resource_count: 0,
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_suggestion(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    fn record(&mut self, severity: RuleSeverity, message: String) {
        match severity {
            RuleSeverity::Error => self.add_error(message),
            RuleSeverity::Warning => self.add_warning(message),
            RuleSeverity::Info => self.add_suggestion(message),
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in rule table, in evaluation order.
pub const STRUCTURAL_RULES: &[StructuralRule] = &[
    StructuralRule {
        id: "terraform-block",
        severity: RuleSeverity::Error,
        check: missing_terraform_block,
    },
    StructuralRule {
        id: "provider",
        severity: RuleSeverity::Error,
        check: missing_provider,
    },
    StructuralRule {
        id: "resources",
        severity: RuleSeverity::Error,
        check: missing_resources,
    },
    StructuralRule {
        id: "braces",
        severity: RuleSeverity::Error,
        check: unmatched_braces,
    },
    StructuralRule {
        id: "security-groups",
        severity: RuleSeverity::Warning,
        check: missing_security_group,
    },
    StructuralRule {
        id: "network-isolation",
        severity: RuleSeverity::Warning,
        check: missing_network_isolation,
    },
    StructuralRule {
        id: "hardcoded-credentials",
        severity: RuleSeverity::Warning,
        check: hardcoded_credentials,
    },
    StructuralRule {
        id: "variables",
        severity: RuleSeverity::Warning,
        check: missing_variables,
    },
    StructuralRule {
        id: "free-tier",
        severity: RuleSeverity::Info,
        check: free_tier_size,
    },
    StructuralRule {
        id: "resource-count",
        severity: RuleSeverity::Info,
        check: resource_summary,
    },
    StructuralRule {
        id: "deletion-protection",
        severity: RuleSeverity::Info,
        check: deletion_protection,
    },
];

fn missing_terraform_block(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.has_terraform_block()).then(|| "Missing terraform block".to_string())
}

fn missing_provider(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.has_provider()).then(|| "Missing provider configuration".to_string())
}

fn missing_resources(scan: &CodeScan<'_>) -> Option<String> {
    (scan.resource_count() == 0).then(|| "No resources defined".to_string())
}

fn unmatched_braces(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.braces_balanced()).then(|| {
        format!(
            "Unmatched braces: {} opening, {} closing",
            scan.open_braces(),
            scan.close_braces()
        )
    })
}

fn missing_security_group(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.has_security_group())
        .then(|| "No security groups found - consider adding network security".to_string())
}

fn missing_network_isolation(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.has_network_isolation())
        .then(|| "No VPC found - consider using VPC for network isolation".to_string())
}

fn hardcoded_credentials(scan: &CodeScan<'_>) -> Option<String> {
    let keys = scan.literal_credentials();
    (!keys.is_empty()).then(|| {
        format!(
            "Hardcoded credentials detected ({}) - use variables or a secrets manager",
            keys.join(", ")
        )
    })
}

fn missing_variables(scan: &CodeScan<'_>) -> Option<String> {
    (!scan.has_variables()).then(|| "No variable blocks found".to_string())
}

fn free_tier_size(scan: &CodeScan<'_>) -> Option<String> {
    let sizes = scan.free_tier_sizes();
    (!sizes.is_empty()).then(|| {
        format!(
            "Using {} instance type (free tier eligible)",
            sizes.join(", ")
        )
    })
}

fn resource_summary(scan: &CodeScan<'_>) -> Option<String> {
    let count = scan.resource_count();
    (count > 0).then(|| format!("Defines {} resource blocks", count))
}

fn deletion_protection(scan: &CodeScan<'_>) -> Option<String> {
    scan.deletion_protection_disabled()
        .then(|| "Consider enabling deletion protection for production".to_string())
}

/// Pattern-based Terraform validator.
pub struct StructuralValidator {
    rules: Vec<StructuralRule>,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self {
            rules: STRUCTURAL_RULES.to_vec(),
        }
    }

    pub fn with_rules(rules: Vec<StructuralRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[StructuralRule] {
        &self.rules
    }

    /// Validate code text. Never fails; every rule runs.
    pub fn validate(&self, code: &str) -> ValidationResult {
        let scan = CodeScan::new(code);
        let mut result = ValidationResult::new();
        result.resource_count = scan.resource_count();

        for rule in &self.rules {
            if let Some(message) = (rule.check)(&scan) {
                debug!("Rule {} fired: {}", rule.id, message);
                result.record(rule.severity, message);
            }
        }

        info!(
            "Validated {} resources: {} errors, {} warnings",
            result.resource_count,
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    /// Validate every `.tf` file under a directory as one configuration.
    pub fn validate_dir(&self, dir: &Path) -> IacResult<ValidationResult> {
        if !dir.is_dir() {
            return Err(IacError::NotFound(dir.to_path_buf()));
        }

        let mut code = String::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tf"))
        {
            debug!("Reading {:?}", entry.path());
            code.push_str(&fs::read_to_string(entry.path())?);
            code.push('\n');
        }

        if code.is_empty() {
            return Err(IacError::NoConfiguration(dir.to_path_buf()));
        }
        Ok(self.validate(&code))
    }
}
