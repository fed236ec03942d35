//! Security rules.
//!
//! Each rule inspects the intent and a [`CodeScan`] and returns a
//! [`Verdict`]. The rule itself carries the deduction and the text of every
//! finding it can produce, so the analyzer holds no per-rule logic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use stratum_iac::{CodeScan, ResourceBlock};
use stratum_intent::{Availability, Intent};

use crate::analyzer::BASE_SCORE;
use crate::error::{PolicyError, PolicyResult};
use crate::report::{FindingKind, Severity};

/// Outcome of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
    /// The rule does not apply to this intent. Reported as compliant.
    NotApplicable,
}

impl Verdict {
    fn from_pass(pass: bool) -> Self {
        if pass {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// A security rule.
#[derive(Debug, Clone, Copy)]
pub struct SecurityRule {
    /// Compliance key.
    pub id: &'static str,
    pub category: &'static str,
    pub deduction: i32,
    pub failure_kind: FindingKind,
    pub severity: Severity,
    pub failure: &'static str,
    pub positive: Option<&'static str>,
    pub recommendation: &'static str,
    pub check: fn(&Intent, &CodeScan<'_>) -> Verdict,
}

/// The built-in rule table, in evaluation order.
pub const SECURITY_RULES: &[SecurityRule] = &[
    SecurityRule {
        id: "network_isolation",
        category: "Network Isolation",
        deduction: 20,
        failure_kind: FindingKind::Negative,
        severity: Severity::High,
        failure: "No VPC configured - resources exposed to the default network",
        positive: Some("VPC is configured for network isolation"),
        recommendation: "Configure a VPC for network isolation",
        check: |_, scan| Verdict::from_pass(scan.has_network_isolation()),
    },
    SecurityRule {
        id: "security_groups",
        category: "Network Security",
        deduction: 30,
        failure_kind: FindingKind::Negative,
        severity: Severity::High,
        failure: "No security groups defined",
        positive: Some("Security groups are configured"),
        recommendation: "Define security groups to restrict access",
        check: |_, scan| Verdict::from_pass(scan.has_security_group()),
    },
    SecurityRule {
        id: "no_open_admin_ports",
        category: "Network Security",
        deduction: 10,
        failure_kind: FindingKind::Warning,
        severity: Severity::Medium,
        failure: "Security group exposes SSH or RDP to 0.0.0.0/0",
        positive: None,
        recommendation: "Restrict administrative ports to a known CIDR block",
        check: |_, scan| Verdict::from_pass(scan.open_admin_ingress().is_empty()),
    },
    SecurityRule {
        id: "database_isolated",
        category: "Database Placement",
        deduction: 15,
        failure_kind: FindingKind::Warning,
        severity: Severity::High,
        failure: "Database not placed in a private subnet",
        positive: Some("Database placed in private subnet"),
        recommendation: "Place databases in private subnets and restrict access",
        check: database_isolated,
    },
    SecurityRule {
        id: "no_hardcoded_credentials",
        category: "Credentials",
        deduction: 25,
        failure_kind: FindingKind::Negative,
        severity: Severity::High,
        failure: "Hardcoded credentials or secrets detected",
        positive: None,
        recommendation: "Use Secrets Manager or SSM Parameter Store for credentials",
        check: |_, scan| Verdict::from_pass(scan.literal_credentials().is_empty()),
    },
    SecurityRule {
        id: "encryption",
        category: "Encryption",
        deduction: 10,
        failure_kind: FindingKind::Warning,
        severity: Severity::Medium,
        failure: "No encryption or KMS usage detected",
        positive: None,
        recommendation: "Enable encryption at rest and use KMS for keys",
        check: |_, scan| Verdict::from_pass(scan.has_encryption()),
    },
    SecurityRule {
        id: "load_balancer_tls",
        category: "Load Balancer",
        deduction: 5,
        failure_kind: FindingKind::Warning,
        severity: Severity::Medium,
        failure: "Load balancer configured without TLS",
        positive: None,
        recommendation: "Enable TLS on the load balancer for secure traffic",
        check: |intent, scan| {
            if !intent.load_balancer() {
                Verdict::NotApplicable
            } else {
                Verdict::from_pass(scan.has_tls())
            }
        },
    },
    SecurityRule {
        id: "redundancy",
        category: "Availability",
        deduction: 0,
        failure_kind: FindingKind::Info,
        severity: Severity::Info,
        failure: "Standard availability: a single instance failure causes downtime",
        positive: Some("Multiple instances provide redundancy"),
        recommendation: "Use high availability for production workloads",
        check: |intent, _| Verdict::from_pass(intent.availability() == Availability::High),
    },
];

/// Resource types that hold data.
const DATABASE_TYPES: &[&str] = &[
    "aws_db_instance",
    "aws_rds_cluster",
    "aws_docdb_cluster",
    "aws_elasticache_cluster",
    "aws_elasticache_replication_group",
];

fn is_database_block(block: &ResourceBlock<'_>) -> bool {
    DATABASE_TYPES.contains(&block.resource_type)
        || (block.resource_type == "aws_instance"
            && (block.name == "db" || block.name.contains("database")))
}

fn database_isolated(intent: &Intent, scan: &CodeScan<'_>) -> Verdict {
    if !intent.has_database() {
        return Verdict::NotApplicable;
    }
    let mut blocks = scan.resources().iter().filter(|b| is_database_block(b)).peekable();
    if blocks.peek().is_none() {
        return Verdict::Fail;
    }
    Verdict::from_pass(blocks.all(|b| b.body.to_lowercase().contains("private")))
}

/// Adjustments to the built-in table, loaded from YAML.
///
/// ```yaml
/// disabled:
///   - redundancy
/// deductions:
///   encryption: 20
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOverrides {
    pub disabled: BTreeSet<String>,
    pub deductions: BTreeMap<String, i32>,
}

impl RuleOverrides {
    pub fn from_yaml(yaml: &str) -> PolicyResult<Self> {
        serde_yaml::from_str(yaml).map_err(PolicyError::from)
    }

    pub fn from_file(path: &Path) -> PolicyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Apply to a rule table. Unknown ids and deductions outside
    /// `0..=BASE_SCORE` are rejected.
    pub fn apply(&self, rules: &[SecurityRule]) -> PolicyResult<Vec<SecurityRule>> {
        let known = |id: &String| rules.iter().any(|r| r.id == id.as_str());
        if let Some(id) = self
            .disabled
            .iter()
            .chain(self.deductions.keys())
            .find(|id| !known(id))
        {
            return Err(PolicyError::UnknownRule(id.clone()));
        }
        if let Some((id, value)) = self
            .deductions
            .iter()
            .find(|(_, v)| !(0..=BASE_SCORE).contains(*v))
        {
            return Err(PolicyError::InvalidConfiguration(format!(
                "deduction for {} must be between 0 and {}, got {}",
                id, BASE_SCORE, value
            )));
        }

        Ok(rules
            .iter()
            .filter(|r| !self.disabled.contains(r.id))
            .map(|r| {
                let mut rule = *r;
                if let Some(deduction) = self.deductions.get(r.id) {
                    rule.deduction = *deduction;
                }
                rule
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_intent::Database;

    fn verdict(id: &str, intent: &Intent, code: &str) -> Verdict {
        let rule = SECURITY_RULES.iter().find(|r| r.id == id).unwrap();
        (rule.check)(intent, &CodeScan::new(code))
    }

    #[test]
    fn test_total_deductions() {
        let total: i32 = SECURITY_RULES.iter().map(|r| r.deduction).sum();
        assert_eq!(total, 115);
    }

    #[test]
    fn test_database_rule_needs_database() {
        assert_eq!(
            verdict("database_isolated", &Intent::default(), ""),
            Verdict::NotApplicable
        );

        let intent = Intent::builder().database(Database::Mysql).build();
        assert_eq!(verdict("database_isolated", &intent, ""), Verdict::Fail);

        let public = "resource \"aws_instance\" \"db\" {\n  subnet_id = aws_subnet.public_a.id\n}\n";
        assert_eq!(verdict("database_isolated", &intent, public), Verdict::Fail);

        let private = "resource \"aws_instance\" \"db\" {\n  subnet_id = aws_subnet.private.id\n}\n";
        assert_eq!(verdict("database_isolated", &intent, private), Verdict::Pass);
    }

    #[test]
    fn test_private_marker_elsewhere_does_not_count() {
        let intent = Intent::builder().database(Database::Postgresql).build();
        let code = r#"
resource "aws_subnet" "private" {
  cidr_block = "10.0.10.0/24"
}

resource "aws_db_instance" "main" {
  db_subnet_group_name = "public"
}
"#;
        assert_eq!(verdict("database_isolated", &intent, code), Verdict::Fail);
    }

    #[test]
    fn test_tls_only_checked_with_load_balancer() {
        assert_eq!(
            verdict("load_balancer_tls", &Intent::default(), ""),
            Verdict::NotApplicable
        );
        let intent = Intent::builder().load_balancer(true).build();
        assert_eq!(verdict("load_balancer_tls", &intent, "port = 80"), Verdict::Fail);
        assert_eq!(verdict("load_balancer_tls", &intent, "port = 443"), Verdict::Pass);
    }

    #[test]
    fn test_overrides() {
        let overrides = RuleOverrides::from_yaml("disabled: [redundancy]\ndeductions:\n  encryption: 20\n").unwrap();
        let rules = overrides.apply(SECURITY_RULES).unwrap();

        assert_eq!(rules.len(), SECURITY_RULES.len() - 1);
        assert!(rules.iter().all(|r| r.id != "redundancy"));
        assert_eq!(rules.iter().find(|r| r.id == "encryption").unwrap().deduction, 20);
    }

    #[test]
    fn test_overrides_reject_unknown_and_negative() {
        let unknown = RuleOverrides::from_yaml("disabled: [firewall]\n").unwrap();
        assert!(matches!(unknown.apply(SECURITY_RULES), Err(PolicyError::UnknownRule(id)) if id == "firewall"));

        let negative = RuleOverrides::from_yaml("deductions:\n  encryption: -5\n").unwrap();
        assert!(matches!(
            negative.apply(SECURITY_RULES),
            Err(PolicyError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_overrides_reject_deduction_above_base_score() {
        let within = RuleOverrides::from_yaml("deductions:\n  encryption: 100\n").unwrap();
        assert!(within.apply(SECURITY_RULES).is_ok());

        let huge = RuleOverrides::from_yaml(
            "deductions:\n  network_isolation: 2147483647\n  security_groups: 2147483647\n",
        )
        .unwrap();
        assert!(matches!(
            huge.apply(SECURITY_RULES),
            Err(PolicyError::InvalidConfiguration(msg)) if msg.contains("between 0 and 100")
        ));
    }
}
