//! Security analyzer.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use stratum_iac::CodeScan;
use stratum_intent::Intent;

use crate::error::PolicyResult;
use crate::report::{Finding, SecurityReport};
use crate::rules::{RuleOverrides, SecurityRule, Verdict, SECURITY_RULES};

/// Starting score before deductions.
pub const BASE_SCORE: i32 = 100;

/// Scores an intent and its generated code against an ordered rule table.
#[derive(Debug, Clone)]
pub struct SecurityAnalyzer {
    rules: Vec<SecurityRule>,
}

impl Default for SecurityAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityAnalyzer {
    pub fn new() -> Self {
        Self {
            rules: SECURITY_RULES.to_vec(),
        }
    }

    pub fn with_rules(rules: Vec<SecurityRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules adjusted by `overrides`.
    pub fn with_overrides(overrides: &RuleOverrides) -> PolicyResult<Self> {
        Ok(Self::with_rules(overrides.apply(SECURITY_RULES)?))
    }

    /// Built-in rules, adjusted by the overrides file when one is given.
    pub fn load(path: Option<&Path>) -> PolicyResult<Self> {
        match path {
            Some(path) => {
                let analyzer = Self::with_overrides(&RuleOverrides::from_file(path)?)?;
                info!("Loaded security rule overrides from {:?}", path);
                Ok(analyzer)
            }
            None => Ok(Self::new()),
        }
    }

    pub fn rules(&self) -> &[SecurityRule] {
        &self.rules
    }

    /// Run every rule once, in order, then clamp.
    pub fn analyze(&self, intent: &Intent, code: &str) -> SecurityReport {
        let scan = CodeScan::new(code);
        let mut raw_score = BASE_SCORE;
        let mut findings = Vec::new();
        let mut recommendations = Vec::new();
        let mut compliance = BTreeMap::new();

        for rule in &self.rules {
            let verdict = (rule.check)(intent, &scan);
            debug!("Security rule {}: {:?}", rule.id, verdict);

            match verdict {
                Verdict::Pass => {
                    if let Some(text) = rule.positive {
                        findings.push(Finding::positive(rule.category, text));
                    }
                }
                Verdict::Fail => {
                    findings.push(Finding::new(
                        rule.failure_kind,
                        rule.category,
                        rule.failure,
                        rule.severity,
                    ));
                    if rule.deduction > 0 {
                        raw_score = raw_score.saturating_sub(rule.deduction);
                        recommendations.push(rule.recommendation.to_string());
                    }
                }
                Verdict::NotApplicable => {}
            }
            compliance.insert(rule.id.to_string(), verdict != Verdict::Fail);
        }

        let report = SecurityReport::from_raw(raw_score, findings, recommendations, compliance);
        info!(
            "Security score {} ({}), raw {}",
            report.score, report.level, report.raw_score
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FindingKind, SecurityLevel};
    use stratum_intent::{Availability, Database};

    const HARDENED: &str = r#"
resource "aws_vpc" "main" {
  cidr_block = "10.0.0.0/16"
}

resource "aws_security_group" "app" {
  vpc_id = aws_vpc.main.id

  ingress {
    from_port   = 22
    to_port     = 22
    cidr_blocks = [var.admin_cidr]
  }
}

resource "aws_instance" "app1" {
  root_block_device {
    encrypted = true
  }
}
"#;

    #[test]
    fn test_hardened_code_scores_full() {
        let intent = Intent::builder().availability(Availability::High).build();
        let report = SecurityAnalyzer::new().analyze(&intent, HARDENED);

        assert_eq!(report.score, 100);
        assert_eq!(report.raw_score, 100);
        assert_eq!(report.level, SecurityLevel::Good);
        assert!(report.recommendations.is_empty());
        assert!(report.compliance.values().all(|v| *v));
        assert_eq!(report.compliance.len(), SECURITY_RULES.len());
    }

    #[test]
    fn test_standard_availability_is_informational() {
        let report = SecurityAnalyzer::new().analyze(&Intent::default(), HARDENED);

        assert_eq!(report.score, 100);
        assert_eq!(report.passed("redundancy"), Some(false));
        assert_eq!(report.findings_of(FindingKind::Info).count(), 1);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_every_deduction_fires() {
        let intent = Intent::builder()
            .database(Database::Mysql)
            .load_balancer(true)
            .build();
        let code = r#"
resource "aws_lb" "main" {
  ingress {
    from_port   = 22
    cidr_blocks = ["0.0.0.0/0"]
  }
  password = "hunter2"
}
"#;
        let report = SecurityAnalyzer::new().analyze(&intent, code);

        assert_eq!(report.raw_score, -15);
        assert_eq!(report.score, 0);
        assert_eq!(report.level, SecurityLevel::NeedsImprovement);
        assert_eq!(report.recommendations.len(), 7);
        assert_eq!(report.recommendations[0], "Configure a VPC for network isolation");
        assert_eq!(report.compliance.values().filter(|v| !**v).count(), 8);
    }

    #[test]
    fn test_disabled_rule_is_absent_from_compliance() {
        let overrides = RuleOverrides::from_yaml("disabled: [encryption]\n").unwrap();
        let analyzer = SecurityAnalyzer::with_overrides(&overrides).unwrap();
        let report = analyzer.analyze(&Intent::default(), "resource \"aws_vpc\" \"main\" {}");

        assert_eq!(report.passed("encryption"), None);
        // security_groups only
        assert_eq!(report.raw_score, 70);
    }

    #[test]
    fn test_oversized_deductions_saturate() {
        let rules = SECURITY_RULES
            .iter()
            .map(|r| SecurityRule {
                deduction: i32::MAX,
                ..*r
            })
            .collect();
        let report = SecurityAnalyzer::with_rules(rules).analyze(&Intent::default(), "");

        assert_eq!(report.raw_score, i32::MIN);
        assert_eq!(report.score, 0);
    }
}
