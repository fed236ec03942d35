//! Security report types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Score at or above which posture is `Good`.
pub const GOOD_THRESHOLD: u8 = 80;
/// Score at or above which posture is `Moderate`.
pub const MODERATE_THRESHOLD: u8 = 60;

/// Kind of a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Positive,
    Warning,
    Negative,
    Info,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// One atomic observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub category: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl Finding {
    pub fn positive(category: &str, text: &str) -> Self {
        Self {
            kind: FindingKind::Positive,
            category: category.to_string(),
            text: text.to_string(),
            severity: None,
        }
    }

    pub fn new(kind: FindingKind, category: &str, text: &str, severity: Severity) -> Self {
        Self {
            kind,
            category: category.to_string(),
            text: text.to_string(),
            severity: Some(severity),
        }
    }
}

/// Overall posture band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityLevel {
    Good,
    Moderate,
    NeedsImprovement,
}

impl SecurityLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= GOOD_THRESHOLD {
            SecurityLevel::Good
        } else if score >= MODERATE_THRESHOLD {
            SecurityLevel::Moderate
        } else {
            SecurityLevel::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityLevel::Good => "Good",
            SecurityLevel::Moderate => "Moderate",
            SecurityLevel::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of analyzing one intent and its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityReport {
    /// Final score in `0..=100`.
    pub score: u8,
    /// Sum before clamping. Goes negative when deductions exceed 100.
    pub raw_score: i32,
    pub level: SecurityLevel,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    /// Rule id to pass/fail.
    pub compliance: BTreeMap<String, bool>,
}

impl SecurityReport {
    /// Build a report from the unclamped score. Clamping happens here only.
    pub fn from_raw(
        raw_score: i32,
        findings: Vec<Finding>,
        recommendations: Vec<String>,
        compliance: BTreeMap<String, bool>,
    ) -> Self {
        let score = raw_score.clamp(0, 100) as u8;
        Self {
            score,
            raw_score,
            level: SecurityLevel::from_score(score),
            findings,
            recommendations,
            compliance,
        }
    }

    pub fn passed(&self, check: &str) -> Option<bool> {
        self.compliance.get(check).copied()
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}
