//! The assembled pipeline output.

use serde::{Deserialize, Serialize};

use stratum_cost::CostEstimate;
use stratum_iac::ValidationResult;
use stratum_intent::Intent;
use stratum_policy::SecurityReport;
use stratum_templates::GeneratedArtifact;

use crate::error::{CoreError, CoreResult};

/// Everything produced for one intent.
///
/// The four results are independent of each other apart from the resource
/// count that validation hands to cost estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfraBundle {
    pub intent: Intent,
    pub code: GeneratedArtifact,
    pub validation: ValidationResult,
    pub cost: CostEstimate,
    pub security: SecurityReport,
}

impl InfraBundle {
    /// Terraform text.
    pub fn code(&self) -> &str {
        self.code.code()
    }

    /// Report without the code, for writing next to `main.tf`.
    pub fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "intent": self.intent,
            "fragments": self.code.fragments,
            "validation": self.validation,
            "cost": self.cost,
            "security": self.security,
        })
    }

    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CoreError::Serialization(e.to_string()))
    }

    pub fn report_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(&self.report())
            .map_err(|e| CoreError::Serialization(e.to_string()))
    }
}
