//! Intent in, bundle out.
//!
//! Stages run in a fixed order: expand, validate, estimate, analyze. Each
//! stage reads the intent and earlier outputs and writes only its own result.

use tracing::{debug, info};

use stratum_cost::{CostEstimator, PricingTable};
use stratum_iac::StructuralValidator;
use stratum_intent::{Intent, IntentSource};
use stratum_policy::SecurityAnalyzer;
use stratum_templates::TemplateEngine;

use crate::bundle::InfraBundle;
use crate::error::CoreResult;

/// The four components wired together.
pub struct Pipeline {
    engine: TemplateEngine,
    validator: StructuralValidator,
    estimator: CostEstimator,
    analyzer: SecurityAnalyzer,
}

impl Pipeline {
    /// Pipeline with built-in templates, rules and prices.
    pub fn new() -> CoreResult<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            validator: StructuralValidator::new(),
            estimator: CostEstimator::new(),
            analyzer: SecurityAnalyzer::new(),
        })
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.estimator = CostEstimator::with_pricing(pricing);
        self
    }

    pub fn with_analyzer(mut self, analyzer: SecurityAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn validator(&self) -> &StructuralValidator {
        &self.validator
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    pub fn analyzer(&self) -> &SecurityAnalyzer {
        &self.analyzer
    }

    /// Build the bundle for a normalized intent.
    ///
    /// Only a template defect is an error; an invalid configuration or a
    /// zero score still yields a full bundle.
    pub fn run(&self, intent: &Intent) -> CoreResult<InfraBundle> {
        info!(
            "Running pipeline: {} x{} {}, database {}",
            intent.architecture().as_str(),
            intent.app_count(),
            intent.app_stack(),
            intent.database()
        );

        let code = self.engine.expand(intent)?;
        debug!("Rendered fragments: {:?}", code.fragments);

        let validation = self.validator.validate(code.code());
        let cost = self.estimator.estimate(intent, validation.resource_count);
        let security = self.analyzer.analyze(intent, code.code());

        info!(
            "Pipeline complete: valid={}, {}, security {}",
            validation.valid,
            cost.format_total(),
            security.score
        );

        Ok(InfraBundle {
            intent: intent.clone(),
            code,
            validation,
            cost,
            security,
        })
    }

    /// Extract an intent from free text, then build its bundle.
    pub async fn run_description(
        &self,
        source: &dyn IntentSource,
        description: &str,
    ) -> CoreResult<InfraBundle> {
        debug!("Extracting intent with {}", source.name());
        let intent = source.produce_intent(description).await?;
        self.run(&intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_intent::{AppStack, Database};

    #[test]
    fn test_resource_count_reaches_cost() {
        let pipeline = Pipeline::new().unwrap();
        let intent = Intent::builder()
            .app_stack(AppStack::Golang)
            .database(Database::Mysql)
            .build();
        let bundle = pipeline.run(&intent).unwrap();

        assert!(bundle.validation.valid);
        assert_eq!(bundle.validation.resource_count, 12);
        assert!(bundle
            .cost
            .line_items
            .iter()
            .any(|i| i.specification == "12 declared resources"));
        assert_eq!(bundle.intent, intent);
    }

    #[test]
    fn test_pricing_override_applies() {
        let pricing = PricingTable {
            load_balancer_hourly: 0.0,
            ..PricingTable::default()
        };
        let pipeline = Pipeline::new().unwrap().with_pricing(pricing);
        let intent = Intent::builder().load_balancer(true).build();
        let bundle = pipeline.run(&intent).unwrap();

        assert_eq!(bundle.cost.line("Application Load Balancer (ALB)"), 0.0);
    }
}
