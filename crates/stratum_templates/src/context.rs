//! Template context derived from an intent.

use serde::Serialize;
use tera::Context;

use stratum_intent::{Intent, SecurityFeature};

use crate::bootstrap::{app_bootstrap, database_setup};
use crate::error::{TemplateError, TemplateResult};

/// One application instance as seen by the templates.
#[derive(Debug, Clone, Serialize)]
pub struct AppInstance {
    /// Stable identifier, `app1`..`appN`.
    pub id: String,
    pub index: u32,
    /// Public subnet the instance lands in; alternates across zones.
    pub subnet: &'static str,
}

/// Every value a fragment may reference.
///
/// A pure function of the intent: equal intents give equal contexts.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    pub cloud: &'static str,
    pub provider_source: &'static str,
    pub region: String,
    pub architecture: &'static str,
    pub availability: &'static str,
    pub instance_type: &'static str,
    pub app_count: u32,
    pub app_stack: &'static str,
    pub app_port: u16,
    pub apps: Vec<AppInstance>,
    pub bootstrap: Vec<String>,
    pub encryption: bool,
    pub has_database: bool,
    pub database: &'static str,
    pub db_port: u16,
    pub db_setup: Vec<String>,
    pub load_balancer: bool,
}

impl TemplateContext {
    pub fn from_intent(intent: &Intent) -> Self {
        let apps = (1..=intent.app_count())
            .map(|index| AppInstance {
                id: format!("app{}", index),
                index,
                subnet: if index % 2 == 1 { "public_a" } else { "public_b" },
            })
            .collect();

        Self {
            cloud: intent.cloud().as_str(),
            provider_source: intent.cloud().provider_source(),
            region: intent.region().to_string(),
            architecture: intent.architecture().as_str(),
            availability: intent.availability().as_str(),
            instance_type: intent.instance_type().as_str(),
            app_count: intent.app_count(),
            app_stack: intent.app_stack().as_str(),
            app_port: intent.app_stack().app_port(),
            apps,
            bootstrap: app_bootstrap(intent.app_stack()),
            encryption: intent.has_feature(SecurityFeature::Encryption),
            has_database: intent.has_database(),
            database: intent.database().as_str(),
            db_port: intent.database().port().unwrap_or(0),
            db_setup: database_setup(intent.database()),
            load_balancer: intent.load_balancer(),
        }
    }

    /// Convert into a tera context.
    pub fn to_tera(&self) -> TemplateResult<Context> {
        Context::from_serialize(self).map_err(|e| TemplateError::Context(TemplateError::describe(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_intent::{AppStack, Database};

    #[test]
    fn test_apps_alternate_subnets() {
        let intent = Intent::builder().app_count(3).build();
        let ctx = TemplateContext::from_intent(&intent);

        let ids: Vec<_> = ctx.apps.iter().map(|a| a.id.as_str()).collect();
        let subnets: Vec<_> = ctx.apps.iter().map(|a| a.subnet).collect();
        assert_eq!(ids, vec!["app1", "app2", "app3"]);
        assert_eq!(subnets, vec!["public_a", "public_b", "public_a"]);
    }

    #[test]
    fn test_database_fields() {
        let intent = Intent::builder()
            .app_stack(AppStack::Python)
            .database(Database::Postgresql)
            .build();
        let ctx = TemplateContext::from_intent(&intent);

        assert!(ctx.has_database);
        assert_eq!(ctx.db_port, 5432);
        assert_eq!(ctx.app_port, 8000);
        assert!(!ctx.db_setup.is_empty());
    }

    #[test]
    fn test_context_serializes() {
        let ctx = TemplateContext::from_intent(&Intent::default());
        let tera_ctx = ctx.to_tera().unwrap();
        assert!(tera_ctx.contains_key("apps"));
        assert!(tera_ctx.contains_key("load_balancer"));
    }
}
