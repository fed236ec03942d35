//! Template expansion: intent in, Terraform text out.

use serde::{Deserialize, Serialize};
use tera::Tera;
use tracing::{debug, info};

use stratum_intent::Intent;

use crate::context::TemplateContext;
use crate::error::{TemplateError, TemplateResult};
use crate::fragments::{builtin_fragments, Fragment};

/// Terraform configuration rendered from one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// The configuration text.
    pub code: String,
    /// Fragments rendered, in order.
    pub fragments: Vec<String>,
}

impl GeneratedArtifact {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

impl std::fmt::Display for GeneratedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

/// Renders intents through a fixed, ordered fragment set.
pub struct TemplateEngine {
    tera: Tera,
    fragments: Vec<Fragment>,
}

impl TemplateEngine {
    /// Create an engine over the built-in fragments.
    pub fn new() -> TemplateResult<Self> {
        Self::with_fragments(builtin_fragments())
    }

    /// Create an engine over a custom fragment set.
    ///
    /// Every fragment is parsed up front; a syntax error surfaces here rather
    /// than on first render.
    pub fn with_fragments(fragments: Vec<Fragment>) -> TemplateResult<Self> {
        let mut tera = Tera::default();
        for fragment in &fragments {
            tera.add_raw_template(&fragment.template_name(), fragment.source)
                .map_err(|e| TemplateError::InvalidTemplate {
                    name: fragment.name.to_string(),
                    message: TemplateError::describe(&e),
                })?;
        }
        debug!("Registered {} template fragments", fragments.len());
        Ok(Self { tera, fragments })
    }

    /// Names of all registered fragments, in render order.
    pub fn fragment_names(&self) -> Vec<&'static str> {
        self.fragments.iter().map(|f| f.name).collect()
    }

    /// Render every applicable fragment and join them.
    ///
    /// Fails only when a fragment references something the context does not
    /// define.
    pub fn expand(&self, intent: &Intent) -> TemplateResult<GeneratedArtifact> {
        let context = TemplateContext::from_intent(intent).to_tera()?;

        let mut sections = Vec::new();
        let mut rendered = Vec::new();
        for fragment in self.fragments.iter().filter(|f| f.applies(intent)) {
            let text = self.render(fragment, &context)?;
            sections.push(text.trim().to_string());
            rendered.push(fragment.name.to_string());
        }

        let mut code = sections.join("\n\n");
        code.push('\n');

        info!(
            "Expanded intent into {} fragments ({} bytes)",
            rendered.len(),
            code.len()
        );

        Ok(GeneratedArtifact {
            code,
            fragments: rendered,
        })
    }

    /// Render a single fragment regardless of its guard.
    pub fn render_fragment(&self, name: &str, intent: &Intent) -> TemplateResult<String> {
        let fragment = self
            .fragments
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        let context = TemplateContext::from_intent(intent).to_tera()?;
        self.render(fragment, &context)
    }

    fn render(&self, fragment: &Fragment, context: &tera::Context) -> TemplateResult<String> {
        debug!("Rendering fragment {}", fragment.name);
        self.tera
            .render(&fragment.template_name(), context)
            .map_err(|e| {
                TemplateError::RenderingFailed(format!(
                    "{}: {}",
                    fragment.name,
                    TemplateError::describe(&e)
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_intent::{Database, SecurityFeature};

    fn count(code: &str, needle: &str) -> usize {
        code.matches(needle).count()
    }

    #[test]
    fn test_network_fragment_in_isolation() {
        let engine = TemplateEngine::new().unwrap();
        let text = engine.render_fragment("network", &Intent::default()).unwrap();

        assert!(text.contains(r#"resource "aws_vpc" "main""#));
        assert!(text.contains(r#"resource "aws_subnet" "private""#));
        assert!(text.contains(r#"resource "aws_security_group" "app""#));
        assert!(text.contains(r#"resource "aws_internet_gateway" "main""#));
    }

    #[test]
    fn test_compute_fragment_loops_over_apps() {
        let engine = TemplateEngine::new().unwrap();
        let intent = Intent::builder().app_count(3).build();
        let text = engine.render_fragment("compute", &intent).unwrap();

        assert_eq!(count(&text, r#"resource "aws_instance" "app"#), 3);
        assert!(text.contains(r#""app3""#));
        assert!(!text.contains("root_block_device"));
    }

    #[test]
    fn test_encryption_adds_encrypted_volumes() {
        let engine = TemplateEngine::new().unwrap();
        let intent = Intent::builder()
            .database(Database::Mysql)
            .security_feature(SecurityFeature::Encryption)
            .build();
        let artifact = engine.expand(&intent).unwrap();

        assert_eq!(count(&artifact.code, "encrypted   = true"), 2);
    }

    #[test]
    fn test_database_fragment_uses_private_subnet() {
        let engine = TemplateEngine::new().unwrap();
        let intent = Intent::builder().database(Database::Redis).build();
        let text = engine.render_fragment("database", &intent).unwrap();

        assert!(text.contains("subnet_id              = aws_subnet.private.id"));
        assert!(text.contains(r#"Engine = "redis""#));
        assert!(text.contains("from_port       = 6379"));
    }

    #[test]
    fn test_unknown_fragment() {
        let engine = TemplateEngine::new().unwrap();
        let err = engine.render_fragment("kubernetes", &Intent::default()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_undefined_variable_fails_loudly() {
        let engine = TemplateEngine::with_fragments(vec![Fragment::always(
            "broken",
            "resource \"aws_instance\" \"{{ missing_field }}\" {}",
        )])
        .unwrap();

        let err = engine.expand(&Intent::default()).unwrap_err();
        assert!(matches!(err, TemplateError::RenderingFailed(_)));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_invalid_syntax_rejected_at_construction() {
        let result = TemplateEngine::with_fragments(vec![Fragment::always(
            "unterminated",
            "{% if load_balancer %}no end",
        )]);
        assert!(matches!(result, Err(TemplateError::InvalidTemplate { .. })));
    }
}
