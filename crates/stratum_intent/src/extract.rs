//! Intent extraction strategies.
//!
//! Two interchangeable [`IntentSource`] implementations turn a free-text
//! description into a normalized [`Intent`]:
//!
//! - [`KeywordIntentSource`] matches words deterministically and never fails.
//! - [`ModelIntentSource`] asks a [`CompletionBackend`] for a JSON intent and
//!   falls back to keyword matching on any backend or parse failure.
//!
//! Callers pick one with [`select_source`] and never branch on which ran.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{IntentError, IntentResult};
use crate::models::{
    AppStack, Architecture, Availability, Database, InstanceType, Intent, RawIntent,
    SecurityFeature,
};

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9][a-z0-9.\-]*").unwrap());

/// Words after "go" that make it a language rather than a verb.
const GO_NOUNS: &[&str] = &[
    "api", "app", "application", "service", "services", "server", "backend", "microservice",
    "microservices", "binary", "program", "code",
];

/// Words before "go" that make it a language.
const GO_PREFIXES: &[&str] = &["in", "using", "with"];

static REGION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([a-z]{2}-(?:north|south|east|west|central|northeast|southeast)-\d)\b").unwrap());

static COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})\s+(?:app\s+)?(?:instances|servers|nodes|replicas|copies)\b").unwrap()
});

/// Produces a normalized intent from a natural-language description.
#[async_trait]
pub trait IntentSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Turn a description into an intent.
    async fn produce_intent(&self, description: &str) -> IntentResult<Intent>;
}

/// Text completion service used by [`ModelIntentSource`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> IntentResult<String>;
}

/// Deterministic keyword matcher.
#[derive(Debug, Clone, Default)]
pub struct KeywordIntentSource;

impl KeywordIntentSource {
    pub fn new() -> Self {
        Self
    }

    /// Extract an intent without any external call.
    pub fn extract(&self, description: &str) -> Intent {
        let text = description.to_lowercase();
        let words: Vec<&str> = WORD
            .find_iter(&text)
            .map(|m| m.as_str().trim_end_matches(['.', '-']))
            .collect();
        let has = |w: &str| words.contains(&w);
        let has_any = |ws: &[&str]| ws.iter().any(|w| has(w));
        // Bare "go" is a verb too; only count it next to a stack word.
        let go_stack = words.iter().enumerate().any(|(i, w)| {
            *w == "go"
                && (words.get(i + 1).is_some_and(|next| GO_NOUNS.contains(next))
                    || i.checked_sub(1)
                        .and_then(|prev| words.get(prev))
                        .is_some_and(|prev| GO_PREFIXES.contains(prev)))
        });

        let mut builder = Intent::builder();

        let stack = if has_any(&["node", "nodejs", "node.js", "express"]) {
            Some(AppStack::Nodejs)
        } else if has("golang") || go_stack {
            Some(AppStack::Golang)
        } else if has_any(&["python", "django", "flask", "fastapi"]) {
            Some(AppStack::Python)
        } else if has_any(&["java", "spring", "springboot"]) {
            Some(AppStack::Java)
        } else {
            None
        };
        if let Some(stack) = stack {
            builder = builder.app_stack(stack);
        }

        let database = if has_any(&["mongo", "mongodb"]) {
            Some(Database::Mongodb)
        } else if has_any(&["mysql", "mariadb"]) {
            Some(Database::Mysql)
        } else if has_any(&["postgres", "postgresql"]) {
            Some(Database::Postgresql)
        } else if has("redis") {
            Some(Database::Redis)
        } else if has_any(&["dynamodb", "dynamo"]) {
            Some(Database::Dynamodb)
        } else {
            None
        };
        if let Some(database) = database {
            builder = builder.database(database);
        }

        let high_availability = text.contains("high availability")
            || text.contains("highly available")
            || has_any(&["ha", "redundant", "redundancy", "failover"]);
        let load_balancer = high_availability
            || text.contains("load balancer")
            || text.contains("load-balancer")
            || has_any(&["alb", "loadbalancer", "load-balanced"]);

        if high_availability {
            builder = builder.availability(Availability::High);
        }
        if load_balancer {
            builder = builder.load_balancer(true);
        }
        if has_any(&["3-tier", "three-tier"]) {
            builder = builder.architecture(Architecture::ThreeTier);
        }

        if let Some(count) = COUNT
            .captures(&text)
            .and_then(|caps| caps[1].parse::<i64>().ok())
        {
            builder = builder.app_count(count);
        } else if load_balancer {
            builder = builder.app_count(2);
        }

        if let Some(size) = words.iter().find_map(|w| InstanceType::from_str(w)) {
            builder = builder.instance_type(size);
        }

        if let Some(caps) = REGION.captures(&text) {
            builder = builder.region(&caps[1]);
        }

        if words.iter().any(|w| w.starts_with("encrypt")) || has("kms") {
            builder = builder.security_feature(SecurityFeature::Encryption);
        }

        let intent = builder.build();
        debug!("Keyword extraction produced {:?}", intent);
        intent
    }
}

#[async_trait]
impl IntentSource for KeywordIntentSource {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn produce_intent(&self, description: &str) -> IntentResult<Intent> {
        Ok(self.extract(description))
    }
}

/// Model-backed extraction with keyword fallback.
pub struct ModelIntentSource<B> {
    backend: B,
    fallback: KeywordIntentSource,
}

impl<B: CompletionBackend> ModelIntentSource<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fallback: KeywordIntentSource::new(),
        }
    }

    /// Prompt sent to the backend.
    pub fn prompt(description: &str) -> String {
        format!(
            r#"Extract the infrastructure intent from the request below.
Reply with a single JSON object and nothing else. Allowed keys:
  app_stack: golang | python | java | nodejs | other
  database: mysql | postgresql | mongodb | redis | dynamodb | none
  architecture: 2-tier | 3-tier
  load_balancer: true | false
  availability: standard | high
  app_count: integer >= 1
  instance_type: t2.micro | t2.small | t3.micro | t3.small | t3.medium
  region: AWS region name
  security_features: list of private_subnet | security_groups | encryption
Omit keys the request does not mention.

Request: {}"#,
            description
        )
    }

    async fn request(&self, description: &str) -> IntentResult<Intent> {
        let reply = self.backend.complete(&Self::prompt(description)).await?;
        let json = extract_json_object(&reply)
            .ok_or_else(|| IntentError::InvalidResponse(truncate(&reply, 80)))?;
        let raw: RawIntent = serde_json::from_str(json)?;
        Ok(Intent::from(raw))
    }
}

#[async_trait]
impl<B: CompletionBackend> IntentSource for ModelIntentSource<B> {
    fn name(&self) -> &'static str {
        "model"
    }

    async fn produce_intent(&self, description: &str) -> IntentResult<Intent> {
        match self.request(description).await {
            Ok(intent) => {
                info!("Intent extracted by completion backend");
                Ok(intent)
            }
            Err(e) => {
                warn!("Model extraction failed, using keyword fallback: {}", e);
                Ok(self.fallback.extract(description))
            }
        }
    }
}

/// Use the model-backed source when a backend is available.
pub fn select_source<B: CompletionBackend + 'static>(backend: Option<B>) -> Box<dyn IntentSource> {
    match backend {
        Some(backend) => Box::new(ModelIntentSource::new(backend)),
        None => Box::new(KeywordIntentSource::new()),
    }
}

/// Slice out the outermost `{...}` of a reply, dropping code fences and chatter.
fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
