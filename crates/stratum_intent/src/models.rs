//! Data models for infrastructure intent.
//!
//! [`RawIntent`] is the lenient wire contract: every field optional, every
//! value a plain string. [`Intent`] is the normalized record every downstream
//! component reads. The only way to obtain an `Intent` is through
//! [`IntentBuilder::build`], which resolves every field to a concrete value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Region used when the request does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Upper bound on application instances rendered by the compute loop.
pub const MAX_APP_COUNT: u32 = 10;

/// Minimum application instances for high availability.
pub const HA_MIN_APP_COUNT: u32 = 2;

/// Supported cloud providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    #[default]
    Aws,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "aws" | "amazon" => Some(CloudProvider::Aws),
            _ => None,
        }
    }

    /// Terraform registry source for the provider plugin.
    pub fn provider_source(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "hashicorp/aws",
        }
    }
}

/// Application runtime stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStack {
    Golang,
    Python,
    Java,
    Nodejs,
    #[default]
    Other,
}

impl AppStack {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppStack::Golang => "golang",
            AppStack::Python => "python",
            AppStack::Java => "java",
            AppStack::Nodejs => "nodejs",
            AppStack::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "golang" | "go" => Some(AppStack::Golang),
            "python" | "py" => Some(AppStack::Python),
            "java" => Some(AppStack::Java),
            "nodejs" | "node" | "node.js" => Some(AppStack::Nodejs),
            "other" => Some(AppStack::Other),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            AppStack::Golang,
            AppStack::Python,
            AppStack::Java,
            AppStack::Nodejs,
            AppStack::Other,
        ]
    }

    /// Port the application listens on after bootstrap.
    pub fn app_port(&self) -> u16 {
        match self {
            AppStack::Python => 8000,
            AppStack::Nodejs => 3000,
            AppStack::Golang | AppStack::Java | AppStack::Other => 8080,
        }
    }
}

impl std::fmt::Display for AppStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Database engine hosted next to the application tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Mysql,
    Postgresql,
    Mongodb,
    Redis,
    Dynamodb,
    #[default]
    None,
}

impl Database {
    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Mysql => "mysql",
            Database::Postgresql => "postgresql",
            Database::Mongodb => "mongodb",
            Database::Redis => "redis",
            Database::Dynamodb => "dynamodb",
            Database::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Some(Database::Mysql),
            "postgresql" | "postgres" => Some(Database::Postgresql),
            "mongodb" | "mongo" => Some(Database::Mongodb),
            "redis" => Some(Database::Redis),
            "dynamodb" | "dynamo" => Some(Database::Dynamodb),
            "none" | "" => Some(Database::None),
            _ => None,
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            Database::Mysql,
            Database::Postgresql,
            Database::Mongodb,
            Database::Redis,
            Database::Dynamodb,
            Database::None,
        ]
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Database::None)
    }

    /// Listener port of the engine, if a database is configured.
    pub fn port(&self) -> Option<u16> {
        match self {
            Database::Mysql => Some(3306),
            Database::Postgresql => Some(5432),
            Database::Mongodb => Some(27017),
            Database::Redis => Some(6379),
            Database::Dynamodb => Some(8000),
            Database::None => None,
        }
    }
}

impl std::fmt::Display for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tiering of the deployment. Always derived from `load_balancer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Architecture {
    #[default]
    #[serde(rename = "2-tier")]
    TwoTier,
    #[serde(rename = "3-tier")]
    ThreeTier,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::TwoTier => "2-tier",
            Architecture::ThreeTier => "3-tier",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "2-tier" | "two-tier" | "2tier" => Some(Architecture::TwoTier),
            "3-tier" | "three-tier" | "3tier" => Some(Architecture::ThreeTier),
            _ => None,
        }
    }
}

/// Availability target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Standard,
    High,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Standard => "standard",
            Availability::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "normal" | "low" => Some(Availability::Standard),
            "high" | "ha" => Some(Availability::High),
            _ => None,
        }
    }
}

/// Compute sizes known to the pricing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InstanceType {
    #[default]
    #[serde(rename = "t2.micro")]
    T2Micro,
    #[serde(rename = "t2.small")]
    T2Small,
    #[serde(rename = "t3.micro")]
    T3Micro,
    #[serde(rename = "t3.small")]
    T3Small,
    #[serde(rename = "t3.medium")]
    T3Medium,
}

impl InstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::T2Micro => "t2.micro",
            InstanceType::T2Small => "t2.small",
            InstanceType::T3Micro => "t3.micro",
            InstanceType::T3Small => "t3.small",
            InstanceType::T3Medium => "t3.medium",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_lowercase())
    }

    pub fn all() -> Vec<Self> {
        vec![
            InstanceType::T2Micro,
            InstanceType::T2Small,
            InstanceType::T3Micro,
            InstanceType::T3Small,
            InstanceType::T3Medium,
        ]
    }

    /// Whether the size qualifies for the free-tier allowance.
    pub fn is_free_tier(&self) -> bool {
        matches!(self, InstanceType::T2Micro | InstanceType::T3Micro)
    }
}

impl std::fmt::Display for InstanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Security controls requested for the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityFeature {
    PrivateSubnet,
    SecurityGroups,
    Encryption,
}

impl SecurityFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityFeature::PrivateSubnet => "private_subnet",
            SecurityFeature::SecurityGroups => "security_groups",
            SecurityFeature::Encryption => "encryption",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "private_subnet" | "private_vpc" | "private" => Some(SecurityFeature::PrivateSubnet),
            "security_groups" | "security_group" | "firewall" => {
                Some(SecurityFeature::SecurityGroups)
            }
            "encryption" | "encrypted" | "kms" => Some(SecurityFeature::Encryption),
            _ => None,
        }
    }

    /// Features applied when the request names none.
    pub fn defaults() -> BTreeSet<Self> {
        BTreeSet::from([SecurityFeature::PrivateSubnet, SecurityFeature::SecurityGroups])
    }
}

/// Lenient wire form of an intent.
///
/// Every field is optional and every enum arrives as free text; values that do
/// not parse resolve to the field default during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIntent {
    pub cloud: Option<String>,
    #[serde(alias = "app")]
    pub app_stack: Option<String>,
    pub database: Option<String>,
    pub architecture: Option<String>,
    pub load_balancer: Option<bool>,
    pub availability: Option<String>,
    pub app_count: Option<i64>,
    pub instance_type: Option<String>,
    pub region: Option<String>,
    #[serde(alias = "security")]
    pub security_features: Option<Vec<String>>,
}

/// A fully resolved infrastructure request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIntent")]
pub struct Intent {
    cloud: CloudProvider,
    app_stack: AppStack,
    database: Database,
    architecture: Architecture,
    load_balancer: bool,
    availability: Availability,
    app_count: u32,
    instance_type: InstanceType,
    region: String,
    security_features: BTreeSet<SecurityFeature>,
}

impl Intent {
    pub fn builder() -> IntentBuilder {
        IntentBuilder::default()
    }

    pub fn cloud(&self) -> CloudProvider {
        self.cloud
    }

    pub fn app_stack(&self) -> AppStack {
        self.app_stack
    }

    pub fn database(&self) -> Database {
        self.database
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    pub fn load_balancer(&self) -> bool {
        self.load_balancer
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn app_count(&self) -> u32 {
        self.app_count
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn security_features(&self) -> &BTreeSet<SecurityFeature> {
        &self.security_features
    }

    pub fn has_database(&self) -> bool {
        !self.database.is_none()
    }

    pub fn has_feature(&self, feature: SecurityFeature) -> bool {
        self.security_features.contains(&feature)
    }

    /// Compute units billed: every app instance plus the database host.
    pub fn instance_count(&self) -> u32 {
        self.app_count + u32::from(self.has_database())
    }

    /// Stable identifiers of the application instances (`app1`..`appN`).
    pub fn app_ids(&self) -> Vec<String> {
        (1..=self.app_count).map(|i| format!("app{}", i)).collect()
    }
}

impl Default for Intent {
    fn default() -> Self {
        IntentBuilder::default().build()
    }
}

impl From<RawIntent> for Intent {
    fn from(raw: RawIntent) -> Self {
        IntentBuilder::from(raw).build()
    }
}

/// Typed, partially specified intent awaiting normalization.
#[derive(Debug, Clone, Default)]
pub struct IntentBuilder {
    app_stack: Option<AppStack>,
    database: Option<Database>,
    architecture: Option<Architecture>,
    load_balancer: Option<bool>,
    availability: Option<Availability>,
    app_count: Option<i64>,
    instance_type: Option<InstanceType>,
    region: Option<String>,
    security_features: Option<BTreeSet<SecurityFeature>>,
}

impl IntentBuilder {
    pub fn app_stack(mut self, stack: AppStack) -> Self {
        self.app_stack = Some(stack);
        self
    }

    pub fn database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    /// Request a tiering. `ThreeTier` forces a load balancer.
    pub fn architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = Some(architecture);
        self
    }

    pub fn load_balancer(mut self, enabled: bool) -> Self {
        self.load_balancer = Some(enabled);
        self
    }

    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn app_count(mut self, count: i64) -> Self {
        self.app_count = Some(count);
        self
    }

    pub fn instance_type(mut self, instance_type: InstanceType) -> Self {
        self.instance_type = Some(instance_type);
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn security_features(mut self, features: impl IntoIterator<Item = SecurityFeature>) -> Self {
        self.security_features = Some(features.into_iter().collect());
        self
    }

    pub fn security_feature(mut self, feature: SecurityFeature) -> Self {
        self.security_features
            .get_or_insert_with(SecurityFeature::defaults)
            .insert(feature);
        self
    }

    /// Resolve every field to a concrete value.
    pub fn build(self) -> Intent {
        let availability = self.availability.unwrap_or_default();
        let load_balancer = self.load_balancer.unwrap_or(false)
            || self.architecture == Some(Architecture::ThreeTier);
        let architecture = if load_balancer {
            Architecture::ThreeTier
        } else {
            Architecture::TwoTier
        };

        let mut app_count = self
            .app_count
            .unwrap_or(1)
            .clamp(1, i64::from(MAX_APP_COUNT)) as u32;
        if availability == Availability::High {
            app_count = app_count.max(HA_MIN_APP_COUNT);
        }

        let region = self
            .region
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Intent {
            cloud: CloudProvider::Aws,
            app_stack: self.app_stack.unwrap_or_default(),
            database: self.database.unwrap_or_default(),
            architecture,
            load_balancer,
            availability,
            app_count,
            instance_type: self.instance_type.unwrap_or_default(),
            region,
            security_features: self
                .security_features
                .unwrap_or_else(SecurityFeature::defaults),
        }
    }
}

impl From<&Intent> for IntentBuilder {
    /// Start from a resolved intent, typically to adjust one field.
    fn from(intent: &Intent) -> Self {
        Self {
            app_stack: Some(intent.app_stack),
            database: Some(intent.database),
            architecture: Some(intent.architecture),
            load_balancer: Some(intent.load_balancer),
            availability: Some(intent.availability),
            app_count: Some(i64::from(intent.app_count)),
            instance_type: Some(intent.instance_type),
            region: Some(intent.region.clone()),
            security_features: Some(intent.security_features.clone()),
        }
    }
}

impl From<RawIntent> for IntentBuilder {
    fn from(raw: RawIntent) -> Self {
        if let Some(cloud) = raw.cloud.as_deref() {
            if CloudProvider::from_str(cloud).is_none() {
                debug!("Unsupported cloud '{}', using aws", cloud);
            }
        }

        let security_features = raw.security_features.map(|names| {
            names
                .iter()
                .filter_map(|name| {
                    let feature = SecurityFeature::from_str(name);
                    if feature.is_none() {
                        debug!("Ignoring unknown security feature '{}'", name);
                    }
                    feature
                })
                .collect()
        });

        Self {
            app_stack: parse_field("app_stack", raw.app_stack, AppStack::from_str),
            database: parse_field("database", raw.database, Database::from_str),
            architecture: parse_field("architecture", raw.architecture, Architecture::from_str),
            load_balancer: raw.load_balancer,
            availability: parse_field("availability", raw.availability, Availability::from_str),
            app_count: raw.app_count,
            instance_type: parse_field("instance_type", raw.instance_type, InstanceType::from_str),
            region: raw.region,
            security_features,
        }
    }
}

fn parse_field<T>(field: &str, value: Option<String>, parse: fn(&str) -> Option<T>) -> Option<T> {
    let value = value?;
    let parsed = parse(&value);
    if parsed.is_none() {
        debug!("Unrecognised {} '{}', falling back to default", field, value);
    }
    parsed
}
