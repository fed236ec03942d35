//! # stratum_templates
//!
//! Template expansion engine for Stratum.
//!
//! An [`Intent`](stratum_intent::Intent) is rendered into Terraform text through
//! an ordered set of tera fragments:
//!
//! - `provider` and `network` scaffold, always
//! - `compute`, one `aws_instance` per application instance (`app1`..`appN`)
//! - `database`, only when a database engine is configured
//! - `load_balancer`, only when a load balancer is requested
//! - `variables` and `outputs`, always
//!
//! ## Example
//!
//! ```rust
//! use stratum_intent::{Database, Intent};
//! use stratum_templates::TemplateEngine;
//!
//! let engine = TemplateEngine::new().unwrap();
//! let intent = Intent::builder().database(Database::Mysql).build();
//! let artifact = engine.expand(&intent).unwrap();
//!
//! assert!(artifact.code.contains(r#"resource "aws_instance" "db""#));
//! ```

pub mod bootstrap;
pub mod context;
pub mod error;
pub mod fragments;
pub mod renderer;

pub use context::{AppInstance, TemplateContext};
pub use error::{TemplateError, TemplateResult};
pub use fragments::{builtin_fragments, Fragment};
pub use renderer::{GeneratedArtifact, TemplateEngine};
