//! # stratum_core
//!
//! The Stratum pipeline: one normalized intent in, one [`InfraBundle`] out.
//!
//! # Architecture
//!
//! - **Template expansion**: intent to Terraform text (`stratum_templates`)
//! - **Structural validation**: text to errors, warnings and a resource count
//!   (`stratum_iac`)
//! - **Cost estimation**: intent and resource count to a monthly bill
//!   (`stratum_cost`)
//! - **Security analysis**: intent and text to a score (`stratum_policy`)
//!
//! # Example
//!
//! ```rust
//! use stratum_core::Pipeline;
//! use stratum_intent::Intent;
//!
//! let pipeline = Pipeline::new()?;
//! let bundle = pipeline.run(&Intent::default())?;
//! assert!(bundle.validation.valid);
//! assert!(bundle.code().contains("resource \"aws_instance\" \"app1\""));
//! # Ok::<(), stratum_core::CoreError>(())
//! ```

pub mod bundle;
pub mod error;
pub mod pipeline;

pub use bundle::InfraBundle;
pub use error::{CoreError, CoreResult};
pub use pipeline::Pipeline;
