//! # stratum_intent
//!
//! The infrastructure intent: the shared, fully-defaulted request record that
//! every other Stratum component reads.
//!
//! This crate provides:
//!
//! - **Intent model**: [`Intent`] with total defaults and normalization
//!   (`3-tier` forces a load balancer, `high` availability forces two or more
//!   app instances)
//! - **Wire contract**: [`RawIntent`], the lenient JSON form produced by
//!   extraction
//! - **Extraction strategies**: [`KeywordIntentSource`] and
//!   [`ModelIntentSource`] behind the [`IntentSource`] trait
//!
//! ## Example
//!
//! ```rust
//! use stratum_intent::{Availability, Database, Intent};
//!
//! let intent = Intent::builder()
//!     .database(Database::Postgresql)
//!     .availability(Availability::High)
//!     .build();
//!
//! assert_eq!(intent.app_count(), 2);
//! assert_eq!(intent.region(), "us-east-1");
//! ```

pub mod error;
pub mod extract;
pub mod models;

pub use error::{IntentError, IntentResult};
pub use extract::{select_source, CompletionBackend, IntentSource, KeywordIntentSource, ModelIntentSource};
pub use models::*;
