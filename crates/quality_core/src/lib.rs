//! # Data Quality Core
//!
//! Core data structures and types for the Data Quality Engine.
//!
//! This crate provides the shared vocabulary used by the validation path and the
//! monitoring path of the engine. A pipeline is split into layers (bronze, silver,
//! gold); every layer owns a set of datasets, and every dataset is checked against
//! an ordered list of declarative expectations.
//!
//! ## Key Concepts
//!
//! - **Expectation**: A single declarative data-quality rule applied to a dataset or column
//! - **Expectation Suite**: The ordered expectations declared for one dataset
//! - **Validation Result**: Pass/fail verdict plus every failure found for one dataset
//! - **Layer Result**: The per-layer verdict aggregated from dataset results
//! - **Pipeline Config**: Which datasets belong to which layer, and which tables are monitored
//!
//! ## Example
//!
//! ```rust
//! use quality_core::{ExpectationSuiteBuilder, SemanticType};
//!
//! let suite = ExpectationSuiteBuilder::new()
//!     .columns_match(["contract_id", "contract_value"])
//!     .not_null("contract_id")
//!     .unique("contract_id")
//!     .of_type("contract_value", SemanticType::Numeric)
//!     .build();
//!
//! assert_eq!(suite.len(), 4);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod expectation;
pub mod result;
pub mod retry;
pub mod store;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use expectation::*;
pub use result::*;
pub use retry::*;
pub use store::*;
