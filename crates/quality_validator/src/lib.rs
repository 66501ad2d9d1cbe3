//! # Data Quality Validator
//!
//! Validation engine for declarative expectations. This crate provides the
//! validation path of the engine:
//!
//! - Columnar in-memory datasets and CSV loading
//! - The five rule evaluators (ordered columns, not-null, type, set membership, uniqueness)
//! - The dataset validator, which runs every expectation of a suite in order
//! - The layer validator, which isolates failures per dataset
//! - HTML data docs for a validation run
//!
//! ## Example
//!
//! ```rust
//! use quality_core::ExpectationSuiteBuilder;
//! use quality_validator::{Column, DataSet, DatasetValidator};
//!
//! let dataset = DataSet::new(vec![Column::new(
//!     "contract_id",
//!     vec!["C001".into(), "C001".into()],
//! )])
//! .unwrap();
//! let suite = ExpectationSuiteBuilder::new().unique("contract_id").build();
//!
//! let result = DatasetValidator::new().validate("contracts", &dataset, &suite);
//!
//! if result.passed {
//!     println!("Validation passed!");
//! } else {
//!     for failure in &result.failures {
//!         println!("Failure: {}", failure);
//!     }
//! }
//! ```

mod dataset;
mod docs;
mod engine;
mod error;
mod layer;
mod rules;
mod source;

pub use dataset::*;
pub use docs::*;
pub use engine::*;
pub use error::*;
pub use layer::*;
pub use rules::*;
pub use source::*;
