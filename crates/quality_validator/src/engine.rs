//! Main validation engine.
//!
//! This module provides the [`DatasetValidator`], which runs every expectation
//! of a suite against a dataset and collects the complete failure set.

use crate::{DataSet, evaluate};
use quality_core::{ExpectationSuite, Failure, ValidationResult};
use tracing::debug;

/// Validation engine for one dataset.
///
/// Stateless: validating the same dataset against the same suite twice yields
/// identical results.
///
/// # Example
///
/// ```rust
/// use quality_core::{ExpectationSuiteBuilder, SemanticType};
/// use quality_validator::{Column, DataSet, DataValue, DatasetValidator};
///
/// let dataset = DataSet::new(vec![Column::new(
///     "contract_value",
///     vec![DataValue::Int(100), DataValue::from("x")],
/// )])
/// .unwrap();
/// let suite = ExpectationSuiteBuilder::new()
///     .of_type("contract_value", SemanticType::Numeric)
///     .build();
///
/// let result = DatasetValidator::new().validate("contracts", &dataset, &suite);
/// assert!(!result.passed);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetValidator;

impl DatasetValidator {
    /// Creates a new dataset validator.
    pub fn new() -> Self {
        Self
    }

    /// Validates a dataset against a suite.
    ///
    /// Expectations run in suite order and a failure never stops later ones.
    pub fn validate(
        &self,
        dataset_name: &str,
        dataset: &DataSet,
        suite: &ExpectationSuite,
    ) -> ValidationResult {
        let failures: Vec<Failure> = suite
            .iter()
            .filter_map(|expectation| {
                let outcome = evaluate(expectation, dataset);
                debug!(
                    "{}: {} -> {}",
                    dataset_name,
                    expectation,
                    if outcome.is_ok() { "pass" } else { "fail" }
                );
                outcome.err().map(|err| {
                    Failure::new(expectation.kind(), expectation.column(), err.to_string())
                })
            })
            .collect();

        ValidationResult::new(dataset_name, failures)
    }
}
