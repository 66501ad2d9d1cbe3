//! Validation outcomes for datasets and layers.
//!
//! Results are built once per run and never mutated afterwards; `passed` is always
//! derived from the failure list at construction time.

use crate::ExpectationKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Category of a recorded failure.
///
/// The five rule kinds report data-quality failures. The two remaining kinds
/// report that the dataset could not be checked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ColumnsMatchOrderedList,
    ValuesNotNull,
    ValuesOfType,
    ValuesInSet,
    ValuesUnique,
    /// Expectation document missing or unparseable
    ConfigurationError,
    /// Dataset source missing or unreadable
    SourceUnavailable,
}

impl FailureKind {
    /// Short name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColumnsMatchOrderedList => "columns_match_ordered_list",
            Self::ValuesNotNull => "values_not_null",
            Self::ValuesOfType => "values_of_type",
            Self::ValuesInSet => "values_in_set",
            Self::ValuesUnique => "values_unique",
            Self::ConfigurationError => "configuration_error",
            Self::SourceUnavailable => "source_unavailable",
        }
    }

    /// Returns true for failures raised by a rule evaluator.
    pub fn is_data_quality(&self) -> bool {
        !matches!(self, Self::ConfigurationError | Self::SourceUnavailable)
    }
}

impl From<ExpectationKind> for FailureKind {
    fn from(kind: ExpectationKind) -> Self {
        match kind {
            ExpectationKind::ColumnsMatchOrderedList => Self::ColumnsMatchOrderedList,
            ExpectationKind::ValuesNotNull => Self::ValuesNotNull,
            ExpectationKind::ValuesOfType => Self::ValuesOfType,
            ExpectationKind::ValuesInSet => Self::ValuesInSet,
            ExpectationKind::ValuesUnique => Self::ValuesUnique,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed check inside a validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Which rule (or which setup step) failed
    pub expectation_kind: FailureKind,

    /// Target column, absent for table-level failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Human-readable diagnostic
    pub message: String,
}

impl Failure {
    /// Creates a new failure entry.
    pub fn new(
        expectation_kind: impl Into<FailureKind>,
        column: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            expectation_kind: expectation_kind.into(),
            column: column.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "[{}] {}: {}", self.expectation_kind, column, self.message),
            None => write!(f, "[{}] {}", self.expectation_kind, self.message),
        }
    }
}

/// Verdict for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Dataset that was validated
    pub dataset_name: String,

    /// True iff every check passed
    pub passed: bool,

    /// Every failure, in expectation order
    pub failures: Vec<Failure>,
}

impl ValidationResult {
    /// Creates a result; `passed` is derived from `failures`.
    pub fn new(dataset_name: impl Into<String>, failures: Vec<Failure>) -> Self {
        Self {
            dataset_name: dataset_name.into(),
            passed: failures.is_empty(),
            failures,
        }
    }

    /// Creates a failed result carrying a single configuration error.
    pub fn configuration_error(dataset_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            dataset_name,
            vec![Failure::new(FailureKind::ConfigurationError, None, message)],
        )
    }

    /// Returns the failures reported for one column.
    pub fn failures_for<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Failure> + 'a {
        self.failures
            .iter()
            .filter(move |f| f.column.as_deref() == Some(column))
    }
}

/// Verdict for one pipeline layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerResult {
    /// Layer that was validated, e.g. "bronze"
    pub layer_name: String,

    /// Per-dataset verdicts keyed by dataset name
    pub dataset_results: BTreeMap<String, ValidationResult>,

    /// True iff every dataset result passed
    pub passed: bool,
}

impl LayerResult {
    /// Creates a layer result; `passed` is the AND of every dataset result.
    pub fn new(
        layer_name: impl Into<String>,
        results: impl IntoIterator<Item = ValidationResult>,
    ) -> Self {
        let dataset_results: BTreeMap<_, _> = results
            .into_iter()
            .map(|r| (r.dataset_name.clone(), r))
            .collect();
        let passed = dataset_results.values().all(|r| r.passed);

        Self {
            layer_name: layer_name.into(),
            dataset_results,
            passed,
        }
    }

    /// Gets the result for one dataset.
    pub fn get(&self, dataset_name: &str) -> Option<&ValidationResult> {
        self.dataset_results.get(dataset_name)
    }

    /// Number of datasets that failed.
    pub fn failed_count(&self) -> usize {
        self.dataset_results.values().filter(|r| !r.passed).count()
    }
}

/// Outcome of one validation run over several layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRun {
    /// When the run finished
    pub generated_at: DateTime<Utc>,

    /// Layer results in configuration order
    pub layers: Vec<LayerResult>,
}

impl ValidationRun {
    /// Creates a run stamped with the current time.
    pub fn new(layers: Vec<LayerResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            layers,
        }
    }

    /// True iff every layer passed.
    pub fn passed(&self) -> bool {
        self.layers.iter().all(|l| l.passed)
    }
}
