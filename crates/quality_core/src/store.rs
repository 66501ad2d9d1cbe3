//! Expectation store trait.
//!
//! The validators never read expectation documents themselves; they ask an
//! [`ExpectationStore`] handed to them by the caller. Tests substitute an
//! in-memory store, production code uses the file-backed store from
//! `quality_parser`.

use crate::{DatasetConfig, ExpectationSuite, QualityError, Result};
use std::collections::HashMap;

/// Source of expectation suites for datasets.
///
/// # Example
///
/// ```rust
/// use quality_core::{DatasetConfig, ExpectationStore, ExpectationSuite, Result};
///
/// struct EmptyStore;
///
/// impl ExpectationStore for EmptyStore {
///     fn load(&self, _dataset: &DatasetConfig) -> Result<ExpectationSuite> {
///         Ok(ExpectationSuite::default())
///     }
/// }
/// ```
pub trait ExpectationStore: Send + Sync {
    /// Loads the suite declared for `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if no document can be located or the document cannot
    /// be parsed.
    fn load(&self, dataset: &DatasetConfig) -> Result<ExpectationSuite>;
}

/// Expectation store backed by a map from dataset name to suite.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExpectationStore {
    suites: HashMap<String, ExpectationSuite>,
}

impl InMemoryExpectationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the suite for a dataset.
    pub fn with_suite(mut self, dataset_name: impl Into<String>, suite: ExpectationSuite) -> Self {
        self.suites.insert(dataset_name.into(), suite);
        self
    }
}

impl ExpectationStore for InMemoryExpectationStore {
    fn load(&self, dataset: &DatasetConfig) -> Result<ExpectationSuite> {
        self.suites
            .get(&dataset.name)
            .cloned()
            .ok_or_else(|| QualityError::DocumentNotFound(dataset.expectations.display().to_string()))
    }
}
