//! File-backed expectation store.

use crate::parse_file;
use quality_core::{DatasetConfig, ExpectationStore, ExpectationSuite, QualityError};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Expectation store reading documents from a directory.
///
/// A dataset's primary document is tried first; the fallback is only consulted
/// when the primary file does not exist. A primary that exists but fails to
/// parse is an error, not a reason to fall back.
#[derive(Debug, Clone)]
pub struct FileExpectationStore {
    base_dir: PathBuf,
}

impl FileExpectationStore {
    /// Creates a store rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory that relative document paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ExpectationStore for FileExpectationStore {
    fn load(&self, dataset: &DatasetConfig) -> quality_core::Result<ExpectationSuite> {
        let mut tried = Vec::new();

        for candidate in dataset.expectation_candidates() {
            let path = self.resolve(candidate);
            if path.is_file() {
                debug!("Loading expectations for '{}' from {}", dataset.name, path.display());
                let suite = parse_file(&path).map_err(QualityError::from)?;
                if !suite.ignored.is_empty() {
                    debug!(
                        "Ignoring unrecognized expectation types for '{}': {}",
                        dataset.name,
                        suite.ignored.join(", ")
                    );
                }
                return Ok(suite);
            }
            tried.push(path.display().to_string());
        }

        warn!("No expectation document found for '{}'", dataset.name);
        Err(QualityError::DocumentNotFound(tried.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const UNIQUE_ID: &str = r#"{"expectations": [
        {"expectation_type": "expect_column_values_to_be_unique", "kwargs": {"column": "id"}}
    ]}"#;

    #[test]
    fn test_loads_primary_document() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("primary.json"), UNIQUE_ID).unwrap();

        let store = FileExpectationStore::new(dir.path());
        let dataset = DatasetConfig::new("contracts", "c.csv", "primary.json")
            .with_fallback_expectations("fallback.json");

        assert_eq!(store.load(&dataset).unwrap().len(), 1);
    }

    #[test]
    fn test_falls_back_when_primary_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("bronze")).unwrap();
        fs::write(dir.path().join("bronze/contracts_expectations.json"), UNIQUE_ID).unwrap();

        let store = FileExpectationStore::new(dir.path());
        let dataset = DatasetConfig::new("contracts", "c.csv", "great_expectations/bronze_contracts.json")
            .with_fallback_expectations("bronze/contracts_expectations.json");

        assert_eq!(store.load(&dataset).unwrap().len(), 1);
    }

    #[test]
    fn test_broken_primary_does_not_fall_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("primary.json"), "{ broken").unwrap();
        fs::write(dir.path().join("fallback.json"), UNIQUE_ID).unwrap();

        let store = FileExpectationStore::new(dir.path());
        let dataset = DatasetConfig::new("contracts", "c.csv", "primary.json")
            .with_fallback_expectations("fallback.json");

        assert!(matches!(
            store.load(&dataset),
            Err(QualityError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_not_found_lists_candidates() {
        let dir = TempDir::new().unwrap();
        let store = FileExpectationStore::new(dir.path());
        let dataset = DatasetConfig::new("budgets", "b.csv", "a.json").with_fallback_expectations("b.json");

        match store.load(&dataset) {
            Err(QualityError::DocumentNotFound(tried)) => {
                assert!(tried.contains("a.json"));
                assert!(tried.contains("b.json"));
            }
            other => panic!("expected DocumentNotFound, got {:?}", other),
        }
    }
}
