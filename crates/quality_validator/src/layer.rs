//! Layer validation.
//!
//! Runs the dataset validator over every dataset of a layer. Problems loading
//! one dataset's expectations or data are recorded on that dataset's result
//! and never stop the rest of the layer.

use crate::{DatasetSource, DatasetValidator};
use quality_core::{
    DatasetConfig, ExpectationStore, Failure, FailureKind, LayerConfig, LayerResult,
    PipelineConfig, QualityError, Result, ValidationResult, ValidationRun,
};
use tracing::{info, warn};

/// Validates layers using an expectation store and a dataset source.
pub struct LayerValidator<'a> {
    store: &'a dyn ExpectationStore,
    source: &'a dyn DatasetSource,
    validator: DatasetValidator,
}

impl<'a> LayerValidator<'a> {
    pub fn new(store: &'a dyn ExpectationStore, source: &'a dyn DatasetSource) -> Self {
        Self {
            store,
            source,
            validator: DatasetValidator::new(),
        }
    }

    /// Validates one dataset.
    ///
    /// A missing or unparseable expectation document yields a single
    /// `configuration_error` failure; unreadable data yields a single
    /// `source_unavailable` failure.
    pub fn validate_dataset(&self, dataset: &DatasetConfig) -> ValidationResult {
        let suite = match self.store.load(dataset) {
            Ok(suite) => suite,
            Err(err) => {
                warn!("Expectations for '{}' unavailable: {}", dataset.name, err);
                return ValidationResult::configuration_error(&dataset.name, err.to_string());
            }
        };

        let data = match self.source.load(dataset) {
            Ok(data) => data,
            Err(err) => {
                warn!("Data for '{}' unavailable: {}", dataset.name, err);
                return ValidationResult::new(
                    &dataset.name,
                    vec![Failure::new(FailureKind::SourceUnavailable, None, err.to_string())],
                );
            }
        };

        let result = self.validator.validate(&dataset.name, &data, &suite);
        info!(
            "Dataset '{}': {} ({} rows, {} expectations, {} failures)",
            dataset.name,
            if result.passed { "passed" } else { "failed" },
            data.row_count(),
            suite.len(),
            result.failures.len()
        );
        result
    }

    /// Validates every dataset of a layer.
    ///
    /// # Errors
    ///
    /// Returns [`QualityError::EmptyLayer`] if the layer has no datasets, and
    /// [`QualityError::Configuration`] if a dataset name is blank or repeated.
    pub fn validate_layer(&self, layer: &LayerConfig) -> Result<LayerResult> {
        if layer.datasets.is_empty() {
            return Err(QualityError::EmptyLayer(layer.name.clone()));
        }
        layer.validate()?;

        info!("Validating layer '{}' ({} datasets)", layer.name, layer.datasets.len());
        let result = LayerResult::new(
            &layer.name,
            layer.datasets.iter().map(|d| self.validate_dataset(d)),
        );
        info!(
            "Layer '{}': {} ({} of {} datasets failed)",
            layer.name,
            if result.passed { "passed" } else { "failed" },
            result.failed_count(),
            result.dataset_results.len()
        );
        Ok(result)
    }

    /// Validates the named layer, or every configured layer when `layer` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown layer name, a configuration without
    /// layers, or a layer without datasets.
    pub fn validate_pipeline(
        &self,
        config: &PipelineConfig,
        layer: Option<&str>,
    ) -> Result<ValidationRun> {
        let layers: Vec<&LayerConfig> = match layer {
            Some(name) => vec![config.layer(name)?],
            None => config.layers.iter().collect(),
        };

        if layers.is_empty() {
            return Err(QualityError::configuration("no layers configured"));
        }

        let results = layers
            .into_iter()
            .map(|l| self.validate_layer(l))
            .collect::<Result<Vec<_>>>()?;
        Ok(ValidationRun::new(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, CsvDatasetSource, DataSet, DataValue, InMemoryDatasetSource};
    use pretty_assertions::assert_eq;
    use quality_core::{ExpectationSuiteBuilder, InMemoryExpectationStore};
    use tempfile::TempDir;

    fn ids(values: &[&str]) -> DataSet {
        DataSet::new(vec![Column::new(
            "id",
            values.iter().map(|v| DataValue::from(*v)).collect(),
        )])
        .unwrap()
    }

    fn store() -> InMemoryExpectationStore {
        let suite = ExpectationSuiteBuilder::new().unique("id").build();
        InMemoryExpectationStore::new()
            .with_suite("contracts", suite.clone())
            .with_suite("budgets", suite)
    }

    fn bronze() -> LayerConfig {
        LayerConfig::new("bronze")
            .with_dataset(DatasetConfig::new("contracts", "contracts.csv", "contracts.json"))
            .with_dataset(DatasetConfig::new("budgets", "budgets.csv", "budgets.json"))
    }

    #[test]
    fn test_layer_passes_when_all_datasets_pass() {
        let store = store();
        let source = InMemoryDatasetSource::new()
            .with_dataset("contracts", ids(&["C001", "C002"]))
            .with_dataset("budgets", ids(&["B001"]));

        let result = LayerValidator::new(&store, &source).validate_layer(&bronze()).unwrap();
        assert!(result.passed);
        assert_eq!(result.dataset_results.len(), 2);
    }

    #[test]
    fn test_missing_source_is_isolated() {
        let store = store();
        let source = InMemoryDatasetSource::new().with_dataset("contracts", ids(&["C001"]));

        let result = LayerValidator::new(&store, &source).validate_layer(&bronze()).unwrap();

        assert!(!result.passed);
        assert!(result.get("contracts").unwrap().passed);
        let budgets = result.get("budgets").unwrap();
        assert_eq!(budgets.failures.len(), 1);
        assert_eq!(budgets.failures[0].expectation_kind, FailureKind::SourceUnavailable);
    }

    #[test]
    fn test_missing_expectations_is_configuration_error() {
        let store = InMemoryExpectationStore::new();
        let source = InMemoryDatasetSource::new().with_dataset("contracts", ids(&["C001"]));
        let layer = LayerConfig::new("bronze")
            .with_dataset(DatasetConfig::new("contracts", "contracts.csv", "contracts.json"));

        let result = LayerValidator::new(&store, &source).validate_layer(&layer).unwrap();
        let contracts = result.get("contracts").unwrap();
        assert_eq!(contracts.failures[0].expectation_kind, FailureKind::ConfigurationError);
    }

    #[test]
    fn test_empty_layer_is_an_error() {
        let store = store();
        let source = InMemoryDatasetSource::new();
        let result = LayerValidator::new(&store, &source).validate_layer(&LayerConfig::new("gold"));
        assert!(matches!(result, Err(QualityError::EmptyLayer(_))));
    }

    #[test]
    fn test_duplicate_dataset_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("good.csv"), "id\nC001\n").unwrap();
        let store = store();
        let source = CsvDatasetSource::new(dir.path());
        let layer = LayerConfig::new("bronze")
            .with_dataset(DatasetConfig::new("contracts", "missing.csv", "contracts.json"))
            .with_dataset(DatasetConfig::new("contracts", "good.csv", "contracts.json"));

        let result = LayerValidator::new(&store, &source).validate_layer(&layer);

        match result {
            Err(QualityError::Configuration(message)) => assert!(message.contains("contracts")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_pipeline() {
        let store = store();
        let source = InMemoryDatasetSource::new()
            .with_dataset("contracts", ids(&["C001", "C001"]))
            .with_dataset("budgets", ids(&["B001"]));
        let config = PipelineConfig {
            layers: vec![bronze()],
            ..Default::default()
        };
        let validator = LayerValidator::new(&store, &source);

        let run = validator.validate_pipeline(&config, None).unwrap();
        assert_eq!(run.layers.len(), 1);
        assert!(!run.passed());

        assert!(matches!(
            validator.validate_pipeline(&config, Some("platinum")),
            Err(QualityError::UnknownLayer(_))
        ));
        assert!(validator
            .validate_pipeline(&PipelineConfig::default(), None)
            .is_err());
    }
}
