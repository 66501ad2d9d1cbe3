//! Pipeline configuration.
//!
//! Describes which datasets belong to which layer, where their data and
//! expectation documents live, and which warehouse tables are monitored.
//! Configuration is passed explicitly into every run; nothing here is global.

use crate::{QualityError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default staleness threshold, in hours.
pub const DEFAULT_STALENESS_THRESHOLD_HOURS: i64 = 24;

/// Default day-over-day volume change threshold, in percent.
pub const DEFAULT_VOLUME_CHANGE_THRESHOLD_PCT: f64 = 20.0;

/// Default trailing window for volume trends, in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base directory for dataset sources
    #[serde(default)]
    pub data_dir: PathBuf,

    /// Base directory for expectation documents
    #[serde(default)]
    pub expectations_dir: PathBuf,

    /// Read `sample_source` instead of `source` where one is configured
    #[serde(default)]
    pub use_sample_files: bool,

    /// Layers in validation order
    #[serde(default)]
    pub layers: Vec<LayerConfig>,

    /// Monitoring settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl PipelineConfig {
    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Result<&LayerConfig> {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| QualityError::UnknownLayer(name.to_string()))
    }

    /// Resolves relative directories against `base`.
    ///
    /// Used after loading a configuration file so that paths are interpreted
    /// relative to the file rather than the working directory.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.data_dir = join_relative(base, &self.data_dir);
        self.expectations_dir = join_relative(base, &self.expectations_dir);
        self
    }

    /// Checks the configuration for structural problems.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(QualityError::configuration("layer name cannot be empty"));
            }
            if !seen.insert(layer.name.as_str()) {
                return Err(QualityError::configuration(format!(
                    "layer '{}' is declared more than once",
                    layer.name
                )));
            }
            layer.validate()?;
        }
        Ok(())
    }
}

/// One pipeline layer and its datasets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer name, e.g. "bronze"
    pub name: String,

    /// Datasets validated as part of this layer
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

impl LayerConfig {
    /// Creates a layer with no datasets.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            datasets: Vec::new(),
        }
    }

    /// Adds a dataset to the layer.
    pub fn with_dataset(mut self, dataset: DatasetConfig) -> Self {
        self.datasets.push(dataset);
        self
    }

    /// Checks that every dataset has a name and no name is used twice.
    ///
    /// Dataset results are keyed by name, so a repeated name would hide one
    /// of the results.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for dataset in &self.datasets {
            if dataset.name.trim().is_empty() {
                return Err(QualityError::configuration(format!(
                    "layer '{}' has a dataset without a name",
                    self.name
                )));
            }
            if !seen.insert(dataset.name.as_str()) {
                return Err(QualityError::configuration(format!(
                    "dataset '{}' is declared more than once in layer '{}'",
                    dataset.name, self.name
                )));
            }
        }
        Ok(())
    }
}

/// Where one dataset's data and rules live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset name, e.g. "contracts"
    pub name: String,

    /// Data file, relative to `data_dir`
    pub source: PathBuf,

    /// Smaller data file used when sample files are enabled
    #[serde(default)]
    pub sample_source: Option<PathBuf>,

    /// Expectation document, relative to `expectations_dir`
    pub expectations: PathBuf,

    /// Document tried when `expectations` does not exist
    #[serde(default)]
    pub fallback_expectations: Option<PathBuf>,
}

impl DatasetConfig {
    /// Creates a dataset configuration with no sample source or fallback.
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        expectations: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            sample_source: None,
            expectations: expectations.into(),
            fallback_expectations: None,
        }
    }

    /// Sets the sample source.
    pub fn with_sample_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sample_source = Some(path.into());
        self
    }

    /// Sets the fallback expectation document.
    pub fn with_fallback_expectations(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_expectations = Some(path.into());
        self
    }

    /// The data file to read, honoring the sample-files switch.
    pub fn effective_source(&self, use_sample_files: bool) -> &Path {
        match (&self.sample_source, use_sample_files) {
            (Some(sample), true) => sample,
            _ => &self.source,
        }
    }

    /// Expectation document candidates in lookup order.
    pub fn expectation_candidates(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.expectations.as_path()).chain(self.fallback_expectations.as_deref())
    }
}

/// Monitoring settings shared by the freshness and volume monitors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Fully qualified table identifiers, in report order
    #[serde(default)]
    pub tables: Vec<String>,

    /// Tables older than this many hours are stale (exclusive)
    #[serde(default = "default_staleness_threshold_hours")]
    pub staleness_threshold_hours: i64,

    /// Absolute day-over-day change above this percentage is an anomaly (exclusive)
    #[serde(default = "default_volume_change_threshold_pct")]
    pub volume_change_threshold_pct: f64,

    /// Trailing window for daily counts
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            staleness_threshold_hours: DEFAULT_STALENESS_THRESHOLD_HOURS,
            volume_change_threshold_pct: DEFAULT_VOLUME_CHANGE_THRESHOLD_PCT,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl MonitoringConfig {
    /// Creates a builder for monitoring settings.
    pub fn builder() -> MonitoringConfigBuilder {
        MonitoringConfigBuilder::default()
    }

    /// Checks that the settings can drive a monitoring run.
    pub fn validate(&self) -> Result<()> {
        if self.tables.is_empty() {
            return Err(QualityError::configuration("no tables configured for monitoring"));
        }
        if self.tables.iter().any(|t| t.trim().is_empty()) {
            return Err(QualityError::configuration("table identifier cannot be empty"));
        }
        if self.staleness_threshold_hours <= 0 {
            return Err(QualityError::configuration(
                "staleness_threshold_hours must be positive",
            ));
        }
        if self.volume_change_threshold_pct.is_nan() || self.volume_change_threshold_pct <= 0.0 {
            return Err(QualityError::configuration(
                "volume_change_threshold_pct must be positive",
            ));
        }
        if self.window_days < 2 {
            return Err(QualityError::configuration(
                "window_days must be at least 2 to compare adjacent days",
            ));
        }
        Ok(())
    }
}

/// Builder for [`MonitoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct MonitoringConfigBuilder {
    config: MonitoringConfig,
}

impl MonitoringConfigBuilder {
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.config.tables.push(table.into());
        self
    }

    pub fn tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tables.extend(tables.into_iter().map(Into::into));
        self
    }

    pub fn staleness_threshold_hours(mut self, hours: i64) -> Self {
        self.config.staleness_threshold_hours = hours;
        self
    }

    pub fn volume_change_threshold_pct(mut self, pct: f64) -> Self {
        self.config.volume_change_threshold_pct = pct;
        self
    }

    pub fn window_days(mut self, days: u32) -> Self {
        self.config.window_days = days;
        self
    }

    /// Builds and validates the settings.
    pub fn build(self) -> Result<MonitoringConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn default_staleness_threshold_hours() -> i64 {
    DEFAULT_STALENESS_THRESHOLD_HOURS
}

fn default_volume_change_threshold_pct() -> f64 {
    DEFAULT_VOLUME_CHANGE_THRESHOLD_PCT
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

fn join_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contracts() -> DatasetConfig {
        DatasetConfig::new("contracts", "bronze/contracts.csv", "bronze_contracts.json")
            .with_sample_source("bronze/sample_contracts.csv")
            .with_fallback_expectations("bronze/contracts_expectations.json")
    }

    #[test]
    fn test_effective_source() {
        let dataset = contracts();
        assert_eq!(
            dataset.effective_source(true),
            Path::new("bronze/sample_contracts.csv")
        );
        assert_eq!(dataset.effective_source(false), Path::new("bronze/contracts.csv"));

        let no_sample = DatasetConfig::new("budgets", "bronze/budgets.csv", "b.json");
        assert_eq!(no_sample.effective_source(true), Path::new("bronze/budgets.csv"));
    }

    #[test]
    fn test_expectation_candidates_order() {
        let dataset = contracts();
        let candidates: Vec<_> = dataset.expectation_candidates().collect();
        assert_eq!(
            candidates,
            vec![
                Path::new("bronze_contracts.json"),
                Path::new("bronze/contracts_expectations.json")
            ]
        );
    }

    #[test]
    fn test_layer_lookup() {
        let config = PipelineConfig {
            layers: vec![LayerConfig::new("bronze").with_dataset(contracts())],
            ..Default::default()
        };
        assert_eq!(config.layer("bronze").unwrap().datasets.len(), 1);
        assert!(matches!(
            config.layer("gold"),
            Err(QualityError::UnknownLayer(_))
        ));
    }

    #[test]
    fn test_duplicate_layers_rejected() {
        let config = PipelineConfig {
            layers: vec![LayerConfig::new("bronze"), LayerConfig::new("bronze")],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_datasets_in_layer_rejected() {
        let layer = LayerConfig::new("bronze")
            .with_dataset(DatasetConfig::new("contracts", "missing.csv", "c.json"))
            .with_dataset(DatasetConfig::new("contracts", "contracts.csv", "c.json"));
        let err = layer.validate().unwrap_err();
        assert!(err.to_string().contains("'contracts' is declared more than once"));

        let config = PipelineConfig {
            layers: vec![layer],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // The same dataset name in different layers is fine.
        let config = PipelineConfig {
            layers: vec![
                LayerConfig::new("bronze")
                    .with_dataset(DatasetConfig::new("contracts", "a.csv", "a.json")),
                LayerConfig::new("silver")
                    .with_dataset(DatasetConfig::new("contracts", "b.csv", "b.json")),
            ],
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_paths() {
        let config = PipelineConfig {
            data_dir: PathBuf::from("data"),
            expectations_dir: PathBuf::from("/etc/expectations"),
            ..Default::default()
        }
        .resolve_paths(Path::new("/srv/pipeline"));

        assert_eq!(config.data_dir, PathBuf::from("/srv/pipeline/data"));
        assert_eq!(config.expectations_dir, PathBuf::from("/etc/expectations"));
    }

    #[test]
    fn test_monitoring_builder() {
        let monitoring = MonitoringConfig::builder()
            .table("medallion-dev.bronze.contracts")
            .tables(["medallion-dev.bronze.budgets"])
            .staleness_threshold_hours(12)
            .build()
            .unwrap();
        assert_eq!(monitoring.tables.len(), 2);
        assert_eq!(monitoring.staleness_threshold_hours, 12);
        assert_eq!(monitoring.window_days, 7);
    }

    #[test]
    fn test_monitoring_builder_rejects_bad_settings() {
        assert!(MonitoringConfig::builder().build().is_err());
        assert!(MonitoringConfig::builder().table("t").window_days(1).build().is_err());
        assert!(MonitoringConfig::builder()
            .table("t")
            .staleness_threshold_hours(0)
            .build()
            .is_err());
        assert!(MonitoringConfig::builder()
            .table("t")
            .volume_change_threshold_pct(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_monitoring_defaults() {
        let monitoring = MonitoringConfig::default();
        assert_eq!(monitoring.staleness_threshold_hours, 24);
        assert_eq!(monitoring.volume_change_threshold_pct, 20.0);
        assert_eq!(monitoring.window_days, 7);
    }
}
