//! Dataset sources.
//!
//! A [`DatasetSource`] turns a configured dataset into an in-memory
//! [`DataSet`]. The CSV source reads delimited files with a header row and
//! infers a value type per cell.

use crate::{DataSet, DataValue, ValidationError};
use chrono::DateTime;
use quality_core::DatasetConfig;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads the data for a configured dataset.
pub trait DatasetSource: Send + Sync {
    /// Loads the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Source`] if the data is missing or unreadable.
    fn load(&self, dataset: &DatasetConfig) -> Result<DataSet, ValidationError>;
}

/// CSV files under a data directory.
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    base_dir: PathBuf,
    use_sample_files: bool,
}

impl CsvDatasetSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            use_sample_files: false,
        }
    }

    /// Reads each dataset's `sample_source` instead of `source` when one is configured.
    pub fn with_sample_files(mut self, use_sample_files: bool) -> Self {
        self.use_sample_files = use_sample_files;
        self
    }

    /// Path the source would read for `dataset`.
    pub fn resolve(&self, dataset: &DatasetConfig) -> PathBuf {
        let path = dataset.effective_source(self.use_sample_files);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl DatasetSource for CsvDatasetSource {
    fn load(&self, dataset: &DatasetConfig) -> Result<DataSet, ValidationError> {
        let path = self.resolve(dataset);
        debug!("Reading '{}' from {}", dataset.name, path.display());
        read_csv(&path)
    }
}

/// Datasets held in memory, keyed by dataset name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetSource {
    datasets: HashMap<String, DataSet>,
}

impl InMemoryDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, dataset: DataSet) -> Self {
        self.datasets.insert(name.into(), dataset);
        self
    }
}

impl DatasetSource for InMemoryDatasetSource {
    fn load(&self, dataset: &DatasetConfig) -> Result<DataSet, ValidationError> {
        self.datasets
            .get(&dataset.name)
            .cloned()
            .ok_or_else(|| ValidationError::source(&dataset.name, "dataset not registered"))
    }
}

/// Reads a CSV file with a header row.
///
/// # Errors
///
/// Returns [`ValidationError::Source`] if the file cannot be opened or a
/// record has the wrong number of fields, and a dataset error if the header
/// repeats a column name.
pub fn read_csv(path: &Path) -> Result<DataSet, ValidationError> {
    let source_error = |message: String| ValidationError::source(path.display().to_string(), message);

    let file = std::fs::File::open(path).map_err(|e| source_error(e.to_string()))?;
    let (headers, records) = read_records(file).map_err(|e| source_error(e.to_string()))?;
    DataSet::from_records(headers, records)
}

/// Reads CSV data with a header row from any reader.
pub fn read_csv_from_reader<R: Read>(reader: R) -> Result<DataSet, ValidationError> {
    let (headers, records) =
        read_records(reader).map_err(|e| ValidationError::source("<reader>", e.to_string()))?;
    DataSet::from_records(headers, records)
}

fn read_records<R: Read>(reader: R) -> csv::Result<(Vec<String>, Vec<Vec<DataValue>>)> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?.iter().map(parse_cell).collect());
    }

    Ok((headers, records))
}

/// Infers a value from one CSV cell.
///
/// Empty cells are null. Otherwise the first match wins: integer, finite
/// float, `true`/`false` in any case, RFC 3339 timestamp, string.
pub fn parse_cell(cell: &str) -> DataValue {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return DataValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return DataValue::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return DataValue::Float(f);
        }
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return DataValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return DataValue::Bool(false);
    }
    if DateTime::parse_from_rfc3339(trimmed).is_ok() {
        return DataValue::Timestamp(trimmed.to_string());
    }
    DataValue::String(cell.to_string())
}
