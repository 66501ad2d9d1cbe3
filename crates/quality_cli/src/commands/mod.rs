pub mod check;
pub mod exec;
pub mod monitor;
pub mod report;
pub mod validate;

use anyhow::{Context, Result};
use quality_core::{MonitoringConfig, PipelineConfig};
use quality_monitor::{MedallionDatasets, with_default_tables};
use quality_parser::parse_pipeline_config;
use std::path::Path;

/// Loads a pipeline configuration file.
pub fn load_pipeline(path: &Path) -> Result<PipelineConfig> {
    parse_pipeline_config(path)
        .with_context(|| format!("Failed to load pipeline configuration: {}", path.display()))
}

/// Monitoring settings from an optional configuration file, with the
/// medallion tables from the environment when none are listed.
pub fn load_monitoring(path: Option<&Path>) -> Result<MonitoringConfig> {
    let monitoring = match path {
        Some(path) => load_pipeline(path)?.monitoring,
        None => MonitoringConfig::default(),
    };
    Ok(with_default_tables(monitoring, &MedallionDatasets::from_env()))
}
