//! Pipeline configuration loading (TOML).

use crate::{ParserError, Result};
use quality_core::PipelineConfig;
use std::path::Path;

/// Parse a pipeline configuration from a TOML string.
///
/// Paths are returned as written; see [`parse_pipeline_config`] for resolution
/// against the file location.
///
/// # Example
///
/// ```rust
/// use quality_parser::parse_pipeline_toml;
///
/// let toml = r#"
/// data_dir = "data"
/// expectations_dir = "expectations"
///
/// [[layers]]
/// name = "bronze"
///
/// [[layers.datasets]]
/// name = "contracts"
/// source = "bronze/contracts.csv"
/// expectations = "bronze_contracts.json"
/// "#;
///
/// let config = parse_pipeline_toml(toml).unwrap();
/// assert_eq!(config.layers[0].datasets[0].name, "contracts");
/// ```
pub fn parse_pipeline_toml(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Load a pipeline configuration file.
///
/// Relative `data_dir` and `expectations_dir` are resolved against the
/// directory containing the file.
pub fn parse_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_pipeline_toml(&content)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.resolve_paths(base))
}
