use anyhow::{Context, Result};
use quality_parser::FileExpectationStore;
use quality_validator::{CsvDatasetSource, LayerValidator, write_data_docs};
use std::path::Path;
use tracing::info;

use crate::commands::load_pipeline;
use crate::output;

/// Environment variable switching sources to sample files.
const USE_SAMPLE_FILES_ENV: &str = "USE_SAMPLE_FILES";

pub async fn execute(
    config_path: &Path,
    layer: Option<&str>,
    sample_files: bool,
    docs: Option<&Path>,
    format: &str,
) -> Result<()> {
    info!("Validating pipeline: {}", config_path.display());

    let config = load_pipeline(config_path)?;
    let use_sample_files = resolve_sample_files(
        sample_files,
        config.use_sample_files,
        std::env::var(USE_SAMPLE_FILES_ENV).ok().as_deref(),
    );
    info!("Use sample files: {}", use_sample_files);

    let store = FileExpectationStore::new(&config.expectations_dir);
    let source = CsvDatasetSource::new(&config.data_dir).with_sample_files(use_sample_files);

    let run = LayerValidator::new(&store, &source)
        .validate_pipeline(&config, layer)
        .context("Validation could not be run")?;

    output::print_validation_run(&run, format);

    if let Some(dir) = docs {
        let path = write_data_docs(&run, dir)
            .with_context(|| format!("Failed to write data docs to {}", dir.display()))?;
        if format != "json" {
            output::print_info(&format!("Data docs written to {}", path.display()));
        }
    }

    if !run.passed() {
        std::process::exit(1);
    }

    Ok(())
}

/// `--sample-files` forces sample sources on; otherwise a set environment
/// variable replaces the configured value.
fn resolve_sample_files(flag: bool, configured: bool, env: Option<&str>) -> bool {
    flag || env.map_or(configured, is_truthy)
}

/// `true`, `1` and `t` in any case.
fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "t")
}
