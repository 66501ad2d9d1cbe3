use anyhow::{Context, Result};
use quality_monitor::{FreshnessResults, ReportGenerator, VolumeResults, read_handoff, write_handoff};
use std::path::Path;
use tracing::info;

use crate::commands::load_monitoring;
use crate::output;

pub async fn execute(
    freshness_path: &Path,
    volume_path: &Path,
    config: Option<&Path>,
    output_path: Option<&Path>,
    format: &str,
) -> Result<()> {
    info!(
        "Merging {} and {}",
        freshness_path.display(),
        volume_path.display()
    );

    let monitoring = load_monitoring(config)?;

    let freshness: FreshnessResults = read_handoff(freshness_path)
        .await
        .with_context(|| format!("Failed to read freshness results: {}", freshness_path.display()))?;
    let volume: VolumeResults = read_handoff(volume_path)
        .await
        .with_context(|| format!("Failed to read volume results: {}", volume_path.display()))?;

    let report = ReportGenerator::new(&monitoring).generate(freshness, volume);

    if let Some(path) = output_path {
        write_handoff(path, &report)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    output::print_monitoring_report(&report, format);
    Ok(())
}
