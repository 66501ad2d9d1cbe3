use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quality_monitor::{
    FreshnessMonitor, ReportGenerator, SnapshotWarehouse, VolumeTrendMonitor, WarehouseSnapshot,
    write_handoff,
};
use std::path::PathBuf;
use tracing::info;

use crate::commands::load_monitoring;
use crate::output;

pub struct MonitorArgs {
    pub snapshot: PathBuf,
    pub config: Option<PathBuf>,
    pub now: Option<String>,
    pub freshness_out: Option<PathBuf>,
    pub volume_out: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: String,
}

pub async fn execute(args: MonitorArgs) -> Result<()> {
    let now_override = match &args.now {
        Some(text) => Some(
            DateTime::parse_from_rfc3339(text)
                .with_context(|| format!("Invalid --now timestamp: {}", text))?
                .with_timezone(&Utc),
        ),
        None => None,
    };

    let monitoring = load_monitoring(args.config.as_deref())?;
    monitoring
        .validate()
        .context("Invalid monitoring configuration")?;

    info!("Loading warehouse snapshot: {}", args.snapshot.display());
    let snapshot = WarehouseSnapshot::load(&args.snapshot)
        .await
        .with_context(|| format!("Failed to load warehouse snapshot: {}", args.snapshot.display()))?;
    let now = now_override.or(snapshot.now).unwrap_or_else(Utc::now);
    info!("Measuring relative to {}", now.to_rfc3339());
    let warehouse = SnapshotWarehouse::new(snapshot, now);

    let freshness = FreshnessMonitor::new(&warehouse, monitoring.staleness_threshold_hours);
    let volume = VolumeTrendMonitor::new(
        &warehouse,
        monitoring.volume_change_threshold_pct,
        monitoring.window_days,
    );
    let (freshness, volume) = tokio::join!(
        freshness.check(&monitoring.tables),
        volume.check(&monitoring.tables)
    );

    if let Some(path) = &args.freshness_out {
        write_handoff(path, &freshness.results)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.volume_out {
        write_handoff(path, &volume.results)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let report = ReportGenerator::new(&monitoring).generate_at(freshness.results, volume.results, now);

    if let Some(path) = &args.output {
        write_handoff(path, &report)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    output::print_monitoring_report(&report, &args.format);
    Ok(())
}
