//! Alerts and the merged monitoring report.
//!
//! The [`ReportGenerator`] merges freshness and volume results that may have
//! been produced by separate runs and re-derives every alert from the raw
//! measurements, so a report never depends on flags computed upstream.

use crate::{
    DailyCount, FreshnessMonitor, FreshnessResults, Result, VolumeEntry, VolumeResults,
    VolumeTrendMonitor, Warehouse, anomaly_alerts, day_over_day, stale_alerts,
};
use chrono::{DateTime, NaiveDate, Utc};
use quality_core::MonitoringConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Kind of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    StaleData,
    VolumeAnomaly,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleData => write!(f, "stale_data"),
            Self::VolumeAnomaly => write!(f, "volume_anomaly"),
        }
    }
}

/// A monitoring finding for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Alert {
    StaleData {
        table: String,
        hours_since_update: i64,
        message: String,
    },
    VolumeAnomaly {
        table: String,
        date: NaiveDate,
        change_pct: f64,
        message: String,
    },
}

impl Alert {
    pub fn stale_data(table: &str, hours_since_update: i64) -> Self {
        Self::StaleData {
            table: table.to_string(),
            hours_since_update,
            message: format!(
                "Data in {} is stale! Last update was {} hours ago.",
                table, hours_since_update
            ),
        }
    }

    pub fn volume_anomaly(table: &str, date: NaiveDate, change_pct: f64) -> Self {
        Self::VolumeAnomaly {
            table: table.to_string(),
            date,
            change_pct,
            message: format!(
                "Significant volume change in {} on {}: {:.2}% change",
                table, date, change_pct
            ),
        }
    }

    pub fn kind(&self) -> AlertKind {
        match self {
            Self::StaleData { .. } => AlertKind::StaleData,
            Self::VolumeAnomaly { .. } => AlertKind::VolumeAnomaly,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            Self::StaleData { table, .. } | Self::VolumeAnomaly { table, .. } => table,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::StaleData { message, .. } | Self::VolumeAnomaly { message, .. } => message,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::StaleData { .. } => None,
            Self::VolumeAnomaly { date, .. } => Some(*date),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Merged freshness and volume results with their alerts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringReport {
    /// When the report was generated
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "data_freshness")]
    pub freshness: FreshnessResults,

    pub volume_trends: VolumeResults,

    /// Ordered by table, then kind (stale data first), then date
    pub alerts: Vec<Alert>,
}

impl MonitoringReport {
    pub fn alerts_of(&self, kind: AlertKind) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.kind() == kind)
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Plain-text summary: timestamp, alert count, one line per alert.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Monitoring Report Generated: {}", self.timestamp.to_rfc3339()),
            format!("Total Alerts: {}", self.alerts.len()),
        ];
        lines.extend(self.alerts.iter().map(|a| format!("- {}", a.message())));
        lines.join("\n")
    }
}

/// Builds monitoring reports from freshness and volume results.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    staleness_threshold_hours: i64,
    volume_change_threshold_pct: f64,
}

impl ReportGenerator {
    pub fn new(config: &MonitoringConfig) -> Self {
        Self {
            staleness_threshold_hours: config.staleness_threshold_hours,
            volume_change_threshold_pct: config.volume_change_threshold_pct,
        }
    }

    /// Generates a report stamped with the current time.
    pub fn generate(&self, freshness: FreshnessResults, volume: VolumeResults) -> MonitoringReport {
        self.generate_at(freshness, volume, Utc::now())
    }

    /// Generates a report stamped with `timestamp`.
    ///
    /// Volume changes are recomputed from the daily counts; either input may
    /// be empty.
    pub fn generate_at(
        &self,
        freshness: FreshnessResults,
        volume: VolumeResults,
        timestamp: DateTime<Utc>,
    ) -> MonitoringReport {
        let volume_trends: VolumeResults = volume
            .into_iter()
            .map(|(table, entry)| {
                let entry = match entry {
                    VolumeEntry::Series(samples) => {
                        let counts: Vec<DailyCount> = samples
                            .iter()
                            .map(|s| DailyCount::new(s.date, s.daily_count))
                            .collect();
                        VolumeEntry::Series(day_over_day(&counts))
                    }
                    error => error,
                };
                (table, entry)
            })
            .collect();

        let mut alerts = stale_alerts(&freshness, self.staleness_threshold_hours);
        for (table, entry) in &volume_trends {
            if let VolumeEntry::Series(samples) = entry {
                alerts.extend(anomaly_alerts(table, samples, self.volume_change_threshold_pct));
            }
        }
        alerts.sort_by(|a, b| {
            (a.table(), a.kind(), a.date()).cmp(&(b.table(), b.kind(), b.date()))
        });

        debug!(
            "Report merged {} freshness and {} volume entries",
            freshness.len(),
            volume_trends.len()
        );

        MonitoringReport {
            timestamp,
            freshness,
            volume_trends,
            alerts,
        }
    }
}

/// Runs both monitors over the configured tables and merges their results.
///
/// # Errors
///
/// Fails only if `config` is unusable; per-table fetch failures are recorded
/// in the report.
pub async fn run_monitoring(
    warehouse: &dyn Warehouse,
    config: &MonitoringConfig,
) -> Result<MonitoringReport> {
    config.validate()?;
    info!("Monitoring {} tables", config.tables.len());

    let freshness = FreshnessMonitor::new(warehouse, config.staleness_threshold_hours);
    let volume = VolumeTrendMonitor::new(
        warehouse,
        config.volume_change_threshold_pct,
        config.window_days,
    );
    let (freshness, volume) =
        futures::join!(freshness.check(&config.tables), volume.check(&config.tables));

    let report = ReportGenerator::new(config).generate(freshness.results, volume.results);
    info!("Monitoring report has {} alerts", report.alerts.len());
    Ok(report)
}

/// Reads a hand-off file; a missing or blank file yields an empty value.
pub async fn read_handoff<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("Hand-off file {} not found, using empty input", path.display());
            return Ok(T::default());
        }
        Err(err) => return Err(err.into()),
    };

    if content.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&content)?)
}

/// Writes a value as pretty-printed JSON.
pub async fn write_handoff<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
