//! Volume trend monitoring.
//!
//! Daily row counts are compared with the previous day of the same table.
//! A day whose absolute percentage change exceeds the threshold is an anomaly.

use crate::{Alert, DailyCount, Warehouse};
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Volume results keyed by table.
pub type VolumeResults = BTreeMap<String, VolumeEntry>;

/// One day of a table's volume series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSample {
    #[serde(alias = "process_date")]
    pub date: NaiveDate,

    pub daily_count: u64,

    /// Count of the preceding day in the series
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_count: Option<u64>,

    /// `None` for the first day and when the previous count is zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_over_day_change_pct: Option<f64>,
}

/// Volume outcome for one table: a daily series or a captured error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeEntry {
    Series(Vec<VolumeSample>),
    Error { error: String },
}

impl VolumeEntry {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Percentage change from `previous` to `current`; `None` when `previous` is zero.
pub fn change_pct(previous: u64, current: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

/// Anomaly predicate; a change equal to the threshold is not anomalous.
pub fn is_anomalous(change_pct: f64, threshold_pct: f64) -> bool {
    change_pct.abs() > threshold_pct
}

/// Orders counts by date and computes each day's change against the day before.
pub fn day_over_day(counts: &[DailyCount]) -> Vec<VolumeSample> {
    let mut sorted = counts.to_vec();
    sorted.sort_by_key(|c| c.date);

    let mut previous: Option<u64> = None;
    sorted
        .into_iter()
        .map(|count| {
            let sample = VolumeSample {
                date: count.date,
                daily_count: count.daily_count,
                previous_count: previous,
                day_over_day_change_pct: previous.and_then(|p| change_pct(p, count.daily_count)),
            };
            previous = Some(count.daily_count);
            sample
        })
        .collect()
}

/// Volume-anomaly alerts for one table, one per offending day in date order.
pub fn anomaly_alerts(table: &str, samples: &[VolumeSample], threshold_pct: f64) -> Vec<Alert> {
    samples
        .iter()
        .filter_map(|sample| {
            sample
                .day_over_day_change_pct
                .filter(|pct| is_anomalous(*pct, threshold_pct))
                .map(|pct| Alert::volume_anomaly(table, sample.date, pct))
        })
        .collect()
}

/// Output of a volume run.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeCheck {
    pub results: VolumeResults,
    pub alerts: Vec<Alert>,
}

/// Tracks day-over-day volume changes per table.
pub struct VolumeTrendMonitor<'a> {
    warehouse: &'a dyn Warehouse,
    threshold_pct: f64,
    window_days: u32,
}

impl<'a> VolumeTrendMonitor<'a> {
    pub fn new(warehouse: &'a dyn Warehouse, threshold_pct: f64, window_days: u32) -> Self {
        Self {
            warehouse,
            threshold_pct,
            window_days,
        }
    }

    pub async fn measure(&self, table: &str) -> VolumeEntry {
        match self.warehouse.fetch_daily_counts(table, self.window_days).await {
            Ok(counts) => VolumeEntry::Series(day_over_day(&counts)),
            Err(err) => {
                warn!("Error checking volume trends for {}: {}", table, err);
                VolumeEntry::error(err.to_string())
            }
        }
    }

    /// Measures every table concurrently and derives volume-anomaly alerts.
    pub async fn check(&self, tables: &[String]) -> VolumeCheck {
        let entries = join_all(tables.iter().map(|table| self.measure(table))).await;
        let results: VolumeResults = tables.iter().cloned().zip(entries).collect();

        let alerts: Vec<Alert> = results
            .iter()
            .filter_map(|(table, entry)| match entry {
                VolumeEntry::Series(samples) => Some(anomaly_alerts(table, samples, self.threshold_pct)),
                VolumeEntry::Error { .. } => None,
            })
            .flatten()
            .collect();

        for alert in &alerts {
            warn!("ALERT: {}", alert.message());
        }
        info!(
            "Volume trends checked for {} tables, {} anomalies",
            results.len(),
            alerts.len()
        );

        VolumeCheck { results, alerts }
    }
}
