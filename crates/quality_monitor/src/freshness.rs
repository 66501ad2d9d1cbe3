//! Freshness monitoring.

use crate::{Alert, Warehouse};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Freshness results keyed by table.
pub type FreshnessResults = BTreeMap<String, FreshnessEntry>;

/// Freshness outcome for one table.
///
/// Serialized untagged: `{"hours_since_update": 3, "row_count": 120}` or
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FreshnessEntry {
    Measured {
        hours_since_update: i64,
        row_count: u64,
    },
    Error {
        error: String,
    },
}

impl FreshnessEntry {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Hours since update, if the table was measured.
    pub fn hours_since_update(&self) -> Option<i64> {
        match self {
            Self::Measured {
                hours_since_update, ..
            } => Some(*hours_since_update),
            Self::Error { .. } => None,
        }
    }
}

/// Staleness predicate; the threshold itself is not stale.
pub fn is_stale(hours_since_update: i64, threshold_hours: i64) -> bool {
    hours_since_update > threshold_hours
}

/// Stale-data alerts for every measured table over the threshold, in table order.
pub fn stale_alerts(results: &FreshnessResults, threshold_hours: i64) -> Vec<Alert> {
    results
        .iter()
        .filter_map(|(table, entry)| {
            entry
                .hours_since_update()
                .filter(|hours| is_stale(*hours, threshold_hours))
                .map(|hours| Alert::stale_data(table, hours))
        })
        .collect()
}

/// Output of a freshness run.
#[derive(Debug, Clone, PartialEq)]
pub struct FreshnessCheck {
    pub results: FreshnessResults,
    pub alerts: Vec<Alert>,
}

/// Checks how recently each table was updated.
pub struct FreshnessMonitor<'a> {
    warehouse: &'a dyn Warehouse,
    threshold_hours: i64,
}

impl<'a> FreshnessMonitor<'a> {
    pub fn new(warehouse: &'a dyn Warehouse, threshold_hours: i64) -> Self {
        Self {
            warehouse,
            threshold_hours,
        }
    }

    /// Measures one table.
    ///
    /// Empty tables and tables without a readable timestamp become error
    /// entries rather than stale ones.
    pub async fn measure(&self, table: &str) -> FreshnessEntry {
        match self.warehouse.fetch_freshness(table).await {
            Ok(freshness) if freshness.row_count == 0 => FreshnessEntry::error("table has no rows"),
            Ok(freshness) => match freshness.hours_since_update {
                Some(hours_since_update) => FreshnessEntry::Measured {
                    hours_since_update,
                    row_count: freshness.row_count,
                },
                None => FreshnessEntry::error("no readable processed_at timestamp"),
            },
            Err(err) => {
                warn!("Error checking freshness for {}: {}", table, err);
                FreshnessEntry::error(err.to_string())
            }
        }
    }

    /// Measures every table concurrently and derives stale-data alerts.
    pub async fn check(&self, tables: &[String]) -> FreshnessCheck {
        let entries = join_all(tables.iter().map(|table| self.measure(table))).await;
        let results: FreshnessResults = tables.iter().cloned().zip(entries).collect();
        let alerts = stale_alerts(&results, self.threshold_hours);

        for alert in &alerts {
            warn!("ALERT: {}", alert.message());
        }
        info!(
            "Freshness checked for {} tables, {} stale",
            results.len(),
            alerts.len()
        );

        FreshnessCheck { results, alerts }
    }
}
