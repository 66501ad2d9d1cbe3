//! Warehouse access.
//!
//! The [`Warehouse`] trait is the only I/O boundary of the monitors. Each call
//! fetches metrics for one table and reports failure as an error value.

use crate::{MonitorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Latest-update metrics for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFreshness {
    /// Whole hours since the newest `processed_at`, truncated; `None` if unreadable
    pub hours_since_update: Option<i64>,

    /// Total rows in the table
    pub row_count: u64,
}

/// Rows processed on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    #[serde(alias = "process_date")]
    pub date: NaiveDate,
    pub daily_count: u64,
}

impl DailyCount {
    pub fn new(date: NaiveDate, daily_count: u64) -> Self {
        Self { date, daily_count }
    }
}

/// Query interface of the warehouse holding the monitored tables.
#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Fetches the freshness metrics of `table`.
    async fn fetch_freshness(&self, table: &str) -> Result<TableFreshness>;

    /// Fetches per-day row counts of `table` for the trailing `window_days` days.
    async fn fetch_daily_counts(&self, table: &str, window_days: u32) -> Result<Vec<DailyCount>>;
}

#[derive(Debug, Clone)]
enum StoredTable {
    Metrics {
        freshness: TableFreshness,
        daily_counts: Vec<DailyCount>,
    },
    Failing(String),
}

/// Warehouse answering from fixed, in-memory metrics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouse {
    tables: HashMap<String, StoredTable>,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table with its freshness metrics and daily counts.
    pub fn with_table(
        mut self,
        table: impl Into<String>,
        freshness: TableFreshness,
        daily_counts: Vec<DailyCount>,
    ) -> Self {
        self.tables.insert(
            table.into(),
            StoredTable::Metrics {
                freshness,
                daily_counts,
            },
        );
        self
    }

    /// Registers a table whose every query fails with `message`.
    pub fn with_failing_table(mut self, table: impl Into<String>, message: impl Into<String>) -> Self {
        self.tables
            .insert(table.into(), StoredTable::Failing(message.into()));
        self
    }

    fn get(&self, table: &str) -> Result<(&TableFreshness, &[DailyCount])> {
        match self.tables.get(table) {
            Some(StoredTable::Metrics {
                freshness,
                daily_counts,
            }) => Ok((freshness, daily_counts.as_slice())),
            Some(StoredTable::Failing(message)) => Err(MonitorError::fetch(table, message.clone())),
            None => Err(MonitorError::TableNotFound(table.to_string())),
        }
    }
}

#[async_trait]
impl Warehouse for InMemoryWarehouse {
    async fn fetch_freshness(&self, table: &str) -> Result<TableFreshness> {
        self.get(table).map(|(freshness, _)| *freshness)
    }

    async fn fetch_daily_counts(&self, table: &str, _window_days: u32) -> Result<Vec<DailyCount>> {
        self.get(table).map(|(_, counts)| counts.to_vec())
    }
}

/// One table in a warehouse snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotTable {
    /// Processing timestamps, one per row
    Rows { processed_at: Vec<DateTime<Utc>> },
    /// The table cannot be queried
    Failed { error: String },
}

/// Snapshot file layout: `{"now": "...", "tables": {"<table>": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WarehouseSnapshot {
    /// Reference time the snapshot was taken at, if recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub now: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tables: HashMap<String, SnapshotTable>,
}

impl WarehouseSnapshot {
    /// Parses a snapshot from JSON text.
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| MonitorError::Snapshot(e.to_string()))
    }

    /// Reads a snapshot file.
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading warehouse snapshot from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }
}

/// Warehouse backed by a JSON snapshot of per-row processing timestamps.
///
/// Metrics are computed relative to an injected `now`, so results do not
/// depend on the wall clock.
#[derive(Debug, Clone)]
pub struct SnapshotWarehouse {
    snapshot: WarehouseSnapshot,
    now: DateTime<Utc>,
}

impl SnapshotWarehouse {
    pub fn new(snapshot: WarehouseSnapshot, now: DateTime<Utc>) -> Self {
        Self { snapshot, now }
    }

    /// Parses a snapshot from JSON text, measuring relative to `now`.
    pub fn from_json(content: &str, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(WarehouseSnapshot::from_json(content)?, now))
    }

    /// Reads a snapshot file, measuring relative to `now`.
    pub async fn load(path: &Path, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self::new(WarehouseSnapshot::load(path).await?, now))
    }

    fn rows(&self, table: &str) -> Result<&[DateTime<Utc>]> {
        match self.snapshot.tables.get(table) {
            Some(SnapshotTable::Rows { processed_at }) => Ok(processed_at.as_slice()),
            Some(SnapshotTable::Failed { error }) => Err(MonitorError::fetch(table, error.clone())),
            None => Err(MonitorError::TableNotFound(table.to_string())),
        }
    }
}

#[async_trait]
impl Warehouse for SnapshotWarehouse {
    async fn fetch_freshness(&self, table: &str) -> Result<TableFreshness> {
        let rows = self.rows(table)?;
        let hours_since_update = rows
            .iter()
            .max()
            .map(|latest| (self.now - *latest).num_hours());

        Ok(TableFreshness {
            hours_since_update,
            row_count: rows.len() as u64,
        })
    }

    async fn fetch_daily_counts(&self, table: &str, window_days: u32) -> Result<Vec<DailyCount>> {
        let cutoff = self.now - Duration::days(i64::from(window_days));
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();

        for ts in self.rows(table)?.iter().filter(|ts| **ts > cutoff) {
            *counts.entry(ts.date_naive()).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(date, daily_count)| DailyCount { date, daily_count })
            .collect())
    }
}
