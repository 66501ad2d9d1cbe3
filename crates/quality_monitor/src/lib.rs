//! Freshness and volume monitoring for warehouse tables.
//!
//! This crate watches the tables produced by a pipeline for two kinds of
//! trouble: data that has not been refreshed recently (staleness) and
//! day-over-day row count swings (volume anomalies). Table metrics come from a
//! [`Warehouse`] implementation; fetch failures are recorded per table and
//! never abort the rest of the run.
//!
//! # Example
//!
//! ```no_run
//! use quality_core::MonitoringConfig;
//! use quality_monitor::{SnapshotWarehouse, run_monitoring};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let warehouse = SnapshotWarehouse::load(Path::new("warehouse.json"), chrono::Utc::now()).await?;
//! let config = MonitoringConfig::builder()
//!     .table("medallion-dev.bronze.contracts")
//!     .build()?;
//!
//! let report = run_monitoring(&warehouse, &config).await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

use quality_core::QualityError;
use thiserror::Error;

mod config;
mod freshness;
mod report;
mod volume;
mod warehouse;

pub use config::*;
pub use freshness::*;
pub use report::*;
pub use volume::*;
pub use warehouse::*;

/// Error types for monitoring operations.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Query against a table failed
    #[error("Failed to query table '{table}': {message}")]
    Fetch { table: String, message: String },

    /// Table is unknown to the warehouse
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Warehouse snapshot could not be read
    #[error("Invalid warehouse snapshot: {0}")]
    Snapshot(String),

    /// Monitoring settings are unusable
    #[error(transparent)]
    Configuration(#[from] QualityError),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Creates a new fetch error.
    pub fn fetch(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for monitoring operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
