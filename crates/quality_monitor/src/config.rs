//! Default table lists for medallion pipelines.

use quality_core::MonitoringConfig;

/// Environment variable naming the warehouse project.
pub const PROJECT_ID_ENV: &str = "GCP_PROJECT_ID";
/// Environment variable naming the bronze dataset.
pub const BRONZE_DATASET_ENV: &str = "BIGQUERY_DATASET_BRONZE";
/// Environment variable naming the silver dataset prefix.
pub const SILVER_DATASET_ENV: &str = "BIGQUERY_DATASET_SILVER";
/// Environment variable naming the gold dataset prefix.
pub const GOLD_DATASET_ENV: &str = "BIGQUERY_DATASET_GOLD";

/// Project and dataset names of a medallion warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedallionDatasets {
    pub project: String,
    pub bronze: String,
    pub silver: String,
    pub gold: String,
}

impl Default for MedallionDatasets {
    fn default() -> Self {
        Self {
            project: "medallion-dev".to_string(),
            bronze: "bronze".to_string(),
            silver: "medallion_pipeline_silver".to_string(),
            gold: "medallion_pipeline_gold".to_string(),
        }
    }
}

impl MedallionDatasets {
    /// Reads names from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads names through `lookup`; unset or blank values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str, default: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };

        Self {
            project: get(PROJECT_ID_ENV, defaults.project),
            bronze: get(BRONZE_DATASET_ENV, defaults.bronze),
            silver: get(SILVER_DATASET_ENV, defaults.silver),
            gold: get(GOLD_DATASET_ENV, defaults.gold),
        }
    }

    /// The eight tables produced by the bronze, silver and gold layers.
    ///
    /// Silver and gold datasets carry a `_silver`/`_gold` suffix.
    pub fn tables(&self) -> Vec<String> {
        let Self {
            project,
            bronze,
            silver,
            gold,
        } = self;

        vec![
            format!("{project}.{bronze}.contracts"),
            format!("{project}.{bronze}.budgets"),
            format!("{project}.{bronze}.change_orders"),
            format!("{project}.{silver}_silver.contracts_silver"),
            format!("{project}.{silver}_silver.budgets_silver"),
            format!("{project}.{silver}_silver.change_orders_silver"),
            format!("{project}.{gold}_gold.contract_analytics"),
            format!("{project}.{gold}_gold.project_analytics"),
        ]
    }
}

/// Fills an empty table list with the medallion tables of `datasets`.
pub fn with_default_tables(mut config: MonitoringConfig, datasets: &MedallionDatasets) -> MonitoringConfig {
    if config.tables.is_empty() {
        config.tables = datasets.tables();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_default_tables() {
        let tables = MedallionDatasets::default().tables();
        assert_eq!(tables.len(), 8);
        assert_eq!(tables[0], "medallion-dev.bronze.contracts");
        assert_eq!(
            tables[3],
            "medallion-dev.medallion_pipeline_silver_silver.contracts_silver"
        );
        assert_eq!(
            tables[7],
            "medallion-dev.medallion_pipeline_gold_gold.project_analytics"
        );
    }

    #[test]
    fn test_from_lookup_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (PROJECT_ID_ENV, "acme-prod"),
            (SILVER_DATASET_ENV, "refined"),
            (GOLD_DATASET_ENV, "  "),
        ]);
        let datasets = MedallionDatasets::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(datasets.project, "acme-prod");
        assert_eq!(datasets.bronze, "bronze");
        assert_eq!(datasets.silver, "refined");
        assert_eq!(datasets.gold, "medallion_pipeline_gold");
        assert_eq!(datasets.tables()[4], "acme-prod.refined_silver.budgets_silver");
    }

    #[test]
    fn test_configured_tables_are_kept() {
        let config = MonitoringConfig {
            tables: vec!["p.d.t".to_string()],
            ..Default::default()
        };
        let config = with_default_tables(config, &MedallionDatasets::default());
        assert_eq!(config.tables, vec!["p.d.t".to_string()]);

        let config = with_default_tables(MonitoringConfig::default(), &MedallionDatasets::default());
        assert_eq!(config.tables.len(), 8);
    }
}
