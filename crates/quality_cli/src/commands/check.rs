use anyhow::{Context, Result};
use quality_parser::parse_file;
use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::output;

pub async fn execute(expectations_path: &Path, format: &str) -> Result<()> {
    info!("Checking expectation document: {}", expectations_path.display());

    let suite = parse_file(expectations_path).with_context(|| {
        format!(
            "Failed to parse expectation document: {}",
            expectations_path.display()
        )
    })?;

    if format == "json" {
        let output = json!({
            "expectations": suite.expectations,
            "ignored": suite.ignored,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::print_success("Expectation document is valid");

    println!("\nExpectations ({}):", suite.len());
    for (i, expectation) in suite.iter().enumerate() {
        println!("  {}. {}", i + 1, expectation);
    }

    if !suite.ignored.is_empty() {
        println!("\nIgnored (unrecognized types):");
        for expectation_type in &suite.ignored {
            println!("  - {}", expectation_type);
        }
    }

    Ok(())
}
