use colored::*;
use quality_core::{FailureKind, ValidationRun};
use quality_monitor::{FreshnessEntry, MonitoringReport, VolumeEntry};
use serde_json::json;

pub fn print_validation_run(run: &ValidationRun, format: &str) {
    match format {
        "json" => print_json_run(run),
        _ => print_text_run(run),
    }
}

fn print_text_run(run: &ValidationRun) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  VALIDATION REPORT".bold());
    println!("{}", "═".repeat(60));

    for layer in &run.layers {
        println!("\n{} {}", "Layer:".bold(), layer.layer_name.bold());

        for result in layer.dataset_results.values() {
            if result.passed {
                println!("  {} {}", "✓".green().bold(), result.dataset_name.green());
                continue;
            }

            println!("  {} {}", "✗".red().bold(), result.dataset_name.red().bold());
            for failure in &result.failures {
                let line = failure.to_string();
                if failure.expectation_kind.is_data_quality() {
                    println!("      - {}", line.red());
                } else {
                    println!("      - {}", line.yellow());
                }
            }
        }
    }

    println!("\n{}", "Summary:".bold());
    for layer in &run.layers {
        let status = if layer.passed {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "  {:<12} {} ({}/{} datasets passed)",
            layer.layer_name,
            status,
            layer.dataset_results.len() - layer.failed_count(),
            layer.dataset_results.len()
        );
    }

    if run.passed() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }
    println!("{}", "═".repeat(60));
}

fn print_json_run(run: &ValidationRun) {
    let failures = |kind: fn(&FailureKind) -> bool| {
        run.layers
            .iter()
            .flat_map(|l| l.dataset_results.values())
            .flat_map(|r| r.failures.iter())
            .filter(|f| kind(&f.expectation_kind))
            .count()
    };

    let output = json!({
        "passed": run.passed(),
        "generated_at": run.generated_at,
        "layers": run.layers,
        "summary": {
            "data_quality_failures": failures(FailureKind::is_data_quality),
            "other_failures": failures(|k| !k.is_data_quality()),
        }
    });

    print_json(&output);
}

pub fn print_monitoring_report(report: &MonitoringReport, format: &str) {
    match format {
        "json" => print_json(report),
        _ => print_text_report(report),
    }
}

fn print_text_report(report: &MonitoringReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  MONITORING REPORT".bold());
    println!("{}", "═".repeat(60));

    if !report.freshness.is_empty() {
        println!("\n{}", "Freshness:".bold());
        for (table, entry) in &report.freshness {
            match entry {
                FreshnessEntry::Measured {
                    hours_since_update,
                    row_count,
                } => println!(
                    "  {}  {}h since update, {} rows",
                    table, hours_since_update, row_count
                ),
                FreshnessEntry::Error { error } => {
                    println!("  {}  {}", table, format!("error: {}", error).yellow())
                }
            }
        }
    }

    if !report.volume_trends.is_empty() {
        println!("\n{}", "Volume trends:".bold());
        for (table, entry) in &report.volume_trends {
            match entry {
                VolumeEntry::Series(samples) => {
                    let counts: Vec<String> =
                        samples.iter().map(|s| s.daily_count.to_string()).collect();
                    println!("  {}  [{}]", table, counts.join(", "));
                }
                VolumeEntry::Error { error } => {
                    println!("  {}  {}", table, format!("error: {}", error).yellow())
                }
            }
        }
    }

    println!();
    for line in report.summary().lines() {
        if line.starts_with("- ") {
            println!("{}", line.red());
        } else {
            println!("{}", line.bold());
        }
    }
    println!("{}", "═".repeat(60));
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => print_error(&format!("Failed to encode JSON: {}", err)),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

