mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dqe")]
#[command(version, about = "Data Quality Engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate pipeline layers against their expectation documents
    Validate {
        /// Path to the pipeline configuration (TOML)
        config: PathBuf,

        /// Validate only this layer (default: all layers)
        #[arg(short, long)]
        layer: Option<String>,

        /// Read sample files instead of full sources (also USE_SAMPLE_FILES=true)
        #[arg(long)]
        sample_files: bool,

        /// Write HTML data docs into this directory
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check an expectation document without validating data
    Check {
        /// Path to the expectation document (JSON or YAML)
        expectations: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run freshness and volume monitoring against a warehouse snapshot
    Monitor {
        /// Warehouse snapshot (JSON)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Pipeline configuration providing thresholds and tables
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference time (RFC 3339) for freshness and windows (default: now)
        #[arg(long)]
        now: Option<String>,

        /// Write freshness results to this hand-off file
        #[arg(long)]
        freshness_out: Option<PathBuf>,

        /// Write volume results to this hand-off file
        #[arg(long)]
        volume_out: Option<PathBuf>,

        /// Write the full report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Merge freshness and volume hand-off files into a monitoring report
    Report {
        /// Freshness results written by `monitor --freshness-out`
        #[arg(long)]
        freshness: PathBuf,

        /// Volume results written by `monitor --volume-out`
        #[arg(long)]
        volume: PathBuf,

        /// Pipeline configuration providing thresholds
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Run a command with bounded retries
    Exec {
        /// Maximum number of attempts
        #[arg(long, default_value_t = quality_core::DEFAULT_MAX_ATTEMPTS)]
        attempts: u32,

        /// Seconds to wait between attempts
        #[arg(long, default_value_t = quality_core::DEFAULT_BACKOFF.as_secs())]
        backoff_secs: u64,

        /// Treat any failure as success after logging it
        #[arg(long)]
        ignore_errors: bool,

        /// Exit codes that are accepted without retrying
        #[arg(long = "ignore-exit-code")]
        ignore_exit_codes: Vec<i32>,

        /// Command and arguments
        #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Validate {
            config,
            layer,
            sample_files,
            docs,
            format,
        } => {
            commands::validate::execute(&config, layer.as_deref(), sample_files, docs.as_deref(), &format)
                .await
        }

        Commands::Check {
            expectations,
            format,
        } => commands::check::execute(&expectations, &format).await,

        Commands::Monitor {
            snapshot,
            config,
            now,
            freshness_out,
            volume_out,
            output,
            format,
        } => {
            commands::monitor::execute(commands::monitor::MonitorArgs {
                snapshot,
                config,
                now,
                freshness_out,
                volume_out,
                output,
                format,
            })
            .await
        }

        Commands::Report {
            freshness,
            volume,
            config,
            output,
            format,
        } => {
            commands::report::execute(&freshness, &volume, config.as_deref(), output.as_deref(), &format)
                .await
        }

        Commands::Exec {
            attempts,
            backoff_secs,
            ignore_errors,
            ignore_exit_codes,
            command,
        } => commands::exec::execute(attempts, backoff_secs, ignore_errors, ignore_exit_codes, &command).await,
    }
}
