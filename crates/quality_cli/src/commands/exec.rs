use anyhow::{Result, bail};
use quality_core::{RetryDecision, RetryPolicy};
use std::time::Duration;
use tracing::{info, warn};

pub async fn execute(
    attempts: u32,
    backoff_secs: u64,
    ignore_errors: bool,
    ignore_exit_codes: Vec<i32>,
    command: &[String],
) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        bail!("No command given");
    };

    let policy = ignore_exit_codes.into_iter().fold(
        RetryPolicy::new(attempts)
            .with_backoff(Duration::from_secs(backoff_secs))
            .ignoring_failures(ignore_errors),
        RetryPolicy::with_ignorable_exit_code,
    );

    let mut attempt = 1;
    loop {
        info!("Running '{}' (attempt {}/{})", command.join(" "), attempt, policy.max_attempts);

        let exit_code = match tokio::process::Command::new(program).args(args).status().await {
            Ok(status) => status.code(),
            Err(err) => {
                warn!("Failed to start '{}': {}", program, err);
                None
            }
        };

        match policy.decide(attempt, exit_code) {
            RetryDecision::Succeeded => return Ok(()),
            RetryDecision::Ignored => {
                warn!("Command failed with exit code {:?}, ignoring", exit_code);
                return Ok(());
            }
            RetryDecision::Retry(backoff) => {
                warn!(
                    "Command failed with exit code {:?}, retrying in {}s",
                    exit_code,
                    backoff.as_secs()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            RetryDecision::Failed => {
                bail!("Command '{}' failed after {} attempts", command.join(" "), attempt)
            }
        }
    }
}
