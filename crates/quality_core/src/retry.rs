//! Bounded retry policy for external pipeline steps.
//!
//! Transformation and test steps run as external commands. The policy decides,
//! after every attempt, whether to stop, retry after a fixed backoff, or accept a
//! failure as ignorable. Execution itself lives with the caller.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(5);

/// What to do after an attempt finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The attempt succeeded
    Succeeded,
    /// Run another attempt after the given delay
    Retry(Duration),
    /// The attempt failed in a way the policy tolerates; stop without error
    Ignored,
    /// Attempts are exhausted; stop with an error
    Failed,
}

/// Retry policy: N attempts, fixed backoff, fatal vs ignorable exit codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub max_attempts: u32,

    /// Fixed delay between attempts
    pub backoff: Duration,

    /// Treat every non-zero exit as ignorable
    #[serde(default)]
    pub ignore_failures: bool,

    /// Exit codes that are ignorable even when `ignore_failures` is off
    #[serde(default)]
    pub ignorable_exit_codes: Vec<i32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            ignore_failures: false,
            ignorable_exit_codes: Vec::new(),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with `max_attempts` attempts and the default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Sets the delay between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Tolerates every failure.
    pub fn ignoring_failures(mut self, ignore: bool) -> Self {
        self.ignore_failures = ignore;
        self
    }

    /// Tolerates a specific exit code.
    pub fn with_ignorable_exit_code(mut self, code: i32) -> Self {
        self.ignorable_exit_codes.push(code);
        self
    }

    /// Decides what happens after attempt number `attempt` (1-based).
    ///
    /// `exit_code` is `None` when the process was killed by a signal or could not
    /// be started; such attempts are retried like any other failure.
    pub fn decide(&self, attempt: u32, exit_code: Option<i32>) -> RetryDecision {
        match exit_code {
            Some(0) => RetryDecision::Succeeded,
            Some(code) if self.ignore_failures || self.ignorable_exit_codes.contains(&code) => {
                RetryDecision::Ignored
            }
            None if self.ignore_failures => RetryDecision::Ignored,
            _ if attempt < self.max_attempts => RetryDecision::Retry(self.backoff),
            _ => RetryDecision::Failed,
        }
    }
}
