//! # Scheduling Policy
//!
//! Retry ceiling, retry backoff and the effect of a fatal failure on dependents.
//! The defaults reproduce the historical scheduler: unlimited immediate retries, and
//! a fatal failure releases dependents exactly like a success does.

use crate::config::{BackoffConfig, SchedulerConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a fatal failure means for the tasks that depend on it.
///
/// This is a behavioural decision for the team adopting the scheduler, not a detail:
/// `UnblockDependents` lets the rest of the plan proceed after a failed step, while
/// `BlockDependents` stops every downstream task of the failed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalFailurePolicy {
    /// A fatal failure completes the task and releases its dependents
    #[default]
    UnblockDependents,
    /// Dependents of a fatally failed task, and their dependents, are skipped
    BlockDependents,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts allowed before a retryable failure escalates to fatal; `None` is unbounded
    pub max_attempts: Option<u32>,
    pub initial_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(None, &BackoffConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(max_attempts: Option<u32>, backoff: &BackoffConfig) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(backoff.initial_delay_ms),
            multiplier: backoff.multiplier,
            max_delay: Duration::from_millis(backoff.max_delay_ms),
        }
    }

    /// Unbounded, immediate retries
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// At most `max_attempts` attempts, retried immediately
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Self::default()
        }
    }

    pub fn with_backoff(
        mut self,
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Self {
        self.initial_delay = initial_delay;
        self.multiplier = multiplier;
        self.max_delay = max_delay;
        self
    }

    /// Whether another attempt may follow `attempts_made` failed ones
    pub fn allows_retry(&self, attempts_made: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts_made < max)
    }

    /// Delay before retry number `retry` (1-based): `initial * multiplier^(retry - 1)`, capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled_nanos =
            (self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent)).round();
        if !scaled_nanos.is_finite() || scaled_nanos >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }
        Duration::from_nanos(scaled_nanos as u64)
    }
}

/// Everything the execute-tasks phase needs to decide what happens after a dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulerPolicy {
    pub retry: RetryPolicy,
    pub fatal: FatalFailurePolicy,
}

impl SchedulerPolicy {
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            retry: RetryPolicy::from_config(config.max_attempts, &config.backoff),
            fatal: config.fatal_policy,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_fatal_policy(mut self, fatal: FatalFailurePolicy) -> Self {
        self.fatal = fatal;
        self
    }
}
