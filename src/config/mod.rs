//! # Waypoint Configuration System
//!
//! Typed configuration for the run lifecycle. Values are layered by
//! [`ConfigManager`]: built-in defaults, then a TOML file, then environment
//! overrides such as `WAYPOINT__SCHEDULER__MAX_ATTEMPTS=5`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use waypoint::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let attempts = manager.config().scheduler.max_attempts;
//! # Ok(())
//! # }
//! ```
//!
//! ```toml
//! [scheduler]
//! max_attempts = 5
//! fatal_policy = "block_dependents"
//!
//! [scheduler.backoff]
//! initial_delay_ms = 50
//! multiplier = 2.0
//! max_delay_ms = 800
//!
//! [logging]
//! format = "json"
//! ```

pub mod error;
pub mod loader;

use crate::constants::system;
use crate::orchestration::FatalFailurePolicy;
use serde::{Deserialize, Serialize};

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring `config/waypoint.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    /// Task scheduling policy
    pub scheduler: SchedulerConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

impl WaypointConfig {
    /// Reject values the scheduler cannot honour
    pub fn validate(&self) -> ConfigResult<()> {
        self.scheduler.validate()?;
        self.logging.validate()
    }
}

/// Scheduling policy for the execute-tasks phase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Attempts allowed per task before a retryable failure escalates to fatal.
    /// `None` retries forever.
    pub max_attempts: Option<u32>,

    /// Effect of a fatal failure on dependent tasks
    pub fatal_policy: FatalFailurePolicy,

    /// Delay applied before a retried task becomes eligible again
    pub backoff: BackoffConfig,
}

impl SchedulerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.max_attempts == Some(0) {
            return Err(ConfigurationError::invalid_value(
                "scheduler.max_attempts",
                "0",
                "at least one attempt is required; omit the field for unbounded retries",
            ));
        }
        self.backoff.validate()
    }
}

/// Backoff and retry delay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay before the first retry; zero requeues immediately
    pub initial_delay_ms: u64,
    /// Growth factor between consecutive retries of the same task
    pub multiplier: f64,
    /// Upper bound for a single delay
    pub max_delay_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 0,
            multiplier: system::DEFAULT_BACKOFF_MULTIPLIER,
            max_delay_ms: system::DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

impl BackoffConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigurationError::invalid_value(
                "scheduler.backoff.multiplier",
                self.multiplier.to_string(),
                "must be a finite number >= 1.0",
            ));
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err(ConfigurationError::validation_error(format!(
                "scheduler.backoff.max_delay_ms ({}) is smaller than initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            )));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive such as `info` or `waypoint=debug`; derived from the environment when unset
    pub level: Option<String>,
    pub format: LogFormat,
}

impl LoggingConfig {
    fn validate(&self) -> ConfigResult<()> {
        match &self.level {
            Some(level) if level.trim().is_empty() => Err(ConfigurationError::invalid_value(
                "logging.level",
                level.clone(),
                "must not be blank",
            )),
            _ => Ok(()),
        }
    }
}
