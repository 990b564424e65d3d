//! # System Constants
//!
//! Environment variable names, default values and event names shared across the
//! lifecycle, navigation and configuration modules.

/// Environment variables read at startup
pub mod env {
    /// Deployment environment (`development`, `test`, `production`)
    pub const ENVIRONMENT: &str = "WAYPOINT_ENV";
    /// Fallback environment variable when `WAYPOINT_ENV` is unset
    pub const FALLBACK_ENVIRONMENT: &str = "APP_ENV";
    /// Path of the TOML configuration file
    pub const CONFIG_PATH: &str = "WAYPOINT_CONFIG";
    /// Log output format (`pretty` or `json`)
    pub const LOG_FORMAT: &str = "WAYPOINT_LOG_FORMAT";
    /// Prefix for configuration overrides, e.g. `WAYPOINT__SCHEDULER__MAX_ATTEMPTS`
    pub const CONFIG_PREFIX: &str = "WAYPOINT";
    /// Separator between nested keys in override variables
    pub const CONFIG_SEPARATOR: &str = "__";
}

/// Names of the structured events emitted through `tracing`
pub mod events {
    pub const TASK_DISPATCHED: &str = "task.dispatched";
    pub const TASK_SUCCEEDED: &str = "task.succeeded";
    pub const TASK_FAILED: &str = "task.failed";
    pub const TASK_RETRY_REQUESTED: &str = "task.retry_requested";
    pub const TASK_RETRIES_EXHAUSTED: &str = "task.retries_exhausted";
    pub const TASK_SKIPPED: &str = "task.skipped";
    pub const TASK_BLOCKED: &str = "task.blocked";

    pub const PHASE_STARTED: &str = "phase.started";
    pub const PHASE_COMPLETED: &str = "phase.completed";

    pub const EDGE_ADDED: &str = "navigation.edge_added";
    pub const ROUTE_FOUND: &str = "navigation.route_found";
    pub const ROUTE_NOT_FOUND: &str = "navigation.route_not_found";
}

pub mod system {
    /// Default environment when none is configured
    pub const DEFAULT_ENVIRONMENT: &str = "development";

    /// Default configuration file, relative to the working directory
    pub const DEFAULT_CONFIG_PATH: &str = "config/waypoint.toml";

    /// Default growth factor between consecutive retry delays
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

    /// Default cap on a single retry delay
    pub const DEFAULT_MAX_BACKOFF_MS: u64 = 1_000;
}
