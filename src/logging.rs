//! # Structured Logging Module
//!
//! Environment-aware structured logging for robot runs. Console output is human
//! readable by default and switches to JSON lines when requested, which is what the
//! pit-side log collectors ingest.

use crate::config::{LogFormat, LoggingConfig};
use crate::constants::{env, system};
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    let format = match std::env::var(env::LOG_FORMAT).as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_from_config(&LoggingConfig {
        level: None,
        format,
    });
}

/// Initialize structured logging from loaded configuration.
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn init_from_config(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = config
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let layer = match config.format {
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed(),
        };

        // A subscriber may already be installed by the embedding application
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
        }

        tracing::info!(
            environment = %environment,
            level = %log_level,
            format = ?config.format,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
pub(crate) fn get_environment() -> String {
    std::env::var(env::ENVIRONMENT)
        .or_else(|_| std::env::var(env::FALLBACK_ENVIRONMENT))
        .unwrap_or_else(|_| system::DEFAULT_ENVIRONMENT.to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for task operations
pub fn log_task_operation(
    operation: &str,
    task_id: &str,
    attempt: u32,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        task_id = %task_id,
        attempt = attempt,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "📋 TASK_OPERATION"
    );
}

/// Log structured data for lifecycle phase boundaries
pub fn log_phase_operation(operation: &str, phase: &str, duration_ms: Option<u64>) {
    tracing::info!(
        operation = %operation,
        phase = %phase,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "🤖 PHASE_OPERATION"
    );
}

/// Log structured data for navigation queries
pub fn log_navigation_operation(
    operation: &str,
    from: Option<&str>,
    to: Option<&str>,
    distance: Option<f32>,
    details: Option<&str>,
) {
    tracing::debug!(
        operation = %operation,
        from = from,
        to = to,
        distance = distance,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🧭 NAVIGATION_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ ERROR"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("unknown"), "debug");
    }

    #[test]
    fn test_repeated_initialization_is_harmless() {
        init_from_config(&LoggingConfig::default());
        init_structured_logging();
        log_task_operation("dispatch", "drive_to_bin", 1, "started", None);
    }
}
