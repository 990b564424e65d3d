//! Error types for the waypoint system.
//!
//! Navigation failures are local and non-retryable: they surface at the call site of the
//! graph operation that caused them. Lifecycle failures are raised by `run()` before any
//! phase executes. Task outcomes are never errors; they travel through
//! [`TaskResult`](crate::orchestration::TaskResult).

use crate::config::ConfigurationError;
use thiserror::Error;

/// Failures raised by [`NavigationGraph`](crate::navigation::NavigationGraph) mutations and lookups
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavigationError {
    #[error("Node already exists: {node}")]
    DuplicateNode { node: String },
    #[error("Unknown node: {node}")]
    UnknownNode { node: String },
    #[error("Secondary node '{node}' may only have one edge")]
    SecondaryNodeOverflow { node: String },
    #[error("Node '{node}' cannot be connected to itself")]
    SelfLoop { node: String },
    #[error("Unknown location: {location}")]
    UnknownLocation { location: String },
    #[error("Invalid weight {weight} for edge {from} -> {to}: must be finite and non-negative")]
    InvalidWeight { from: String, to: String, weight: f32 },
    #[error("Invalid heading {degrees}: expected one of 0, 90, 180, 270")]
    InvalidDirection { degrees: u16 },
}

impl NavigationError {
    pub fn duplicate_node(node: impl Into<String>) -> Self {
        Self::DuplicateNode { node: node.into() }
    }

    pub fn unknown_node(node: impl Into<String>) -> Self {
        Self::UnknownNode { node: node.into() }
    }

    pub fn secondary_overflow(node: impl Into<String>) -> Self {
        Self::SecondaryNodeOverflow { node: node.into() }
    }

    pub fn unknown_location(location: impl Into<String>) -> Self {
        Self::UnknownLocation {
            location: location.into(),
        }
    }
}

/// Failures detected while validating or running a [`Lifecycle`](crate::orchestration::Lifecycle)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The dependency relation between registered tasks contains a cycle.
    ///
    /// The ids are listed in edge order and the first id is repeated at the end,
    /// e.g. `["a", "b", "a"]`.
    #[error("Dependency cycle detected: {}", .cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },
    #[error("Task '{task}' cannot depend on itself")]
    SelfDependency { task: String },
}

/// Crate-wide error
#[derive(Debug, Error)]
pub enum WaypointError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

pub type Result<T> = std::result::Result<T, WaypointError>;
pub type NavigationResult<T> = std::result::Result<T, NavigationError>;
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;
