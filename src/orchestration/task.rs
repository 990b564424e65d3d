//! # Tasks
//!
//! A task is one unit of robot behaviour (drive to the bin, raise the arm, score).
//! It carries no identity of its own; the lifecycle assigns one at registration.

use super::context::TaskContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single task dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskResult {
    /// The task completed successfully
    Success,
    /// The task failed but may be attempted again
    RetryableFailure,
    /// The task failed and must not be retried
    FatalFailure,
}

impl TaskResult {
    /// Whether the task reached a final outcome for this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::FatalFailure)
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::RetryableFailure => write!(f, "retryable_failure"),
            Self::FatalFailure => write!(f, "fatal_failure"),
        }
    }
}

/// Capability implemented by every schedulable behaviour.
///
/// Tasks must not assume anything about execution order; ordering comes from the
/// dependency relation registered on the [`Lifecycle`](super::Lifecycle). Everything a
/// task may touch outside itself is reachable through the context.
pub trait Task {
    fn execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult;
}

impl<F> Task for F
where
    F: FnMut(&mut TaskContext<'_>) -> TaskResult,
{
    fn execute(&mut self, ctx: &mut TaskContext<'_>) -> TaskResult {
        self(ctx)
    }
}
