//! # Run State
//!
//! Per-run task states and the report returned by [`Lifecycle::run`](super::Lifecycle::run).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Where a task stands within the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Registered, not yet terminal
    Pending,
    /// Returned success
    Succeeded,
    /// Returned a fatal failure, or ran out of retry attempts
    Failed,
    /// Never dispatched because a prerequisite failed
    Skipped,
    /// Never dispatched because a prerequisite is not registered
    Blocked,
}

impl TaskState {
    /// Reached a terminal result by running: the "completed" set
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// No further change is possible during this run
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// Mutable bookkeeping for one run
#[derive(Debug, Clone, Default)]
pub struct RunProgress {
    states: HashMap<String, TaskState>,
    attempts: HashMap<String, u32>,
}

impl RunProgress {
    /// Fresh progress with every given task pending
    pub fn new<'a>(task_ids: impl IntoIterator<Item = &'a String>) -> Self {
        Self {
            states: task_ids
                .into_iter()
                .map(|id| (id.clone(), TaskState::Pending))
                .collect(),
            attempts: HashMap::new(),
        }
    }

    pub fn state(&self, id: &str) -> Option<TaskState> {
        self.states.get(id).copied()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.state(id).is_some_and(|state| state.is_completed())
    }

    pub fn is_succeeded(&self, id: &str) -> bool {
        self.state(id) == Some(TaskState::Succeeded)
    }

    pub fn attempts(&self, id: &str) -> u32 {
        self.attempts.get(id).copied().unwrap_or(0)
    }

    pub(crate) fn set_state(&mut self, id: &str, state: TaskState) {
        self.states.insert(id.to_string(), state);
    }

    /// Count a dispatch and return its 1-based attempt number
    pub(crate) fn record_attempt(&mut self, id: &str) -> u32 {
        let attempts = self.attempts.entry(id.to_string()).or_insert(0);
        *attempts += 1;
        *attempts
    }
}

/// Final state of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub id: String,
    pub state: TaskState,
    pub attempts: u32,
}

/// Summary of a completed run, in task registration order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tasks: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn state(&self, id: &str) -> Option<TaskState> {
        self.tasks.iter().find(|task| task.id == id).map(|task| task.state)
    }

    pub fn attempts(&self, id: &str) -> u32 {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map_or(0, |task| task.attempts)
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.ids_in(TaskState::Succeeded)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.ids_in(TaskState::Failed)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.ids_in(TaskState::Skipped)
    }

    pub fn blocked(&self) -> Vec<&str> {
        self.ids_in(TaskState::Blocked)
    }

    /// Every registered task succeeded
    pub fn is_success(&self) -> bool {
        self.tasks.iter().all(|task| task.state == TaskState::Succeeded)
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    fn ids_in(&self, state: TaskState) -> Vec<&str> {
        self.tasks
            .iter()
            .filter(|task| task.state == state)
            .map(|task| task.id.as_str())
            .collect()
    }
}
