//! # Lifecycle
//!
//! Owns the tasks of a robot run, the dependency relation between them and the
//! injected phase hooks, and drives the fixed six-phase sequence:
//!
//! ```text
//! declare -> calibrate -> wait -> execute_tasks -> clean -> reset
//! ```
//!
//! ## Task execution
//!
//! `execute_tasks` is a breadth-first topological traversal. Tasks with no pending
//! prerequisites are queued in registration order. Each dequeued task runs to
//! completion before the next decision is made:
//!
//! - `Success`: the task completes and dependents whose last prerequisite it was join
//!   the back of the queue.
//! - `FatalFailure`: the task completes as failed; dependents are released or skipped
//!   according to [`FatalFailurePolicy`].
//! - `RetryableFailure`: the task rejoins the back of the queue, after its backoff
//!   delay if one is configured, until the attempt ceiling escalates it to fatal.
//!
//! The relation is checked for cycles before any phase runs.

use super::context::{NoopPeerLink, PeerLink, TaskContext};
use super::dependency_graph::DependencyGraph;
use super::hooks::{LifecyclePhase, PhaseHook, PhaseHooks};
use super::policy::{FatalFailurePolicy, SchedulerPolicy};
use super::state::{RunProgress, RunReport, TaskOutcome, TaskState};
use super::task::{Task, TaskResult};
use crate::config::WaypointConfig;
use crate::constants::events;
use crate::error::{LifecycleError, LifecycleResult};
use crate::logging::{log_error, log_phase_operation, log_task_operation};
use crate::navigation::{NavigationGraph, SharedNavigation};
use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Queue entry; `ready_at` is set while a retried task waits out its backoff
#[derive(Debug)]
struct QueuedTask {
    id: String,
    ready_at: Option<Instant>,
}

impl QueuedTask {
    fn now(id: String) -> Self {
        Self { id, ready_at: None }
    }

    fn is_ready(&self, now: Instant) -> bool {
        self.ready_at.map_or(true, |at| at <= now)
    }
}

pub struct Lifecycle {
    tasks: HashMap<String, Box<dyn Task>>,
    /// Task ids in first-registration order
    task_order: Vec<String>,
    dependencies: DependencyGraph,
    hooks: PhaseHooks,
    policy: SchedulerPolicy,
    navigation: SharedNavigation,
    peers: Box<dyn PeerLink>,
    progress: RunProgress,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// Empty lifecycle with the default policy, an empty field and no peers
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            task_order: Vec::new(),
            dependencies: DependencyGraph::new(),
            hooks: PhaseHooks::default(),
            policy: SchedulerPolicy::default(),
            navigation: SharedNavigation::default(),
            peers: Box::new(NoopPeerLink),
            progress: RunProgress::default(),
        }
    }

    pub fn from_config(config: &WaypointConfig) -> Self {
        Self::new().with_policy(SchedulerPolicy::from_config(&config.scheduler))
    }

    pub fn with_policy(mut self, policy: SchedulerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_navigation(mut self, navigation: impl Into<SharedNavigation>) -> Self {
        self.navigation = navigation.into();
        self
    }

    pub fn with_peer_link(mut self, peers: impl PeerLink + 'static) -> Self {
        self.peers = Box::new(peers);
        self
    }

    pub fn policy(&self) -> &SchedulerPolicy {
        &self.policy
    }

    /// Handle to the robot's navigation graph, shareable with other threads
    pub fn navigation(&self) -> SharedNavigation {
        self.navigation.clone()
    }

    /// Store `task` under `id`, silently replacing any task already registered there.
    ///
    /// A replaced task keeps the queue position of the original registration.
    pub fn register_task(&mut self, id: impl Into<String>, task: impl Task + 'static) -> &mut Self {
        let id = id.into();
        if self.tasks.insert(id.clone(), Box::new(task)).is_none() {
            self.task_order.push(id);
        } else {
            debug!(task_id = %id, "Replaced previously registered task");
        }
        self
    }

    /// Register a closure as a task
    pub fn register_fn<F>(&mut self, id: impl Into<String>, task: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) -> TaskResult + 'static,
    {
        self.register_task(id, task)
    }

    /// `dependent` will not start until `prerequisite` reaches a terminal result
    pub fn add_dependency(
        &mut self,
        prerequisite: &str,
        dependent: &str,
    ) -> LifecycleResult<&mut Self> {
        if !self.dependencies.add(prerequisite, dependent)? {
            debug!(
                prerequisite = %prerequisite,
                dependent = %dependent,
                "Ignoring duplicate dependency"
            );
        }
        Ok(self)
    }

    /// Install a strategy object for one of the hook-driven phases.
    ///
    /// Returns `false` for [`LifecyclePhase::ExecuteTasks`], which takes no hook.
    pub fn set_hook(&mut self, phase: LifecyclePhase, hook: impl PhaseHook + 'static) -> bool {
        self.hooks.set(phase, Box::new(hook))
    }

    pub fn on_declare<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) + 'static,
    {
        self.set_hook(LifecyclePhase::Declare, hook);
        self
    }

    pub fn on_calibrate<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) + 'static,
    {
        self.set_hook(LifecyclePhase::Calibrate, hook);
        self
    }

    pub fn on_wait<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) + 'static,
    {
        self.set_hook(LifecyclePhase::Wait, hook);
        self
    }

    pub fn on_clean<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) + 'static,
    {
        self.set_hook(LifecyclePhase::Clean, hook);
        self
    }

    pub fn on_reset<F>(&mut self, hook: F) -> &mut Self
    where
        F: FnMut(&mut TaskContext<'_>) + 'static,
    {
        self.set_hook(LifecyclePhase::Reset, hook);
        self
    }

    /// Whether `id` reached a terminal result (success or failure) in the most recent run
    pub fn is_task_completed(&self, id: &str) -> bool {
        self.progress.is_completed(id)
    }

    /// Whether `id` succeeded in the most recent run
    pub fn is_task_succeeded(&self, id: &str) -> bool {
        self.progress.is_succeeded(id)
    }

    pub fn task_state(&self, id: &str) -> Option<TaskState> {
        self.progress.state(id)
    }

    pub fn task_count(&self) -> usize {
        self.task_order.len()
    }

    /// Check the dependency relation without running anything
    pub fn validate(&self) -> LifecycleResult<()> {
        if let Some(cycle) = self.dependencies.find_cycle(&self.task_order) {
            let error = LifecycleError::DependencyCycle { cycle };
            log_error("lifecycle", "validate", &error.to_string(), None);
            return Err(error);
        }
        Ok(())
    }

    /// Run every phase in order and report how each task ended.
    ///
    /// Fails before the first phase if the dependency relation has a cycle. Task
    /// state from a previous run is discarded when the new run starts.
    pub fn run(&mut self) -> LifecycleResult<RunReport> {
        self.validate()?;

        let started_at = Utc::now();
        self.progress = RunProgress::new(&self.task_order);
        info!(
            tasks = self.task_order.len(),
            dependencies = self.dependencies.edge_count(),
            "Starting run"
        );

        for phase in LifecyclePhase::SEQUENCE {
            let phase_started = Instant::now();
            log_phase_operation(events::PHASE_STARTED, phase.as_str(), None);

            match phase {
                LifecyclePhase::ExecuteTasks => self.execute_tasks(),
                hooked => self.run_hook(hooked),
            }

            let elapsed_ms = u64::try_from(phase_started.elapsed().as_millis()).unwrap_or(u64::MAX);
            log_phase_operation(events::PHASE_COMPLETED, phase.as_str(), Some(elapsed_ms));
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            tasks: self
                .task_order
                .iter()
                .map(|id| TaskOutcome {
                    id: id.clone(),
                    state: self.progress.state(id).unwrap_or(TaskState::Pending),
                    attempts: self.progress.attempts(id),
                })
                .collect(),
        };

        info!(
            succeeded = report.succeeded().len(),
            failed = report.failed().len(),
            skipped = report.skipped().len(),
            blocked = report.blocked().len(),
            duration_ms = report.duration_ms(),
            "Run finished"
        );
        Ok(report)
    }

    fn run_hook(&mut self, phase: LifecyclePhase) {
        let Some(hook) = self.hooks.get_mut(phase) else {
            debug!(phase = %phase, "No hook installed");
            return;
        };

        let mut ctx = TaskContext::new(
            phase,
            None,
            0,
            &self.navigation,
            self.peers.as_mut(),
            &self.progress,
        );
        hook.run(&mut ctx);
    }

    fn execute_tasks(&mut self) {
        let mut in_degree = self.dependencies.in_degrees(&self.task_order);

        let unregistered = self
            .dependencies
            .unregistered_prerequisites(&self.task_order);
        for (prerequisite, dependent) in unregistered {
            warn!(
                event = events::TASK_BLOCKED,
                prerequisite = %prerequisite,
                dependent = %dependent,
                "Dependent waits on a task that is not registered"
            );
        }

        let mut queue: VecDeque<QueuedTask> = self
            .task_order
            .iter()
            .filter(|id| in_degree.get(*id) == Some(&0) && !self.progress.is_completed(id))
            .map(|id| QueuedTask::now(id.clone()))
            .collect();

        while let Some(entry) = Self::next_ready(&mut queue) {
            let id = entry.id;
            let attempt = self.progress.record_attempt(&id);

            let Some(task) = self.tasks.get_mut(&id) else {
                continue;
            };

            debug!(
                event = events::TASK_DISPATCHED,
                task_id = %id,
                attempt = attempt,
                "Dispatching task"
            );
            let outcome = {
                let mut ctx = TaskContext::new(
                    LifecyclePhase::ExecuteTasks,
                    Some(id.as_str()),
                    attempt,
                    &self.navigation,
                    self.peers.as_mut(),
                    &self.progress,
                );
                task.execute(&mut ctx)
            };

            let outcome = match outcome {
                TaskResult::RetryableFailure if !self.policy.retry.allows_retry(attempt) => {
                    log_task_operation(
                        events::TASK_RETRIES_EXHAUSTED,
                        &id,
                        attempt,
                        "escalated",
                        Some("retry ceiling reached, treating as fatal"),
                    );
                    TaskResult::FatalFailure
                }
                other => other,
            };

            match outcome {
                TaskResult::Success => {
                    self.progress.set_state(&id, TaskState::Succeeded);
                    log_task_operation(events::TASK_SUCCEEDED, &id, attempt, "succeeded", None);
                    self.release_dependents(&id, &mut in_degree, &mut queue);
                }
                TaskResult::FatalFailure => {
                    self.progress.set_state(&id, TaskState::Failed);
                    log_task_operation(events::TASK_FAILED, &id, attempt, "failed", None);
                    match self.policy.fatal {
                        FatalFailurePolicy::UnblockDependents => {
                            self.release_dependents(&id, &mut in_degree, &mut queue)
                        }
                        FatalFailurePolicy::BlockDependents => self.skip_descendants(&id),
                    }
                }
                TaskResult::RetryableFailure => {
                    let delay = self.policy.retry.delay_for(attempt);
                    debug!(
                        event = events::TASK_RETRY_REQUESTED,
                        task_id = %id,
                        attempt = attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Requeueing task"
                    );
                    queue.push_back(QueuedTask {
                        ready_at: (!delay.is_zero()).then(|| Instant::now() + delay),
                        id,
                    });
                }
            }
        }

        for id in &self.task_order {
            if self.progress.state(id) == Some(TaskState::Pending) {
                warn!(event = events::TASK_BLOCKED, task_id = %id, "Task never became ready");
                self.progress.set_state(id, TaskState::Blocked);
            }
        }
    }

    /// Decrement the in-degree of each dependent and queue those that reach zero
    fn release_dependents(
        &self,
        id: &str,
        in_degree: &mut HashMap<String, usize>,
        queue: &mut VecDeque<QueuedTask>,
    ) {
        for dependent in self.dependencies.dependents(id) {
            let Some(count) = in_degree.get_mut(dependent) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 && self.progress.state(dependent) == Some(TaskState::Pending) {
                queue.push_back(QueuedTask::now(dependent.clone()));
            }
        }
    }

    fn skip_descendants(&mut self, id: &str) {
        for descendant in self.dependencies.descendants(id) {
            if self.progress.state(&descendant) == Some(TaskState::Pending) {
                info!(
                    event = events::TASK_SKIPPED,
                    task_id = %descendant,
                    failed_prerequisite = %id,
                    "Skipping task"
                );
                self.progress.set_state(&descendant, TaskState::Skipped);
            }
        }
    }

    /// Remove the first entry that may run now, sleeping while every entry is backing off
    fn next_ready(queue: &mut VecDeque<QueuedTask>) -> Option<QueuedTask> {
        loop {
            let now = Instant::now();
            if let Some(position) = queue.iter().position(|entry| entry.is_ready(now)) {
                return queue.remove(position);
            }

            let wake_at = queue.iter().filter_map(|entry| entry.ready_at).min()?;
            let pause = wake_at
                .saturating_duration_since(now)
                .max(Duration::from_micros(100));
            std::thread::sleep(pause);
        }
    }
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle")
            .field("tasks", &self.task_order)
            .field("dependencies", &self.dependencies)
            .field("hooks", &self.hooks)
            .field("policy", &self.policy)
            .finish()
    }
}

impl From<NavigationGraph> for Lifecycle {
    fn from(graph: NavigationGraph) -> Self {
        Self::new().with_navigation(graph)
    }
}
