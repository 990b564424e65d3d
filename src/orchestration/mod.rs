//! # Orchestration Engine
//!
//! Run lifecycle and task scheduling for a single robot.
//!
//! ## Core Components
//!
//! - **Lifecycle**: owns tasks, dependencies and hooks; drives the six phases
//! - **Task**: one schedulable behaviour returning a [`TaskResult`]
//! - **PhaseHook**: application strategy for a hook-driven phase
//! - **TaskContext**: what tasks and hooks may touch (navigation, peers, run progress)
//! - **DependencyGraph**: the "must finish before" relation, with cycle detection
//! - **SchedulerPolicy**: retry ceiling, backoff and fatal-failure propagation
//!
//! ## Example
//!
//! ```rust
//! use waypoint::orchestration::{Lifecycle, TaskResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut lifecycle = Lifecycle::new();
//! lifecycle.register_fn("x", |_| TaskResult::Success);
//! lifecycle.register_fn("y", |_| TaskResult::Success);
//! lifecycle.register_fn("z", |ctx| {
//!     assert!(ctx.is_task_completed("x") && ctx.is_task_completed("y"));
//!     TaskResult::Success
//! });
//! lifecycle.add_dependency("x", "z")?;
//! lifecycle.add_dependency("y", "z")?;
//!
//! let report = lifecycle.run()?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod dependency_graph;
pub mod hooks;
pub mod lifecycle;
pub mod policy;
pub mod state;
pub mod task;

pub use context::{NoopPeerLink, PeerLink, TaskContext};
pub use dependency_graph::DependencyGraph;
pub use hooks::{LifecyclePhase, PhaseHook, PhaseHooks};
pub use lifecycle::Lifecycle;
pub use policy::{FatalFailurePolicy, RetryPolicy, SchedulerPolicy};
pub use state::{RunProgress, RunReport, TaskOutcome, TaskState};
pub use task::{Task, TaskResult};
