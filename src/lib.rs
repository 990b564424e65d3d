#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Waypoint Core
//!
//! Runtime for autonomous competition robots: a fixed run lifecycle that schedules
//! dependent tasks, and a navigation graph of the playing field.
//!
//! ## Overview
//!
//! A robot program declares *what* it wants to achieve as a set of tasks with
//! "must finish before" relations between them. The [`orchestration::Lifecycle`]
//! walks the phases `declare -> calibrate -> wait -> execute_tasks -> clean -> reset`,
//! dispatching tasks in dependency order and retrying the ones that ask for it.
//! Tasks move the robot through the [`navigation::NavigationGraph`], which answers
//! shortest-path queries around blacklisted nodes and derives where a route offers
//! turns.
//!
//! ## Module Organization
//!
//! - [`orchestration`] - Lifecycle phases, tasks, dependency scheduling and retry policy
//! - [`navigation`] - Field graph, intersection inference, locations and routing
//! - [`config`] - Layered TOML and environment configuration
//! - [`error`] - Structured error handling
//! - [`logging`] - `tracing` subscriber setup and structured log helpers
//! - [`constants`] - Environment variable names, defaults and event names
//!
//! ## Quick Start
//!
//! ```rust
//! use waypoint::navigation::{Direction, NavigationGraph, NodeType};
//! use waypoint::orchestration::{Lifecycle, TaskResult};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut field = NavigationGraph::new();
//! field.add_node("start", NodeType::Primary)?;
//! field.add_node("bin", NodeType::Secondary)?;
//! field.add_edge("start", "bin", 1.5, Direction::North)?;
//! field.set_node(Some("start"));
//!
//! let mut lifecycle = Lifecycle::from(field);
//! lifecycle.register_fn("drive_to_bin", |ctx| {
//!     let route = ctx.navigation().find_path("bin");
//!     match route {
//!         Some(_) => {
//!             ctx.navigation_mut().set_node(Some("bin"));
//!             TaskResult::Success
//!         }
//!         None => TaskResult::FatalFailure,
//!     }
//! });
//!
//! let report = lifecycle.run()?;
//! assert!(report.is_success());
//! assert_eq!(lifecycle.navigation().current_node().as_deref(), Some("bin"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod orchestration;

pub use config::{ConfigManager, WaypointConfig};
pub use error::{
    LifecycleError, LifecycleResult, NavigationError, NavigationResult, Result, WaypointError,
};
pub use navigation::{Direction, NavigationGraph, NodeType, Route, SharedNavigation};
pub use orchestration::{Lifecycle, LifecyclePhase, Task, TaskContext, TaskResult, TaskState};
