//! # Lifecycle Phases
//!
//! A run always walks the same six phases. Five of them are single calls into
//! application-supplied hooks (hardware setup, start-light wait, arm retraction...);
//! the remaining one executes the task graph.

use super::context::TaskContext;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Declare goals, variables and metadata
    Declare,
    /// Calibrate sensors and actuators
    Calibrate,
    /// Wait for the external start condition
    Wait,
    /// Run the task graph
    ExecuteTasks,
    /// Post-run cleanup
    Clean,
    /// Restore state for a rerun or shutdown
    Reset,
}

impl LifecyclePhase {
    /// Phases in execution order
    pub const SEQUENCE: [LifecyclePhase; 6] = [
        Self::Declare,
        Self::Calibrate,
        Self::Wait,
        Self::ExecuteTasks,
        Self::Clean,
        Self::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declare => "declare",
            Self::Calibrate => "calibrate",
            Self::Wait => "wait",
            Self::ExecuteTasks => "execute_tasks",
            Self::Clean => "clean",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy invoked once per run for one phase
pub trait PhaseHook {
    fn run(&mut self, ctx: &mut TaskContext<'_>);
}

impl<F> PhaseHook for F
where
    F: FnMut(&mut TaskContext<'_>),
{
    fn run(&mut self, ctx: &mut TaskContext<'_>) {
        self(ctx)
    }
}

/// One optional hook per hook-driven phase; a missing hook is a no-op
#[derive(Default)]
pub struct PhaseHooks {
    declare: Option<Box<dyn PhaseHook>>,
    calibrate: Option<Box<dyn PhaseHook>>,
    wait: Option<Box<dyn PhaseHook>>,
    clean: Option<Box<dyn PhaseHook>>,
    reset: Option<Box<dyn PhaseHook>>,
}

impl PhaseHooks {
    /// Install `hook` for `phase`, replacing any previous one.
    ///
    /// Returns `false` for [`LifecyclePhase::ExecuteTasks`], which is driven by the task graph.
    pub fn set(&mut self, phase: LifecyclePhase, hook: Box<dyn PhaseHook>) -> bool {
        match self.slot_mut(phase) {
            Some(slot) => {
                *slot = Some(hook);
                true
            }
            None => false,
        }
    }

    pub fn get_mut(&mut self, phase: LifecyclePhase) -> Option<&mut Box<dyn PhaseHook>> {
        self.slot_mut(phase).and_then(Option::as_mut)
    }

    pub fn is_set(&self, phase: LifecyclePhase) -> bool {
        match phase {
            LifecyclePhase::Declare => self.declare.is_some(),
            LifecyclePhase::Calibrate => self.calibrate.is_some(),
            LifecyclePhase::Wait => self.wait.is_some(),
            LifecyclePhase::ExecuteTasks => false,
            LifecyclePhase::Clean => self.clean.is_some(),
            LifecyclePhase::Reset => self.reset.is_some(),
        }
    }

    fn slot_mut(&mut self, phase: LifecyclePhase) -> Option<&mut Option<Box<dyn PhaseHook>>> {
        match phase {
            LifecyclePhase::Declare => Some(&mut self.declare),
            LifecyclePhase::Calibrate => Some(&mut self.calibrate),
            LifecyclePhase::Wait => Some(&mut self.wait),
            LifecyclePhase::ExecuteTasks => None,
            LifecyclePhase::Clean => Some(&mut self.clean),
            LifecyclePhase::Reset => Some(&mut self.reset),
        }
    }
}

impl fmt::Debug for PhaseHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<&str> = LifecyclePhase::SEQUENCE
            .iter()
            .filter(|phase| self.is_set(**phase))
            .map(LifecyclePhase::as_str)
            .collect();
        f.debug_struct("PhaseHooks").field("installed", &installed).finish()
    }
}
