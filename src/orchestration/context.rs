//! # Task Context
//!
//! Capability object handed to tasks and phase hooks. It exposes the robot's
//! navigation graph, the peer messaging link and a read-only view of run progress,
//! and nothing else of the lifecycle.

use super::hooks::LifecyclePhase;
use super::state::{RunProgress, TaskState};
use crate::navigation::{NavigationGraph, SharedNavigation};
use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value;

/// Messaging boundary towards other robots.
///
/// The transport (UDP heartbeats carrying JSON payloads) lives outside this crate;
/// implementations adapt it to these two calls.
pub trait PeerLink {
    /// Publish shared state under `topic`
    fn publish(&mut self, topic: &str, payload: Value);

    /// Most recent state a peer published under `topic`
    fn peer_state(&self, topic: &str) -> Option<Value>;
}

/// Link for robots running alone: publishes go nowhere, no peer state is ever seen
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPeerLink;

impl PeerLink for NoopPeerLink {
    fn publish(&mut self, _topic: &str, _payload: Value) {}

    fn peer_state(&self, _topic: &str) -> Option<Value> {
        None
    }
}

pub struct TaskContext<'a> {
    phase: LifecyclePhase,
    task_id: Option<&'a str>,
    attempt: u32,
    navigation: &'a SharedNavigation,
    peers: &'a mut dyn PeerLink,
    progress: &'a RunProgress,
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(
        phase: LifecyclePhase,
        task_id: Option<&'a str>,
        attempt: u32,
        navigation: &'a SharedNavigation,
        peers: &'a mut dyn PeerLink,
        progress: &'a RunProgress,
    ) -> Self {
        Self {
            phase,
            task_id,
            attempt,
            navigation,
            peers,
            progress,
        }
    }

    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Id of the task being dispatched; `None` inside phase hooks
    pub fn task_id(&self) -> Option<&str> {
        self.task_id
    }

    /// 1-based attempt number of the current dispatch; 0 inside phase hooks
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Read access to the robot's navigation graph.
    ///
    /// The guard borrows the context, so it must be dropped before
    /// [`navigation_mut`](Self::navigation_mut) can be called.
    pub fn navigation(&self) -> RwLockReadGuard<'_, NavigationGraph> {
        self.navigation.read()
    }

    /// Write access to the robot's navigation graph, e.g. to move the cursor after driving
    pub fn navigation_mut(&mut self) -> RwLockWriteGuard<'_, NavigationGraph> {
        self.navigation.write()
    }

    pub fn publish(&mut self, topic: &str, payload: Value) {
        self.peers.publish(topic, payload);
    }

    pub fn peer_state(&self, topic: &str) -> Option<Value> {
        self.peers.peer_state(topic)
    }

    pub fn is_task_completed(&self, id: &str) -> bool {
        self.progress.is_completed(id)
    }

    pub fn is_task_succeeded(&self, id: &str) -> bool {
        self.progress.is_succeeded(id)
    }

    pub fn task_state(&self, id: &str) -> Option<TaskState> {
        self.progress.state(id)
    }
}

impl std::fmt::Debug for TaskContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskContext")
            .field("phase", &self.phase)
            .field("task_id", &self.task_id)
            .field("attempt", &self.attempt)
            .field("peers", &"PeerLink")
            .finish()
    }
}
