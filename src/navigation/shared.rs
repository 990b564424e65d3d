//! Shared handle to a navigation graph.
//!
//! The lifecycle owns one graph per robot. Tasks reach it through their context while
//! they hold the dispatch turn; collaborators outside the scheduler (a heartbeat
//! publisher reporting position to peers, for example) keep a clone of this handle and
//! take short read locks.

use super::graph::NavigationGraph;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct SharedNavigation {
    inner: Arc<RwLock<NavigationGraph>>,
}

impl SharedNavigation {
    pub fn new(graph: NavigationGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, NavigationGraph> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, NavigationGraph> {
        self.inner.write()
    }

    /// Snapshot of the cursor without holding the lock afterwards
    pub fn current_node(&self) -> Option<String> {
        self.inner.read().get_node().map(str::to_string)
    }
}

impl From<NavigationGraph> for SharedNavigation {
    fn from(graph: NavigationGraph) -> Self {
        Self::new(graph)
    }
}
