#![allow(dead_code)]

pub mod strategies;

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use waypoint::navigation::{Direction, NavigationGraph, NodeType};
use waypoint::orchestration::{PeerLink, Task, TaskContext, TaskResult};

/// Shared, ordered record of what ran
pub type ExecutionLog = Rc<RefCell<Vec<String>>>;

pub fn execution_log() -> ExecutionLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &ExecutionLog) -> Vec<String> {
    log.borrow().clone()
}

/// Task that records its id and answers with a scripted sequence of results.
///
/// Once the script runs out the last result repeats.
pub struct ScriptedTask {
    id: String,
    log: ExecutionLog,
    script: Vec<TaskResult>,
    calls: usize,
}

impl ScriptedTask {
    pub fn new(id: &str, log: &ExecutionLog, script: Vec<TaskResult>) -> Self {
        Self {
            id: id.to_string(),
            log: Rc::clone(log),
            script,
            calls: 0,
        }
    }

    pub fn succeeding(id: &str, log: &ExecutionLog) -> Self {
        Self::new(id, log, vec![TaskResult::Success])
    }
}

impl Task for ScriptedTask {
    fn execute(&mut self, _ctx: &mut TaskContext<'_>) -> TaskResult {
        self.log.borrow_mut().push(self.id.clone());
        let result = self
            .script
            .get(self.calls)
            .or(self.script.last())
            .copied()
            .unwrap_or(TaskResult::Success);
        self.calls += 1;
        result
    }
}

/// In-memory stand-in for the UDP heartbeat link between robots
#[derive(Clone, Default)]
pub struct RecordingPeerLink {
    pub published: Rc<RefCell<Vec<(String, Value)>>>,
    pub peers: Rc<RefCell<HashMap<String, Value>>>,
}

impl RecordingPeerLink {
    pub fn with_peer_state(topic: &str, payload: Value) -> Self {
        let link = Self::default();
        link.peers.borrow_mut().insert(topic.to_string(), payload);
        link
    }
}

impl PeerLink for RecordingPeerLink {
    fn publish(&mut self, topic: &str, payload: Value) {
        self.published.borrow_mut().push((topic.to_string(), payload));
    }

    fn peer_state(&self, topic: &str) -> Option<Value> {
        self.peers.borrow().get(topic).cloned()
    }
}

/// A(primary) -5 east-> B(primary) -2 north-> C(secondary)
pub fn abc_field() -> NavigationGraph {
    let mut graph = NavigationGraph::new();
    graph.add_node("A", NodeType::Primary).unwrap();
    graph.add_node("B", NodeType::Primary).unwrap();
    graph.add_node("C", NodeType::Secondary).unwrap();
    graph.add_edge("A", "B", 5.0, Direction::East).unwrap();
    graph.add_edge("B", "C", 2.0, Direction::North).unwrap();
    graph
}

/// 3x3 grid of primary nodes `r{row}c{col}`, unit weights, row 0 at the bottom
pub fn square_grid() -> NavigationGraph {
    let mut graph = NavigationGraph::new();
    for row in 0..3 {
        for col in 0..3 {
            graph
                .add_node(format!("r{row}c{col}"), NodeType::Primary)
                .unwrap();
        }
    }
    for row in 0..3 {
        for col in 0..3 {
            let here = format!("r{row}c{col}");
            if col < 2 {
                graph
                    .add_edge(&here, &format!("r{row}c{}", col + 1), 1.0, Direction::East)
                    .unwrap();
            }
            if row < 2 {
                graph
                    .add_edge(&here, &format!("r{}c{col}", row + 1), 1.0, Direction::North)
                    .unwrap();
            }
        }
    }
    graph
}
