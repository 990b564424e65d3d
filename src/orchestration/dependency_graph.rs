//! # Dependency Graph
//!
//! The "must finish before" relation between task ids. Edges may name ids that are
//! not registered yet; registration is checked when a run computes in-degrees.

use crate::error::{LifecycleError, LifecycleResult};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// prerequisite -> dependents, in insertion order
    dependents: HashMap<String, Vec<String>>,
    edge_count: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` waits for `prerequisite`.
    ///
    /// Returns `Ok(false)` when the edge already exists; a task depending on itself is
    /// rejected immediately.
    pub fn add(&mut self, prerequisite: &str, dependent: &str) -> LifecycleResult<bool> {
        if prerequisite == dependent {
            return Err(LifecycleError::SelfDependency {
                task: dependent.to_string(),
            });
        }

        let dependents = self.dependents.entry(prerequisite.to_string()).or_default();
        if dependents.iter().any(|existing| existing == dependent) {
            return Ok(false);
        }
        dependents.push(dependent.to_string());
        self.edge_count += 1;
        Ok(true)
    }

    pub fn dependents(&self, prerequisite: &str) -> &[String] {
        self.dependents
            .get(prerequisite)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Prerequisite count for every registered task.
    ///
    /// Every edge into a registered task counts, including edges from unregistered
    /// prerequisites: such a task can never become ready.
    pub fn in_degrees(&self, registered: &[String]) -> HashMap<String, usize> {
        let mut in_degree: HashMap<String, usize> =
            registered.iter().map(|id| (id.clone(), 0)).collect();

        for dependents in self.dependents.values() {
            for dependent in dependents {
                if let Some(count) = in_degree.get_mut(dependent) {
                    *count += 1;
                }
            }
        }
        in_degree
    }

    /// `(prerequisite, dependent)` edges whose prerequisite is not registered
    /// but whose dependent is
    pub fn unregistered_prerequisites(&self, registered: &[String]) -> Vec<(String, String)> {
        let known: HashSet<&str> = registered.iter().map(String::as_str).collect();
        let mut missing: Vec<(String, String)> = self
            .dependents
            .iter()
            .filter(|(prerequisite, _)| !known.contains(prerequisite.as_str()))
            .flat_map(|(prerequisite, dependents)| {
                dependents
                    .iter()
                    .filter(|dependent| known.contains(dependent.as_str()))
                    .map(move |dependent| (prerequisite.clone(), dependent.clone()))
            })
            .collect();
        missing.sort();
        missing
    }

    /// All tasks reachable from `id` through dependency edges, breadth first, excluding `id`
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([id]);
        let mut queue: VecDeque<&str> = VecDeque::from([id]);
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents(current) {
                if seen.insert(dependent.as_str()) {
                    found.push(dependent.clone());
                    queue.push_back(dependent.as_str());
                }
            }
        }
        found
    }

    /// First cycle among registered tasks, searched in registration order.
    ///
    /// The returned path starts and ends with the same id, e.g. `[a, b, c, a]`.
    pub fn find_cycle(&self, registered: &[String]) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let known: HashSet<&str> = registered.iter().map(String::as_str).collect();
        let mut marks: HashMap<&str, Mark> =
            registered.iter().map(|id| (id.as_str(), Mark::Unvisited)).collect();

        for root in registered {
            if marks.get(root.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }

            // (node, index of the next dependent to visit)
            let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
            marks.insert(root.as_str(), Mark::InProgress);

            while let Some((node, next)) = stack.last().copied() {
                let registered_dependents: Vec<&str> = self
                    .dependents(node)
                    .iter()
                    .map(String::as_str)
                    .filter(|dependent| known.contains(dependent))
                    .collect();

                match registered_dependents.get(next) {
                    Some(&child) => {
                        if let Some(top) = stack.last_mut() {
                            top.1 += 1;
                        }
                        match marks.get(child).copied() {
                            Some(Mark::InProgress) => {
                                let start = stack
                                    .iter()
                                    .position(|(id, _)| *id == child)
                                    .unwrap_or(0);
                                let mut cycle: Vec<String> =
                                    stack[start..].iter().map(|(id, _)| id.to_string()).collect();
                                cycle.push(child.to_string());
                                return Some(cycle);
                            }
                            Some(Mark::Unvisited) => {
                                marks.insert(child, Mark::InProgress);
                                stack.push((child, 0));
                            }
                            _ => {}
                        }
                    }
                    None => {
                        marks.insert(node, Mark::Done);
                        stack.pop();
                    }
                }
            }
        }
        None
    }
}
