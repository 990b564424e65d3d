//! # Shortest-Path Search
//!
//! Single-source Dijkstra from the robot's current node. Blacklisted nodes are never
//! entered and, if popped, never expanded. The search stops as soon as the target
//! leaves the frontier. Equal-cost frontier entries are popped in insertion order.

use super::graph::NavigationGraph;
use super::types::Edge;
use crate::constants::events;
use crate::error::{NavigationError, NavigationResult};
use crate::logging::log_navigation_operation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Ordered edges from a start node to a target, with the summed weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: String,
    pub edges: Vec<Edge>,
    pub distance: f32,
}

impl Route {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Visited node ids, start node first
    pub fn nodes(&self) -> Vec<&str> {
        std::iter::once(self.from.as_str())
            .chain(self.edges.iter().map(|edge| edge.to.as_str()))
            .collect()
    }

    /// Final node of the route
    pub fn destination(&self) -> &str {
        self.edges.last().map_or(self.from.as_str(), |edge| edge.to.as_str())
    }
}

#[derive(Debug)]
struct FrontierEntry<'a> {
    cost: f32,
    sequence: u64,
    node: &'a str,
}

impl PartialEq for FrontierEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry<'_> {}

impl PartialOrd for FrontierEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry<'_> {
    // Reversed: BinaryHeap is a max-heap and we want the cheapest, oldest entry on top
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl NavigationGraph {
    /// Shortest route from the current node to `target`.
    ///
    /// Returns `None` when the cursor is unset, the target is unknown, or every route
    /// is cut off.
    ///
    /// A target equal to the current node is already reached: the result is
    /// `Some` route with no edges and a distance of 0, never `None`. Callers
    /// that treat `None` as "no route" can therefore ask for the current node
    /// without special-casing it.
    pub fn find_path(&self, target: &str) -> Option<Route> {
        self.find_path_avoiding(target, &HashSet::new())
    }

    /// Shortest route from the current node to `target` that never enters a node in `blacklist`
    pub fn find_path_avoiding(&self, target: &str, blacklist: &HashSet<String>) -> Option<Route> {
        let from = self.current_node.as_deref()?;
        let route = self.shortest_route(from, target, blacklist);

        match &route {
            Some(route) => log_navigation_operation(
                events::ROUTE_FOUND,
                Some(from),
                Some(target),
                Some(route.distance),
                None,
            ),
            None => log_navigation_operation(
                events::ROUTE_NOT_FOUND,
                Some(from),
                Some(target),
                None,
                Some(&format!("{} blacklisted node(s)", blacklist.len())),
            ),
        }
        route
    }

    /// Shortest route from the current node to the origin node of a named location
    pub fn find_path_to_location(
        &self,
        location: &str,
        blacklist: &HashSet<String>,
    ) -> NavigationResult<Option<Route>> {
        let node = self
            .get_location_spec(location)
            .map(|spec| spec.node.clone())
            .ok_or_else(|| NavigationError::unknown_location(location))?;

        Ok(self.find_path_avoiding(&node, blacklist))
    }

    fn shortest_route(
        &self,
        from: &str,
        target: &str,
        blacklist: &HashSet<String>,
    ) -> Option<Route> {
        if !self.contains_node(from) || !self.contains_node(target) {
            return None;
        }
        if from == target {
            return Some(Route {
                from: from.to_string(),
                edges: Vec::new(),
                distance: 0.0,
            });
        }

        let mut dist: HashMap<&str, f32> = HashMap::new();
        // node -> (parent, index of the edge in the parent's adjacency list)
        let mut prev: HashMap<&str, (&str, usize)> = HashMap::new();
        let mut frontier = BinaryHeap::new();
        let mut sequence = 0u64;

        dist.insert(from, 0.0);
        frontier.push(FrontierEntry {
            cost: 0.0,
            sequence,
            node: from,
        });

        while let Some(FrontierEntry { cost, node, .. }) = frontier.pop() {
            if node == target {
                break;
            }
            if blacklist.contains(node) {
                continue;
            }
            if dist.get(node).is_some_and(|best| cost > *best) {
                continue;
            }

            for (index, edge) in self.edges_from(node).iter().enumerate() {
                if blacklist.contains(&edge.to) {
                    continue;
                }

                let candidate = cost + edge.weight;
                let improves = dist
                    .get(edge.to.as_str())
                    .map_or(true, |known| candidate < *known);
                if improves {
                    dist.insert(edge.to.as_str(), candidate);
                    prev.insert(edge.to.as_str(), (node, index));
                    sequence += 1;
                    frontier.push(FrontierEntry {
                        cost: candidate,
                        sequence,
                        node: edge.to.as_str(),
                    });
                }
            }
        }

        let distance = *dist.get(target)?;

        let mut edges = Vec::new();
        let mut current = target;
        while current != from {
            let (parent, index) = *prev.get(current)?;
            edges.push(self.edges_from(parent).get(index)?.clone());
            current = parent;
        }
        edges.reverse();

        Some(Route {
            from: from.to_string(),
            edges,
            distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::types::{Direction, NodeType};

    fn blacklist(nodes: &[&str]) -> HashSet<String> {
        nodes.iter().map(|node| node.to_string()).collect()
    }

    /// A - B - C on top, A - D - C below with a longer detour
    fn ring() -> NavigationGraph {
        let mut graph = NavigationGraph::new();
        for node in ["A", "B", "C", "D"] {
            graph.add_node(node, NodeType::Primary).unwrap();
        }
        graph.add_edge("A", "B", 1.0, Direction::East).unwrap();
        graph.add_edge("B", "C", 1.0, Direction::East).unwrap();
        graph.add_edge("A", "D", 2.0, Direction::South).unwrap();
        graph.add_edge("D", "C", 3.0, Direction::East).unwrap();
        graph.set_node(Some("A"));
        graph
    }

    #[test]
    fn test_no_cursor_means_no_route() {
        let mut graph = ring();
        graph.set_node(None);
        assert_eq!(graph.find_path("C"), None);
    }

    #[test]
    fn test_shortest_route_selected() {
        let graph = ring();
        let route = graph.find_path("C").unwrap();
        assert_eq!(route.nodes(), vec!["A", "B", "C"]);
        assert_eq!(route.distance, 2.0);
        assert_eq!(route.destination(), "C");
    }

    #[test]
    fn test_blacklist_forces_detour() {
        let graph = ring();
        let route = graph.find_path_avoiding("C", &blacklist(&["B"])).unwrap();
        assert_eq!(route.nodes(), vec!["A", "D", "C"]);
        assert_eq!(route.distance, 5.0);

        assert_eq!(graph.find_path_avoiding("C", &blacklist(&["B", "D"])), None);
        assert_eq!(graph.find_path_avoiding("C", &blacklist(&["C"])), None);
    }

    #[test]
    fn test_trivial_and_unknown_targets() {
        let graph = ring();
        let route = graph.find_path("A").unwrap();
        assert!(route.is_empty());
        assert_eq!(route.distance, 0.0);

        assert_eq!(graph.find_path("Q"), None);
    }

    #[test]
    fn test_route_to_current_node_is_reached() {
        let mut graph = ring();
        graph.set_node(Some("C"));
        let route = graph.find_path("C").unwrap();
        assert_eq!(route.from, "C");
        assert_eq!(route.destination(), "C");
        assert_eq!(route.len(), 0);
        assert_eq!(route.distance, 0.0);
    }

    #[test]
    fn test_parallel_edges_use_cheapest() {
        let mut graph = NavigationGraph::new();
        graph.add_node("A", NodeType::Primary).unwrap();
        graph.add_node("B", NodeType::Primary).unwrap();
        graph.add_edge("A", "B", 9.0, Direction::East).unwrap();
        graph.add_edge("A", "B", 4.0, Direction::North).unwrap();
        graph.set_node(Some("A"));

        let route = graph.find_path("B").unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route.edges[0].weight, 4.0);
        assert_eq!(route.distance, 4.0);
    }

    #[test]
    fn test_route_to_location() {
        let mut graph = ring();
        graph
            .add_location("drop_zone", crate::navigation::Location::new("C", vec![]))
            .unwrap();

        let route = graph
            .find_path_to_location("drop_zone", &HashSet::new())
            .unwrap()
            .unwrap();
        assert_eq!(route.destination(), "C");
        assert!(graph
            .find_path_to_location("missing", &HashSet::new())
            .is_err());
    }
}
