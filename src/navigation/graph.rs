//! # Navigation Graph
//!
//! In-memory model of the competition field. Callers insert one logical connection
//! at a time; the graph stores it as a pair of mirrored directed edges and keeps
//! the intersection metadata of every affected edge current.
//!
//! ## Intersection inference
//!
//! An edge `X -> Y` advertises the turns available on arrival at `Y`. Horizontal
//! edges only advertise north/south turns and vertical edges only east/west turns,
//! so driving straight through or back the way you came never counts as a turn.
//! Flags are derived from the edges leaving `Y`, whichever order connections were
//! inserted in.

use super::types::{Direction, Edge, Location, NodeType};
use crate::constants::events;
use crate::error::{NavigationError, NavigationResult};
use std::collections::HashMap;
use tracing::debug;

/// Directed, weighted field graph plus the robot's position cursor
#[derive(Debug, Clone, Default)]
pub struct NavigationGraph {
    pub(super) adjacency: HashMap<String, Vec<Edge>>,
    pub(super) node_types: HashMap<String, NodeType>,
    /// Node ids in insertion order
    node_order: Vec<String>,
    locations: HashMap<String, Location>,
    pub(super) current_node: Option<String>,
    current_location: Option<String>,
}

impl NavigationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; fails if the id is already taken
    pub fn add_node(
        &mut self,
        node: impl Into<String>,
        node_type: NodeType,
    ) -> NavigationResult<()> {
        let node = node.into();
        if self.node_types.contains_key(&node) {
            return Err(NavigationError::duplicate_node(node));
        }

        self.node_types.insert(node.clone(), node_type);
        self.adjacency.insert(node.clone(), Vec::new());
        self.node_order.push(node);
        Ok(())
    }

    /// Connect two existing nodes.
    ///
    /// Inserts `from -> to` heading `direction` and the mirrored `to -> from` heading the
    /// opposite way, both with `weight`. Fails if either node is unknown, if a secondary
    /// node already has its single edge, or if the weight is negative or not finite.
    pub fn add_edge(
        &mut self,
        from: &str,
        to: &str,
        weight: f32,
        direction: Direction,
    ) -> NavigationResult<()> {
        let from_type = self.require_node(from)?;
        let to_type = self.require_node(to)?;

        if from == to {
            return Err(NavigationError::SelfLoop {
                node: from.to_string(),
            });
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(NavigationError::InvalidWeight {
                from: from.to_string(),
                to: to.to_string(),
                weight,
            });
        }
        for (node, node_type) in [(from, from_type), (to, to_type)] {
            if node_type == NodeType::Secondary && self.degree(node) > 0 {
                return Err(NavigationError::secondary_overflow(node));
            }
        }

        let reverse = direction.reverse();

        let mut forward = Edge::new(to, weight, direction);
        for turn in self.headings_from(to) {
            forward.record_turn(turn);
        }
        let mut backward = Edge::new(from, weight, reverse);
        for turn in self.headings_from(from) {
            backward.record_turn(turn);
        }

        // Arriving at `from` may now continue towards `to`, and vice versa
        self.record_turn_into(from, direction);
        self.record_turn_into(to, reverse);

        self.adjacency.entry(from.to_string()).or_default().push(forward);
        self.adjacency.entry(to.to_string()).or_default().push(backward);

        debug!(
            event = events::EDGE_ADDED,
            from = %from,
            to = %to,
            weight = weight,
            direction = %direction,
            "Connected nodes"
        );
        Ok(())
    }

    /// Outgoing edge `from -> to`, if one exists; fails if either node is unknown
    pub fn get_edge(&self, from: &str, to: &str) -> NavigationResult<Option<&Edge>> {
        self.require_node(from)?;
        self.require_node(to)?;

        Ok(self.edges_from(from).iter().find(|edge| edge.to == to))
    }

    pub fn get_node_type(&self, node: &str) -> Option<NodeType> {
        self.node_types.get(node).copied()
    }

    pub fn contains_node(&self, node: &str) -> bool {
        self.node_types.contains_key(node)
    }

    /// Node ids in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.node_order.iter().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    /// Number of directed edges; every connection contributes two
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Edges leaving `node`, empty for unknown nodes
    pub fn edges_from(&self, node: &str) -> &[Edge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of connections touching `node`
    pub fn degree(&self, node: &str) -> usize {
        self.edges_from(node).len()
    }

    /// Current position of the robot, if known
    pub fn get_node(&self) -> Option<&str> {
        self.current_node.as_deref()
    }

    /// Move the position cursor; `None` clears it.
    ///
    /// Setting a node directly also clears the current location.
    pub fn set_node(&mut self, node: Option<&str>) {
        self.current_node = node.map(str::to_string);
        self.current_location = None;
    }

    /// Register a named location, replacing any previous definition with the same id
    pub fn add_location(
        &mut self,
        id: impl Into<String>,
        location: Location,
    ) -> NavigationResult<()> {
        self.require_node(&location.node)?;
        self.locations.insert(id.into(), location);
        Ok(())
    }

    pub fn get_location_spec(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Id of the location the robot was last moved to with [`set_location`](Self::set_location)
    pub fn get_location(&self) -> Option<&str> {
        self.current_location.as_deref()
    }

    /// Move the cursor to the origin node of a named location
    pub fn set_location(&mut self, id: &str) -> NavigationResult<()> {
        let node = self
            .locations
            .get(id)
            .map(|location| location.node.clone())
            .ok_or_else(|| NavigationError::unknown_location(id))?;

        self.current_node = Some(node);
        self.current_location = Some(id.to_string());
        Ok(())
    }

    pub fn locations(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.locations.iter().map(|(id, location)| (id.as_str(), location))
    }

    fn require_node(&self, node: &str) -> NavigationResult<NodeType> {
        self.get_node_type(node)
            .ok_or_else(|| NavigationError::unknown_node(node))
    }

    fn headings_from(&self, node: &str) -> Vec<Direction> {
        self.edges_from(node).iter().map(|edge| edge.direction).collect()
    }

    /// Mark every edge terminating at `node` as able to turn towards `direction`
    fn record_turn_into(&mut self, node: &str, direction: Direction) {
        let neighbours: Vec<String> = self
            .edges_from(node)
            .iter()
            .map(|edge| edge.to.clone())
            .collect();

        for neighbour in neighbours {
            if let Some(edges) = self.adjacency.get_mut(&neighbour) {
                edges
                    .iter_mut()
                    .filter(|edge| edge.to == node)
                    .for_each(|edge| edge.record_turn(direction));
            }
        }
    }
}
