//! # Navigation
//!
//! Weighted, directed model of the competition field with shortest-path queries.
//!
//! ```rust
//! use waypoint::navigation::{Direction, NavigationGraph, NodeType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut graph = NavigationGraph::new();
//! graph.add_node("A", NodeType::Primary)?;
//! graph.add_node("B", NodeType::Primary)?;
//! graph.add_node("C", NodeType::Secondary)?;
//! graph.add_edge("A", "B", 5.0, Direction::East)?;
//! graph.add_edge("B", "C", 2.0, Direction::North)?;
//!
//! graph.set_node(Some("A"));
//! let route = graph.find_path("C").expect("C is reachable");
//! assert_eq!(route.nodes(), vec!["A", "B", "C"]);
//! assert_eq!(route.distance, 7.0);
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod layout;
pub mod pathfinding;
pub mod shared;
pub mod types;

pub use graph::NavigationGraph;
pub use layout::{EdgeSpec, FieldLayout, LocationSpec, NodeSpec};
pub use pathfinding::Route;
pub use shared::SharedNavigation;
pub use types::{Direction, Edge, EdgeOrientation, Location, NodeType, Offset};
