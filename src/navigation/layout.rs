//! # Field Layouts
//!
//! Declarative description of a field, loaded once at startup and turned into a
//! [`NavigationGraph`]. Every entry goes through the same validation as the
//! imperative API, so a layout either builds completely or not at all.
//!
//! ```toml
//! start = "home"
//!
//! [[nodes]]
//! id = "home"
//! type = "primary"
//!
//! [[nodes]]
//! id = "bin"
//! type = "secondary"
//!
//! [[edges]]
//! from = "home"
//! to = "bin"
//! weight = 450.0
//! direction = "north"
//!
//! [[locations]]
//! id = "bin_lip"
//! node = "bin"
//! offsets = [{ x_mm = 0.0, y_mm = 80.0 }]
//! ```

use super::graph::NavigationGraph;
use super::types::{Direction, Location, NodeType, Offset};
use crate::config::ConfigurationError;
use crate::error::{NavigationResult, Result};
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub weight: f32,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSpec {
    pub id: String,
    pub node: String,
    #[serde(default)]
    pub offsets: Vec<Offset>,
}

/// Complete field description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    /// Node the robot starts on
    pub start: Option<String>,
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
    pub locations: Vec<LocationSpec>,
}

impl FieldLayout {
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        Self::parse(toml, "inline")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::file_read_error(path.display().to_string(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(toml: &str, source_name: &str) -> Result<Self> {
        let layout = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(|built| built.try_deserialize::<FieldLayout>())
            .map_err(|e| ConfigurationError::invalid_toml(source_name, e))?;
        Ok(layout)
    }

    /// Build the graph: nodes, then edges, then locations, then the start cursor
    pub fn build(&self) -> NavigationResult<NavigationGraph> {
        let mut graph = NavigationGraph::new();

        for node in &self.nodes {
            graph.add_node(node.id.clone(), node.node_type)?;
        }
        for edge in &self.edges {
            graph.add_edge(&edge.from, &edge.to, edge.weight, edge.direction)?;
        }
        for location in &self.locations {
            graph.add_location(
                location.id.clone(),
                Location::new(location.node.clone(), location.offsets.clone()),
            )?;
        }
        if let Some(start) = &self.start {
            if !graph.contains_node(start) {
                return Err(crate::error::NavigationError::unknown_node(start.clone()));
            }
            graph.set_node(Some(start));
        }

        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            locations = self.locations.len(),
            "Field layout built"
        );
        Ok(graph)
    }
}
