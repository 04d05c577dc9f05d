//! Diagram storage
//!
//! Stores the nodes, clusters and edges of a diagram together with its
//! configuration. Everything is kept in declaration order so that emitted
//! output is deterministic.

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, trace};

use super::{
    ClusterData, ClusterId, DiagramConfig, DiagramError, Edge, EdgeData, Icon, NodeData, NodeId,
};

/// A complete diagram description
#[derive(Debug, Clone, Serialize)]
pub struct Diagram {
    config: DiagramConfig,
    nodes: Vec<NodeData>,
    clusters: Vec<ClusterData>,
    edges: Vec<EdgeData>,
}

impl Diagram {
    /// Create an empty diagram
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            clusters: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Path the rendered diagram is written to
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path()
    }

    /// Append a cluster inside `parent` (or at top level)
    ///
    /// Only [`DiagramBuilder`](super::DiagramBuilder) adds clusters and nodes,
    /// and it only nests inside its own open clusters.
    pub(crate) fn add_cluster(&mut self, label: String, parent: Option<ClusterId>) -> ClusterId {
        let depth = parent
            .and_then(|p| self.get_cluster(p))
            .map_or(0, |p| p.depth + 1);
        let id = ClusterId(self.clusters.len());
        trace!(%id, label = %label, depth, "Adding cluster");
        self.clusters.push(ClusterData {
            id,
            label,
            parent,
            depth,
        });
        id
    }

    /// Append a node inside `cluster` (or at top level)
    pub(crate) fn add_node(
        &mut self,
        label: String,
        icon: Icon,
        cluster: Option<ClusterId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        trace!(%id, label = %label, "Adding node");
        self.nodes.push(NodeData {
            id,
            label,
            icon,
            cluster,
        });
        id
    }

    /// Declare a directed edge; both endpoints must already exist
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) -> Result<()> {
        self.require_node(from)?;
        self.require_node(to)?;
        trace!(%from, %to, label = ?edge.label, style = %edge.style, "Adding edge");
        self.edges.push(EdgeData {
            from,
            to,
            label: edge.label,
            style: edge.style,
            color: edge.color,
        });
        Ok(())
    }

    pub fn get_node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    pub fn get_cluster(&self, id: ClusterId) -> Option<&ClusterData> {
        self.clusters.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter()
    }

    pub fn clusters(&self) -> impl Iterator<Item = &ClusterData> {
        self.clusters.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeData> {
        self.edges.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Direct sub-clusters of `parent`, or top-level clusters for `None`
    pub fn children_of(&self, parent: Option<ClusterId>) -> impl Iterator<Item = &ClusterData> {
        self.clusters.iter().filter(move |c| c.parent == parent)
    }

    /// Nodes directly inside `cluster`, or top-level nodes for `None`
    pub fn nodes_in(&self, cluster: Option<ClusterId>) -> impl Iterator<Item = &NodeData> {
        self.nodes.iter().filter(move |n| n.cluster == cluster)
    }

    /// Paths of every custom icon, in declaration order without repeats
    pub fn custom_icons(&self) -> Vec<&PathBuf> {
        let mut paths: Vec<&PathBuf> = Vec::new();
        for path in self.nodes.iter().filter_map(|n| n.icon.path()) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Find a node by its label
    pub fn find_node(&self, label: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Check structural integrity: every edge endpoint, node cluster and
    /// cluster parent refers to something declared in this diagram.
    pub fn validate(&self) -> Result<()> {
        for cluster in &self.clusters {
            if let Some(parent) = cluster.parent {
                self.require_cluster(parent)?;
            }
        }
        for node in &self.nodes {
            if let Some(cluster) = node.cluster {
                self.require_cluster(cluster)?;
            }
        }
        for edge in &self.edges {
            self.require_node(edge.from)?;
            self.require_node(edge.to)?;
        }
        debug!(
            nodes = self.node_count(),
            clusters = self.cluster_count(),
            edges = self.edge_count(),
            "Diagram validated"
        );
        Ok(())
    }

    pub(crate) fn require_node(&self, id: NodeId) -> Result<&NodeData> {
        self.get_node(id)
            .ok_or_else(|| DiagramError::unknown_node(id.to_string()).into())
    }

    fn require_cluster(&self, id: ClusterId) -> Result<&ClusterData> {
        self.get_cluster(id)
            .ok_or_else(|| DiagramError::unknown_cluster(id.to_string()).into())
    }
}
