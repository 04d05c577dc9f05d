//! Scoped diagram builder
//!
//! Clusters are opened with a closure: every node declared inside the
//! closure lands in that cluster, and nested calls nest clusters.
//!
//! ```rust
//! use archdiagram::{BuiltinIcon, DiagramBuilder, DiagramConfig, Edge};
//!
//! let mut builder = DiagramBuilder::new(DiagramConfig::new("Pipeline"));
//! let (raw, clean) = builder.cluster("Data Lake", |b| {
//!     let raw = b.cluster("Bronze", |b| b.node("Raw", BuiltinIcon::AwsS3));
//!     let clean = b.cluster("Silver", |b| b.node("Clean", BuiltinIcon::AwsS3));
//!     (raw, clean)
//! });
//! builder.edge(raw, clean, Edge::labeled("validate")).unwrap();
//!
//! let diagram = builder.build().unwrap();
//! assert_eq!(diagram.cluster_count(), 3);
//! ```

use anyhow::Result;
use tracing::{debug, span, Level};

use super::{ClusterId, Diagram, DiagramConfig, Edge, Icon, NodeId};

/// Builds a [`Diagram`] with nested cluster scopes
#[derive(Debug)]
pub struct DiagramBuilder {
    diagram: Diagram,
    scope: Vec<ClusterId>,
}

impl DiagramBuilder {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            diagram: Diagram::new(config),
            scope: Vec::new(),
        }
    }

    /// Cluster that new nodes are currently added to
    pub fn current_cluster(&self) -> Option<ClusterId> {
        self.scope.last().copied()
    }

    /// Open a cluster, run `f` inside it and close it again
    pub fn cluster<R>(&mut self, label: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        let parent = self.current_cluster();
        let id = self.diagram.add_cluster(label.to_string(), parent);
        self.scope.push(id);
        let result = f(self);
        self.scope.pop();
        result
    }

    /// Declare a node in the current cluster
    pub fn node(&mut self, label: &str, icon: impl Into<Icon>) -> NodeId {
        let cluster = self.current_cluster();
        self.diagram.add_node(label.to_string(), icon.into(), cluster)
    }

    /// Declare a directed edge between two nodes of this diagram
    pub fn edge(&mut self, from: NodeId, to: NodeId, edge: Edge) -> Result<()> {
        self.diagram.add_edge(from, to, edge)
    }

    /// Declare the same edge from `from` to each node of `targets`
    ///
    /// Nothing is added unless every endpoint exists.
    pub fn fan_out(&mut self, from: NodeId, targets: &[NodeId], edge: Edge) -> Result<()> {
        self.diagram.require_node(from)?;
        for &to in targets {
            self.diagram.require_node(to)?;
        }
        for &to in targets {
            self.diagram.add_edge(from, to, edge.clone())?;
        }
        Ok(())
    }

    /// Validate and return the finished diagram
    pub fn build(self) -> Result<Diagram> {
        let build_span = span!(Level::DEBUG, "build_diagram", title = %self.diagram.title());
        let _enter = build_span.enter();

        self.diagram.validate()?;
        debug!(
            nodes = self.diagram.node_count(),
            edges = self.diagram.edge_count(),
            "Diagram built"
        );
        Ok(self.diagram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuiltinIcon, EdgeStyle};

    #[test]
    fn test_nodes_land_in_open_cluster() {
        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        let outside = builder.node("Outside", BuiltinIcon::AwsCloudwatch);
        let (inner, cluster) = builder.cluster("Group", |b| {
            (b.node("Inner", BuiltinIcon::Python), b.current_cluster())
        });
        assert!(builder.current_cluster().is_none());

        let diagram = builder.build().unwrap();
        assert_eq!(diagram.get_node(outside).unwrap().cluster, None);
        assert_eq!(diagram.get_node(inner).unwrap().cluster, cluster);
        assert!(cluster.is_some());
    }

    #[test]
    fn test_nested_clusters_record_parent() {
        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        builder.cluster("Outer", |b| {
            b.cluster("Middle", |b| {
                b.cluster("Inner", |b| {
                    b.node("Deep", BuiltinIcon::AwsS3);
                })
            })
        });
        let diagram = builder.build().unwrap();

        let depths: Vec<_> = diagram.clusters().map(|c| c.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        let inner = diagram.clusters().last().unwrap();
        assert_eq!(inner.parent, Some(ClusterId(1)));
    }

    #[test]
    fn test_sibling_clusters_share_parent() {
        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        builder.cluster("Lake", |b| {
            b.cluster("Bronze", |_| ());
            b.cluster("Silver", |_| ());
        });
        let diagram = builder.build().unwrap();
        assert_eq!(diagram.children_of(Some(ClusterId(0))).count(), 2);
    }

    #[test]
    fn test_fan_out() {
        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        let iam = builder.node("IAM", BuiltinIcon::AwsIam);
        let buckets: Vec<_> = (0..3)
            .map(|i| builder.node(&format!("bucket {i}"), BuiltinIcon::AwsS3))
            .collect();
        builder
            .fan_out(
                iam,
                &buckets,
                Edge::labeled("access control").style(EdgeStyle::Dotted),
            )
            .unwrap();

        let diagram = builder.build().unwrap();
        assert_eq!(diagram.edge_count(), 3);
        assert!(diagram.edges().all(|e| e.from == iam && e.style == EdgeStyle::Dotted));
    }

    #[test]
    fn test_fan_out_with_unknown_target_adds_nothing() {
        let mut other = DiagramBuilder::new(DiagramConfig::new("other"));
        for label in ["a", "b", "c", "d"] {
            other.node(label, BuiltinIcon::Python);
        }
        let foreign = other.node("e", BuiltinIcon::Python);

        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        let iam = builder.node("IAM", BuiltinIcon::AwsIam);
        let bucket = builder.node("bucket", BuiltinIcon::AwsS3);
        let err = builder
            .fan_out(iam, &[bucket, foreign], Edge::labeled("access control"))
            .unwrap_err();
        assert!(err.to_string().contains("n4"));

        let diagram = builder.build().unwrap();
        assert_eq!(diagram.edge_count(), 0);
    }

    #[test]
    fn test_cluster_depth_follows_nesting() {
        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        builder.cluster("Lake", |b| {
            b.cluster("Bronze", |b| {
                b.node("Raw", BuiltinIcon::AwsS3);
            });
        });
        builder.cluster("Monitoring", |_| ());
        let diagram = builder.build().unwrap();

        let clusters: Vec<_> = diagram.clusters().map(|c| (c.depth, c.parent)).collect();
        assert_eq!(
            clusters,
            vec![(0, None), (1, Some(ClusterId(0))), (0, None)]
        );
        diagram.validate().unwrap();
    }

    #[test]
    fn test_edge_to_foreign_node_rejected() {
        let mut other = DiagramBuilder::new(DiagramConfig::new("other"));
        other.node("a", BuiltinIcon::Python);
        let foreign = other.node("b", BuiltinIcon::Python);

        let mut builder = DiagramBuilder::new(DiagramConfig::new("t"));
        let local = builder.node("a", BuiltinIcon::Python);
        assert!(builder.edge(local, foreign, Edge::new()).is_err());
    }
}
