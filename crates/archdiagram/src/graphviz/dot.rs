//! DOT source emitter
//!
//! Converts a [`Diagram`] into Graphviz DOT. Clusters become
//! `subgraph cluster_N` blocks nested the way they were declared, nodes are
//! written inside their innermost cluster, and edges follow at the end in
//! declaration order.

use anyhow::Result;
use std::fmt::Write;
use tracing::{debug, span, Level};

use crate::core::{
    line_breaks, quote, Attributes, ClusterData, Diagram, EdgeData, EdgeRouting, Icon, NodeData,
    Renderer,
};

/// Cluster backgrounds, cycled by nesting depth
pub const CLUSTER_BACKGROUNDS: [&str; 4] = ["#E5F5FD", "#EBF3E7", "#ECE8F6", "#FDF7E3"];

const ICON_NODE_HEIGHT: f64 = 1.9;
const LINE_BREAK_PADDING: f64 = 0.4;

/// Graph attributes applied before any diagram overrides
pub fn default_graph_attrs() -> Attributes {
    [
        ("pad", "2.0"),
        ("splines", "ortho"),
        ("nodesep", "0.60"),
        ("ranksep", "0.75"),
        ("fontname", "Sans-Serif"),
        ("fontsize", "15"),
        ("fontcolor", "#2D3436"),
    ]
    .into_iter()
    .collect()
}

/// Node attributes applied before any diagram overrides
pub fn default_node_attrs() -> Attributes {
    [
        ("shape", "box"),
        ("style", "rounded"),
        ("fixedsize", "true"),
        ("width", "1.4"),
        ("height", "1.4"),
        ("labelloc", "b"),
        ("imagescale", "true"),
        ("fontname", "Sans-Serif"),
        ("fontsize", "13"),
        ("fontcolor", "#2D3436"),
    ]
    .into_iter()
    .collect()
}

/// Edge attributes applied before any diagram overrides
pub fn default_edge_attrs() -> Attributes {
    [("color", "#7B8894")].into_iter().collect()
}

fn cluster_attrs(cluster: &ClusterData) -> Attributes {
    [
        ("label", cluster.label.as_str()),
        ("labeljust", "l"),
        ("pencolor", "#AEB6BE"),
        ("fontname", "Sans-Serif"),
        ("fontsize", "12"),
        ("style", "rounded"),
        (
            "bgcolor",
            CLUSTER_BACKGROUNDS[cluster.depth % CLUSTER_BACKGROUNDS.len()],
        ),
    ]
    .into_iter()
    .collect()
}

fn node_attrs(node: &NodeData) -> Attributes {
    let mut attrs = Attributes::new().with("label", node.label.as_str());
    match &node.icon {
        Icon::Custom(path) => {
            let height = ICON_NODE_HEIGHT + LINE_BREAK_PADDING * line_breaks(&node.label) as f64;
            attrs.set("shape", "none");
            attrs.set("height", format!("{:.1}", height));
            attrs.set("image", path.to_string_lossy());
        }
        Icon::Builtin(icon) => {
            attrs.set("shape", icon.shape());
            attrs.set("style", "filled");
            attrs.set("fillcolor", icon.fill_color());
        }
    }
    attrs
}

fn edge_attrs(edge: &EdgeData, routing: EdgeRouting) -> Attributes {
    let mut attrs = Attributes::new();
    if let Some(label) = &edge.label {
        // Orthogonal routing cannot place `label`; `xlabel` is placed after layout.
        let key = if routing == EdgeRouting::Ortho {
            "xlabel"
        } else {
            "label"
        };
        attrs.set(key, label.as_str());
    }
    if !edge.style.is_solid() {
        attrs.set("style", edge.style.to_string());
    }
    if let Some(color) = &edge.color {
        attrs.set("color", color.as_str());
    }
    attrs
}

/// Format an attribute list as `key="value" key="value"`
fn attr_list(attrs: &Attributes) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{}={}", key, quote(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders diagrams as Graphviz DOT source
#[derive(Debug, Clone, Copy, Default)]
pub struct DotRenderer;

impl DotRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_cluster(
        &self,
        out: &mut String,
        diagram: &Diagram,
        cluster: &ClusterData,
        indent: usize,
    ) -> Result<()> {
        let pad = "\t".repeat(indent);
        writeln!(out, "{pad}subgraph {} {{", cluster.id)?;
        writeln!(out, "{pad}\tgraph [{}]", attr_list(&cluster_attrs(cluster)))?;
        for node in diagram.nodes_in(Some(cluster.id)) {
            self.write_node(out, node, indent + 1)?;
        }
        for child in diagram.children_of(Some(cluster.id)) {
            self.write_cluster(out, diagram, child, indent + 1)?;
        }
        writeln!(out, "{pad}}}")?;
        Ok(())
    }

    fn write_node(&self, out: &mut String, node: &NodeData, indent: usize) -> Result<()> {
        let pad = "\t".repeat(indent);
        writeln!(out, "{pad}{} [{}]", node.id, attr_list(&node_attrs(node)))?;
        Ok(())
    }
}

impl Renderer for DotRenderer {
    type Output = String;

    fn render(&self, diagram: &Diagram) -> Result<String> {
        let render_span = span!(Level::DEBUG, "emit_dot", title = %diagram.title());
        let _enter = render_span.enter();

        let config = diagram.config();

        let mut graph = default_graph_attrs();
        graph.set("rankdir", config.direction.to_string());
        graph.set("label", config.title.as_str());
        graph.merge(&config.graph_attr);

        let mut node = default_node_attrs();
        node.merge(&config.node_attr);

        let mut edge = default_edge_attrs();
        edge.merge(&config.edge_attr);

        let mut out = String::new();
        writeln!(out, "digraph {} {{", quote(&config.title))?;
        writeln!(out, "\tgraph [{}]", attr_list(&graph))?;
        writeln!(out, "\tnode [{}]", attr_list(&node))?;
        writeln!(out, "\tedge [{}]", attr_list(&edge))?;

        for cluster in diagram.children_of(None) {
            self.write_cluster(&mut out, diagram, cluster, 1)?;
        }
        for node in diagram.nodes_in(None) {
            self.write_node(&mut out, node, 1)?;
        }

        let routing = config.routing();
        for edge in diagram.edges() {
            let attrs = edge_attrs(edge, routing);
            if attrs.is_empty() {
                writeln!(out, "\t{} -> {}", edge.from, edge.to)?;
            } else {
                writeln!(out, "\t{} -> {} [{}]", edge.from, edge.to, attr_list(&attrs))?;
            }
        }
        out.push_str("}\n");

        debug!(bytes = out.len(), "DOT source emitted");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "dot"
    }

    fn format(&self) -> &'static str {
        "dot"
    }
}
