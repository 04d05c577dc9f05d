//! Archdiagram - Declarative architecture diagrams rendered through Graphviz
//!
//! Describe nodes, nested clusters and labeled edges in code, then hand the
//! description to the Graphviz `dot` layout engine to produce an image.
//!
//! # Quick Start
//!
//! ```rust
//! use archdiagram::prelude::*;
//!
//! let mut builder = DiagramBuilder::new(DiagramConfig::new("Ingestion"));
//! let script = builder.cluster("Ingestion Layer", |b| {
//!     b.node("Upload Script", BuiltinIcon::Python)
//! });
//! let bucket = builder.node("Raw Data", BuiltinIcon::AwsS3);
//! builder.edge(script, bucket, Edge::labeled("boto3 upload")).unwrap();
//!
//! let diagram = builder.build().unwrap();
//! let dot = archdiagram::to_dot(&diagram).unwrap();
//! assert!(dot.contains("subgraph cluster_0"));
//! ```
//!
//! Writing the image itself needs Graphviz installed:
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let diagram = archdiagram::blueprints::ecommerce::platform(Path::new("docs/icons")).unwrap();
//! let rendered = archdiagram::render(&diagram).unwrap();
//! println!("{}", rendered.path.display());
//! ```

pub mod blueprints;
pub mod core;
pub mod graphviz;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        BuiltinIcon, Diagram, DiagramBuilder, DiagramConfig, Direction, Edge, EdgeRouting,
        EdgeStyle, Icon, NodeId, OutputFormat, Renderer,
    };
    pub use crate::graphviz::{DotRenderer, GraphvizRenderer, RenderedDiagram};
}

/// Render a diagram to its output file with the default `dot` engine
///
/// Custom icons are verified first; no file is written if anything fails.
pub fn render(diagram: &Diagram) -> anyhow::Result<graphviz::RenderedDiagram> {
    use crate::core::Renderer as _;

    graphviz::GraphvizRenderer::new().render(diagram)
}

/// Emit the Graphviz DOT source of a diagram
///
/// # Example
/// ```rust
/// use archdiagram::{to_dot, Diagram, DiagramConfig, Direction};
///
/// let diagram = Diagram::new(DiagramConfig::new("Empty").direction(Direction::TopBottom));
/// let dot = to_dot(&diagram).unwrap();
/// assert!(dot.contains("rankdir=\"TB\""));
/// ```
pub fn to_dot(diagram: &Diagram) -> anyhow::Result<String> {
    use crate::core::Renderer as _;

    graphviz::DotRenderer::new().render(diagram)
}

/// Check a diagram without rendering it: structure first, then every
/// custom icon
pub fn check(diagram: &Diagram) -> anyhow::Result<Vec<graphviz::IconInfo>> {
    diagram.validate()?;
    graphviz::verify_icons(diagram)
}
