//! Core renderer trait for diagram output
//!
//! A renderer turns a [`Diagram`] into some output: DOT source text, or an
//! image file produced by the layout engine.

use anyhow::Result;

use super::Diagram;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use archdiagram::core::{Diagram, DiagramConfig, Renderer};
/// use archdiagram::graphviz::DotRenderer;
///
/// let diagram = Diagram::new(DiagramConfig::new("Empty"));
/// let dot = DotRenderer::new().render(&diagram).unwrap();
/// assert!(dot.starts_with("digraph"));
/// ```
pub trait Renderer {
    /// The output type of this renderer
    type Output;

    /// Render the diagram into the output format
    fn render(&self, diagram: &Diagram) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
