//! Graphviz layout engine driver
//!
//! Pipes DOT source into the `dot` binary and writes the rasterized output.
//! The output file is written in one go after the engine succeeds, so a
//! failed run never leaves a partial image behind.

use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, span, warn, Level};

use super::{verify_icons, DotRenderer};
use crate::core::{Diagram, DiagramError, OutputFormat, Renderer};

/// Engine binary looked up on `PATH` by default
pub const DEFAULT_ENGINE: &str = "dot";

/// Result of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram {
    /// File the diagram was written to
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Size of the written file
    pub bytes: usize,
}

/// Renders diagrams to files through the Graphviz layout engine
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    engine: String,
    dot: DotRenderer,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphvizRenderer {
    pub fn new() -> Self {
        Self::with_engine(DEFAULT_ENGINE)
    }

    /// Use a different engine binary (a name on `PATH` or a path)
    pub fn with_engine(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            dot: DotRenderer::new(),
        }
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    /// Resolve the engine binary
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.engine).map_err(|e| {
            DiagramError::EngineUnavailable {
                engine: self.engine.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Run the engine over `source`, returning the rendered bytes
    pub fn rasterize(&self, source: &str, format: OutputFormat) -> Result<Vec<u8>> {
        let engine = self.locate()?;
        debug!(engine = %engine.display(), %format, "Invoking layout engine");

        let mut child = Command::new(&engine)
            .arg(format!("-T{}", format.extension()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DiagramError::EngineUnavailable {
                engine: self.engine.clone(),
                message: e.to_string(),
            })?;

        // Dropping stdin closes the pipe so the engine sees end of input.
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(source.as_bytes()),
            None => Ok(()),
        };

        let output = child.wait_with_output()?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            return Err(DiagramError::engine_failed(output.status.to_string(), stderr).into());
        }
        write_result?;
        if output.stdout.is_empty() {
            return Err(DiagramError::engine_failed(
                output.status.to_string(),
                "engine produced no output",
            )
            .into());
        }
        if !stderr.is_empty() {
            warn!(stderr = %stderr, "Layout engine reported warnings");
        }
        Ok(output.stdout)
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

impl Renderer for GraphvizRenderer {
    type Output = RenderedDiagram;

    fn render(&self, diagram: &Diagram) -> Result<RenderedDiagram> {
        let render_span = span!(Level::INFO, "render_diagram", title = %diagram.title());
        let _enter = render_span.enter();

        diagram.validate()?;
        verify_icons(diagram)?;

        let source = self.dot.render(diagram)?;
        let format = diagram.config().format;
        let bytes = if format.needs_engine() {
            self.rasterize(&source, format)?
        } else {
            source.into_bytes()
        };

        let path = diagram.output_path();
        write_output(&path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "Diagram written");

        Ok(RenderedDiagram {
            path,
            format,
            bytes: bytes.len(),
        })
    }

    fn name(&self) -> &'static str {
        "graphviz"
    }

    fn format(&self) -> &'static str {
        "image"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BuiltinIcon, DiagramBuilder, DiagramConfig, Edge, Icon};
    use tempfile::tempdir;

    #[test]
    fn test_missing_engine_is_reported() {
        let renderer = GraphvizRenderer::with_engine("archdiagram-no-such-engine");
        let err = renderer.locate().unwrap_err();
        assert!(err.to_string().contains("archdiagram-no-such-engine"));
    }

    #[test]
    fn test_dot_format_skips_engine() {
        let dir = tempdir().unwrap();
        let config = DiagramConfig::new("t")
            .filename(dir.path().join("nested/out"))
            .format(OutputFormat::Dot);
        let mut builder = DiagramBuilder::new(config);
        let a = builder.node("A", BuiltinIcon::Python);
        let b = builder.node("B", BuiltinIcon::AwsS3);
        builder.edge(a, b, Edge::labeled("upload")).unwrap();
        let diagram = builder.build().unwrap();

        // Engine lookup would fail, but DOT output never needs it.
        let rendered = GraphvizRenderer::with_engine("archdiagram-no-such-engine")
            .render(&diagram)
            .unwrap();
        assert_eq!(rendered.path, dir.path().join("nested/out.dot"));
        let written = fs::read_to_string(&rendered.path).unwrap();
        assert_eq!(written.len(), rendered.bytes);
        assert!(written.contains("n0 -> n1"));
    }

    #[test]
    fn test_missing_icon_writes_nothing() {
        let dir = tempdir().unwrap();
        let config = DiagramConfig::new("t")
            .filename(dir.path().join("out"))
            .format(OutputFormat::Dot);
        let mut builder = DiagramBuilder::new(config);
        builder.node("Ghost", Icon::custom(dir.path().join("ghost.png")));
        let diagram = builder.build().unwrap();

        let err = GraphvizRenderer::new().render(&diagram).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::IconNotFound { .. })
        ));
        assert!(!dir.path().join("out.dot").exists());
    }

    #[test]
    fn test_png_without_engine_fails_cleanly() {
        let dir = tempdir().unwrap();
        let config = DiagramConfig::new("t").filename(dir.path().join("out"));
        let mut builder = DiagramBuilder::new(config);
        builder.node("A", BuiltinIcon::Spark);
        let diagram = builder.build().unwrap();

        let err = GraphvizRenderer::with_engine("archdiagram-no-such-engine")
            .render(&diagram)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::EngineUnavailable { .. })
        ));
        assert!(!dir.path().join("out.png").exists());
    }
}
