//! Diagram-wide configuration
//!
//! A [`DiagramConfig`] carries the title, output location and global style of
//! a diagram. Attribute overrides are merged on top of the emitter defaults.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{Attributes, Direction, EdgeRouting, OutputFormat};

/// Root settings of a diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramConfig {
    /// Title drawn under the diagram and used as the graph name
    pub title: String,
    /// Output path without extension; derived from the title when unset
    pub filename: Option<PathBuf>,
    pub format: OutputFormat,
    pub direction: Direction,
    pub graph_attr: Attributes,
    pub node_attr: Attributes,
    pub edge_attr: Attributes,
}

impl DiagramConfig {
    /// Create a config with default style for the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            filename: None,
            format: OutputFormat::default(),
            direction: Direction::default(),
            graph_attr: Attributes::new(),
            node_attr: Attributes::new(),
            edge_attr: Attributes::new(),
        }
    }

    pub fn filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the edge routing style
    pub fn splines(mut self, routing: EdgeRouting) -> Self {
        self.graph_attr.set("splines", routing.to_string());
        self
    }

    pub fn graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.graph_attr.set(key, value);
        self
    }

    pub fn node_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node_attr.set(key, value);
        self
    }

    pub fn edge_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.edge_attr.set(key, value);
        self
    }

    /// Edge routing in effect, `ortho` unless overridden
    pub fn routing(&self) -> EdgeRouting {
        self.graph_attr
            .get("splines")
            .and_then(EdgeRouting::parse)
            .unwrap_or_default()
    }

    /// Output path without extension
    pub fn output_stem(&self) -> PathBuf {
        match &self.filename {
            Some(filename) => filename.clone(),
            None => PathBuf::from(slugify(&self.title)),
        }
    }

    /// Full output path: the stem with the format's extension appended
    ///
    /// ```rust
    /// use archdiagram::{DiagramConfig, OutputFormat};
    /// use std::path::Path;
    ///
    /// let config = DiagramConfig::new("Web Service").format(OutputFormat::Svg);
    /// assert_eq!(config.output_path(), Path::new("web_service.svg"));
    /// ```
    pub fn output_path(&self) -> PathBuf {
        append_extension(&self.output_stem(), self.format.extension())
    }
}

/// Lowercase the title and join its words with underscores
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

// Appends rather than replaces, so "arch.v2" becomes "arch.v2.png".
fn append_extension(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
