//! Core error types for diagram construction and rendering
//!
//! Builders, emitters and the Graphviz driver all report failures through
//! [`DiagramError`]; public entry points wrap it in `anyhow::Error`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Unknown node: {id}")]
    UnknownNode { id: String },

    #[error("Unknown cluster: {id}")]
    UnknownCluster { id: String },

    #[error("Icon not found: {}", path.display())]
    IconNotFound { path: PathBuf },

    #[error("Invalid icon {}: {message}", path.display())]
    InvalidIcon { path: PathBuf, message: String },

    #[error("Layout engine unavailable: {engine} ({message})")]
    EngineUnavailable { engine: String, message: String },

    #[error("Layout engine failed with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Create a new unknown cluster error
    pub fn unknown_cluster(id: impl Into<String>) -> Self {
        Self::UnknownCluster { id: id.into() }
    }

    /// Create a new invalid icon error
    pub fn invalid_icon(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidIcon {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new engine failure error
    pub fn engine_failed(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::EngineFailed {
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}
