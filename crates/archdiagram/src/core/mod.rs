//! Core abstractions for architecture diagrams
//!
//! The data model (nodes, clusters, edges), the scoped builder, diagram-wide
//! configuration and the renderer trait implemented by output backends.

mod builder;
mod config;
mod diagram;
mod error;
pub mod logging;
mod renderer;
mod text;
mod types;

pub use builder::*;
pub use config::*;
pub use diagram::*;
pub use error::*;
pub use logging::*;
pub use renderer::*;
pub use text::*;
pub use types::*;
