//! Graphviz backend
//!
//! [`DotRenderer`] emits DOT source; [`GraphvizRenderer`] checks icons, runs
//! the `dot` layout engine and writes the image file.

mod dot;
mod engine;
mod icons;

pub use dot::*;
pub use engine::*;
pub use icons::*;
