//! Helper functions for building small weighted graphs and rendering them
//! through graphviz.
//!
//! The whole crate is a thin ergonomic layer: graph layout and image encoding
//! are delegated to the external `dot` binary, and opening the result is
//! delegated to the OS launcher.
//!
//! ```no_run
//! use graphwork::{quick, Direction};
//!
//! # fn main() -> anyhow::Result<()> {
//! // Edges are ((tail, head), weight) pairs, or two-character tokens:
//! // ("AB", 4) is short for (("A", "B"), 4).
//! quick(&["A", "B", "C"], vec![("AB", 4), ("BC", 2)], Direction::LeftToRight, false)?;
//! # Ok(())
//! # }
//! ```
//!
//! Passing `open = true` launches the rendered image in the OS default image
//! viewer. If the viewer reloads changed files you only need it once per
//! session.

pub mod example;
pub mod graph;
pub mod render;

pub use graph::{build_graph, build_graph_with, Direction, Edge, EdgeSpec, Graph, GraphConfig, GraphSpec};
pub use render::{quick, render, render_with, show, ImageFormat, RenderConfig};
