pub mod color;
pub mod graph;

pub use color::Color;
pub use graph::{ColoredGraph, Edge, DEFAULT_EDGE_PROBABILITY};
