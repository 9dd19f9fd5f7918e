//! Syntax tree visualizer backend.
//!
//! Source text goes to an external parser, the resulting JSON tree is
//! flattened into a graph, and the graph is laid out as a top-down tree
//! ready for a drawing front end.

pub mod config;
pub mod graph;
pub mod parser;
pub mod routes;
pub mod state;
