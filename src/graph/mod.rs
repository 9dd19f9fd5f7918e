//! Syntax tree to positioned graph conversion.
//!
//! The parser's JSON tree is converted into an [`ast::AstValue`], flattened into
//! nodes and edges by [`build::GraphBuilder`], and positioned by
//! [`layout::TreeLayoutEngine`]. Both steps are pure and synchronous.

pub mod ast;
pub mod build;
pub mod decode;
pub mod layout;
pub mod types;

use std::sync::Arc;

pub use ast::AstValue;
pub use build::{BuildOptions, GraphBuilder, UntypedMappingPolicy};
pub use decode::{DecodeError, MAX_TREE_DEPTH, decode_tree};
pub use layout::{LayoutConfig, LayoutError, LayoutSummary, TreeLayoutEngine};
pub use types::{Graph, GraphEdge, GraphNode, Position};

/// Build a graph from `ast` and position its nodes.
#[must_use]
pub fn render(ast: &Arc<AstValue>, builder: &GraphBuilder, engine: &TreeLayoutEngine) -> Graph {
    let Graph { nodes, edges } = builder.build(ast);
    let nodes = engine.layout(nodes, &edges);
    Graph { nodes, edges }
}

/// [`render`] for a raw JSON document.
#[must_use]
pub fn render_json(doc: serde_json::Value, builder: &GraphBuilder, engine: &TreeLayoutEngine) -> Graph {
    render(&Arc::new(AstValue::from(doc)), builder, engine)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
