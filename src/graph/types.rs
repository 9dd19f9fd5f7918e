//! Render-ready graph types shared by the builder and the layout engine.

use std::sync::Arc;

use serde::Serialize;

use super::ast::{AstValue, SourceLocation};

/// 2-D coordinate. `x` is the horizontal center of the node's box, `y` its level offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
}

/// One emitted graph node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Unique within one build.
    pub id: String,
    /// Human-readable label derived from the source value.
    pub kind: String,
    pub position: Position,
    /// Span of the originating value, for mapping a selection back to source text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    /// The originating value. In memory only: on the wire, `location` is the
    /// whole back-reference.
    #[serde(skip)]
    pub source: Arc<AstValue>,
}

impl GraphNode {
    #[must_use]
    pub fn new(id: String, kind: String, source: Arc<AstValue>) -> Self {
        let location = source.location();
        Self { id, kind, position: Position::ORIGIN, location, source }
    }
}

/// Directed parent-to-child edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    #[must_use]
    pub fn new(source: &str, target: &str) -> Self {
        Self { id: format!("{source}->{target}"), source: source.to_owned(), target: target.to_owned() }
    }
}

/// Output of one build: flat node and edge lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
