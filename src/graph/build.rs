//! Graph builder: flattens a syntax tree into nodes and parent-to-child edges.
//!
//! DESIGN
//! ======
//! Depth-first, fields in document order, elements in sequence order. All
//! per-build state (id counters, accumulated nodes and edges) lives in a
//! `BuildState` owned by one `build` call, so a `GraphBuilder` can be shared
//! and reused freely.
//!
//! Scalars never become nodes of their own. A typed node's string `value` is
//! folded into its label; other scalars are dropped from the graph but stay
//! reachable through the node's `source` back-reference.

use std::collections::HashMap;
use std::sync::Arc;

use super::ast::{AstValue, TypedNode};
use super::types::{Graph, GraphEdge, GraphNode};

/// Label shown for sequence nodes.
pub const SEQUENCE_LABEL: &str = "[...]";
/// Id tag used for values without a type tag.
pub const UNNAMED_TAG: &str = "unnamed";

/// What to do with a mapping that has no `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UntypedMappingPolicy {
    /// Emit one node labeled with the mapping's entries, then descend.
    #[default]
    Emit,
    /// Emit nothing; composite children attach to the nearest emitted ancestor.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub untyped_mappings: UntypedMappingPolicy,
}

/// Converts an [`AstValue`] into a flat [`Graph`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    options: BuildOptions,
}

#[derive(Default)]
struct BuildState {
    counters: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl BuildState {
    fn next_id(&mut self, tag: &str) -> String {
        let n = self.counters.entry(tag.to_owned()).or_insert(0);
        *n += 1;
        format!("{tag}_{n}")
    }

    fn emit(&mut self, parent: Option<&str>, tag: &str, label: String, source: &Arc<AstValue>) -> String {
        let id = self.next_id(tag);
        if let Some(parent) = parent {
            self.edges.push(GraphEdge::new(parent, &id));
        }
        self.nodes.push(GraphNode::new(id.clone(), label, Arc::clone(source)));
        id
    }
}

impl GraphBuilder {
    #[must_use]
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Flatten `ast` into nodes and edges. Id counters start fresh on every call.
    #[must_use]
    pub fn build(&self, ast: &Arc<AstValue>) -> Graph {
        self.build_from(ast, None)
    }

    /// Like [`build`](Self::build), but the traversal root gets an incoming
    /// edge from `parent_id`, for callers grafting a subtree onto an existing graph.
    #[must_use]
    pub fn build_under(&self, ast: &Arc<AstValue>, parent_id: &str) -> Graph {
        self.build_from(ast, Some(parent_id))
    }

    fn build_from(&self, ast: &Arc<AstValue>, parent: Option<&str>) -> Graph {
        let mut state = BuildState::default();
        self.visit(&mut state, ast, parent);
        tracing::debug!(nodes = state.nodes.len(), edges = state.edges.len(), "graph built");
        Graph { nodes: state.nodes, edges: state.edges }
    }

    fn visit(&self, state: &mut BuildState, value: &Arc<AstValue>, parent: Option<&str>) {
        match value.as_ref() {
            AstValue::Node(node) => {
                let id = state.emit(parent, &node.kind, node_label(node, value), value);
                self.visit_children(state, node.fields.iter().map(|(_, child)| child), Some(&id));
            }
            AstValue::Sequence(items) => {
                let id = state.emit(parent, UNNAMED_TAG, SEQUENCE_LABEL.to_owned(), value);
                self.visit_children(state, items.iter(), Some(&id));
            }
            AstValue::Mapping(fields) => {
                let children = fields.iter().map(|(_, child)| child);
                match self.options.untyped_mappings {
                    UntypedMappingPolicy::Emit => {
                        let id = state.emit(parent, UNNAMED_TAG, mapping_label(fields), value);
                        self.visit_children(state, children, Some(&id));
                    }
                    UntypedMappingPolicy::Skip => self.visit_children(state, children, parent),
                }
            }
            AstValue::Scalar(scalar) => {
                // Only reachable for a scalar traversal root.
                state.emit(parent, UNNAMED_TAG, scalar.to_string(), value);
            }
        }
    }

    fn visit_children<'a>(
        &self,
        state: &mut BuildState,
        children: impl Iterator<Item = &'a Arc<AstValue>>,
        parent: Option<&str>,
    ) {
        for child in children.filter(|c| c.is_composite()) {
            self.visit(state, child, parent);
        }
    }
}

fn node_label(node: &TypedNode, value: &AstValue) -> String {
    match value.string_value() {
        Some(text) => format!("{kind}: \"{text}\"", kind = node.kind),
        None => node.kind.clone(),
    }
}

/// Compact `key: value` rendering; composite values appear inline as JSON.
fn mapping_label(fields: &[(String, Arc<AstValue>)]) -> String {
    if fields.is_empty() {
        return "{}".to_owned();
    }
    let mut label = String::new();
    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            label.push_str(", ");
        }
        label.push_str(&format!("{key}: {}", value.to_json()));
    }
    label
}

#[cfg(test)]
#[path = "build_test.rs"]
mod tests;
