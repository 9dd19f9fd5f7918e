//! Tree layout engine: assigns every node of a rooted tree a non-overlapping position.
//!
//! DESIGN
//! ======
//! Simplified Reingold-Tilford in two passes over a tree rebuilt from the edge list:
//! 1. Width pass (bottom-up): a leaf claims `node_width`; an inner node claims
//!    the larger of its own box and its children's widths plus the gaps between them.
//! 2. Placement pass (top-down): children sit left to right in slices of their
//!    own width, `horizontal_gap` apart, the row centered under the parent.
//!
//! `y` depends only on depth. Child order follows edge order, which is the
//! builder's traversal order. Both passes iterate a breadth-first order
//! instead of recursing, so deep trees cannot exhaust the stack.
//!
//! ERROR HANDLING
//! ==============
//! Edges naming unknown ids are ignored. When no unique root exists the layout
//! is skipped and nodes keep the positions they arrived with.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{GraphEdge, GraphNode, Position};

pub const DEFAULT_NODE_WIDTH: f64 = 120.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 40.0;
pub const DEFAULT_HORIZONTAL_GAP: f64 = 50.0;
pub const DEFAULT_VERTICAL_GAP: f64 = 80.0;

/// Box geometry and spacing, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between adjacent sibling subtrees.
    pub horizontal_gap: f64,
    /// Gap between levels.
    pub vertical_gap: f64,
    /// Root x.
    pub origin_x: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            horizontal_gap: DEFAULT_HORIZONTAL_GAP,
            vertical_gap: DEFAULT_VERTICAL_GAP,
            origin_x: 0.0,
        }
    }
}

/// Whether `value` can serve as a box size or gap: finite and strictly positive.
#[must_use]
pub fn is_valid_length(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl LayoutConfig {
    /// Distance between the `y` of consecutive levels.
    #[must_use]
    pub fn level_height(&self) -> f64 {
        self.node_height + self.vertical_gap
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("no nodes to lay out")]
    Empty,
    #[error("every node has an incoming edge")]
    NoRoot,
    #[error("{count} nodes have no incoming edge")]
    MultipleRoots { count: usize },
}

/// Outcome of a successful layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSummary {
    pub root: String,
    /// Nodes reachable from the root (and therefore positioned).
    pub node_count: usize,
    /// Deepest level, root = 0.
    pub depth: usize,
    /// Horizontal footprint of the whole tree.
    pub width: f64,
}

/// Rooted tree over node indices, rebuilt from the edge list for one layout pass.
struct LayoutTree {
    root: usize,
    children: Vec<Vec<usize>>,
    /// Breadth-first order from the root; parents precede children.
    order: Vec<usize>,
    depth: Vec<usize>,
}

impl LayoutTree {
    fn build(nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<Self, LayoutError> {
        if nodes.is_empty() {
            return Err(LayoutError::Empty);
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                tracing::warn!(id = %node.id, "duplicate node id in layout input");
            }
        }

        let mut children = vec![Vec::new(); nodes.len()];
        let mut has_incoming = HashSet::new();
        for edge in edges {
            let (Some(&source), Some(&target)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str()))
            else {
                tracing::debug!(edge = %edge.id, "edge references unknown node; ignored");
                continue;
            };
            children[source].push(target);
            has_incoming.insert(target);
        }

        let roots: Vec<usize> = (0..nodes.len()).filter(|i| !has_incoming.contains(i)).collect();
        let root = match roots.as_slice() {
            [root] => *root,
            [] => return Err(LayoutError::NoRoot),
            _ => return Err(LayoutError::MultipleRoots { count: roots.len() }),
        };

        // Keep only the first edge into each node so the walk sees a tree.
        let mut seen = vec![false; nodes.len()];
        let mut depth = vec![0; nodes.len()];
        let mut order = Vec::with_capacity(nodes.len());
        let mut queue = VecDeque::from([root]);
        seen[root] = true;
        while let Some(node) = queue.pop_front() {
            order.push(node);
            let mut kept = Vec::with_capacity(children[node].len());
            for &child in &children[node] {
                if seen[child] {
                    continue;
                }
                seen[child] = true;
                depth[child] = depth[node] + 1;
                kept.push(child);
                queue.push_back(child);
            }
            children[node] = kept;
        }

        Ok(Self { root, children, order, depth })
    }

    /// Width pass: every subtree's horizontal footprint, indexed like the nodes.
    fn subtree_widths(&self, config: &LayoutConfig) -> Vec<f64> {
        let mut widths = vec![config.node_width; self.children.len()];
        for &node in self.order.iter().rev() {
            let kids = &self.children[node];
            if !kids.is_empty() {
                widths[node] = f64::max(config.node_width, row_width(kids, &widths, config.horizontal_gap));
            }
        }
        widths
    }

    /// Placement pass: center x for every node in `order`, indexed like the nodes.
    fn place(&self, config: &LayoutConfig, widths: &[f64]) -> Vec<f64> {
        let mut xs = vec![config.origin_x; self.children.len()];
        for &node in &self.order {
            let kids = &self.children[node];
            let mut left = xs[node] - row_width(kids, widths, config.horizontal_gap) / 2.0;
            for &child in kids {
                xs[child] = left + widths[child] / 2.0;
                left += widths[child] + config.horizontal_gap;
            }
        }
        xs
    }
}

/// Total width of a row of sibling subtrees including the gaps between them.
fn row_width(kids: &[usize], widths: &[f64], gap: f64) -> f64 {
    let sum: f64 = kids.iter().map(|&c| widths[c]).sum();
    #[allow(clippy::cast_precision_loss)]
    let gaps = kids.len().saturating_sub(1) as f64 * gap;
    sum + gaps
}

/// Positions the nodes of a rooted tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeLayoutEngine {
    config: LayoutConfig,
}

impl TreeLayoutEngine {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position `nodes` using `edges`; returns the same nodes.
    ///
    /// Degenerate input (no nodes, no root, several roots) is returned unchanged.
    #[must_use]
    pub fn layout(&self, mut nodes: Vec<GraphNode>, edges: &[GraphEdge]) -> Vec<GraphNode> {
        match self.try_layout(&mut nodes, edges) {
            Ok(summary) => {
                tracing::debug!(
                    root = %summary.root,
                    nodes = summary.node_count,
                    depth = summary.depth,
                    width = summary.width,
                    "layout complete"
                );
            }
            Err(e) => tracing::debug!(error = %e, "layout skipped"),
        }
        nodes
    }

    /// Position `nodes` in place.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] when no unique root exists; `nodes` are left untouched.
    pub fn try_layout(&self, nodes: &mut [GraphNode], edges: &[GraphEdge]) -> Result<LayoutSummary, LayoutError> {
        let tree = LayoutTree::build(nodes, edges)?;
        let widths = tree.subtree_widths(&self.config);
        let xs = tree.place(&self.config, &widths);
        let level_height = self.config.level_height();

        for &i in &tree.order {
            #[allow(clippy::cast_precision_loss)]
            let y = tree.depth[i] as f64 * level_height;
            nodes[i].position = Position { x: xs[i], y };
        }

        Ok(LayoutSummary {
            root: nodes[tree.root].id.clone(),
            node_count: tree.order.len(),
            depth: tree.order.iter().map(|&i| tree.depth[i]).max().unwrap_or(0),
            width: widths[tree.root],
        })
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
