//! Flowchart graph - the parser's intermediate node/edge structure.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Label marking the default (else) branch of a condition node.
pub const DEFAULT_LABEL: &str = "*";

/// A node of the flowchart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowNode {
    pub id: String,

    /// Pattern or response text. Empty for placeholders.
    pub text: String,

    /// Declared with `[text]`.
    pub is_pattern: bool,

    /// Declared with `{Condition: type name}`.
    pub is_condition: bool,

    /// Condition keyword as written (`predicate`, `variable`, `star`).
    pub condition_type: String,

    /// State key the condition inspects.
    pub condition_name: String,
}

impl FlowNode {
    fn placeholder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

/// An outgoing edge. An empty label means unconditional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub to: String,
    pub label: String,
}

/// Node/edge graph built from a flowchart corpus.
///
/// Nodes and edges keep their declaration order, so everything compiled from
/// the graph is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// All nodes by ID.
    nodes: HashMap<String, FlowNode>,

    /// Node IDs in first-seen order.
    order: Vec<String>,

    /// Outgoing edges per node (adjacency list).
    edges: HashMap<String, Vec<Edge>>,
}

impl Graph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a node exists, creating an empty placeholder if needed.
    pub fn ensure_node(&mut self, id: &str) -> &mut FlowNode {
        if !self.nodes.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| FlowNode::placeholder(id))
    }

    /// Define or redefine a node's text.
    ///
    /// Non-empty text replaces what was there; empty text never clobbers.
    pub fn set_text(&mut self, id: &str, text: &str) -> &mut FlowNode {
        let node = self.ensure_node(id);
        if !text.is_empty() && node.text != text {
            if !node.text.is_empty() {
                warn!(
                    node = id,
                    old = %node.text,
                    new = %text,
                    "Node redefined, keeping the latest text"
                );
            }
            node.text = text.to_string();
        }
        node
    }

    /// Register a `[text]` node.
    pub fn define_pattern(&mut self, id: &str, text: &str) {
        self.set_text(id, text).is_pattern = true;
    }

    /// Register a `{Condition: type name}` node.
    pub fn define_condition(&mut self, id: &str, condition_type: &str, condition_name: &str) {
        let node = self.ensure_node(id);
        node.is_condition = true;
        node.condition_type = condition_type.to_string();
        node.condition_name = condition_name.to_string();
    }

    /// Add an edge, creating placeholder endpoints for forward references.
    ///
    /// A second edge between the same pair of nodes updates the label.
    pub fn add_edge(&mut self, from: &str, to: &str, label: &str) {
        self.ensure_node(from);
        self.ensure_node(to);

        let edges = self.edges.entry(from.to_string()).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.to == to) {
            debug!(from, to, label, "Duplicate edge, updating label");
            existing.label = label.to_string();
        } else {
            edges.push(Edge {
                to: to.to_string(),
                label: label.to_string(),
            });
        }
    }

    /// Get a node by ID.
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    /// Iterate over nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Outgoing edges of a node in declaration order.
    pub fn outgoing(&self, id: &str) -> &[Edge] {
        self.edges.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Label of the edge `from -> to`, if that edge exists.
    pub fn edge_label(&self, from: &str, to: &str) -> Option<&str> {
        self.outgoing(from)
            .iter()
            .find(|e| e.to == to)
            .map(|e| e.label.as_str())
    }

    /// Nodes without incoming edges that have at least one outgoing edge.
    pub fn start_nodes(&self) -> Vec<&FlowNode> {
        let has_incoming: HashSet<&str> = self
            .edges
            .values()
            .flatten()
            .map(|e| e.to.as_str())
            .collect();

        self.nodes()
            .filter(|n| !has_incoming.contains(n.id.as_str()) && !self.outgoing(&n.id).is_empty())
            .collect()
    }

    /// Get the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Check if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_references_create_placeholders() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", "");

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node("B").unwrap().text, "");

        graph.define_pattern("B", "hi there");
        assert_eq!(graph.node("B").unwrap().text, "hi there");
        assert!(graph.node("B").unwrap().is_pattern);
    }

    #[test]
    fn test_empty_text_never_clobbers() {
        let mut graph = Graph::new();
        graph.define_pattern("A", "hello");
        graph.set_text("A", "");

        assert_eq!(graph.node("A").unwrap().text, "hello");
    }

    #[test]
    fn test_last_definition_wins() {
        let mut graph = Graph::new();
        graph.define_pattern("A", "hello");
        graph.define_pattern("A", "goodbye");

        assert_eq!(graph.node("A").unwrap().text, "goodbye");
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_edges_keep_declaration_order() {
        let mut graph = Graph::new();
        graph.add_edge("A", "C", "");
        graph.add_edge("A", "B", "");
        graph.add_edge("A", "D", "");

        let targets: Vec<_> = graph.outgoing("A").iter().map(|e| e.to.as_str()).collect();
        assert_eq!(targets, vec!["C", "B", "D"]);
    }

    #[test]
    fn test_duplicate_edge_updates_label() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", "true");
        graph.add_edge("A", "B", "*");

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_label("A", "B"), Some("*"));
        assert_eq!(graph.edge_label("A", "C"), None);
    }

    #[test]
    fn test_start_nodes() {
        let mut graph = Graph::new();
        graph.add_edge("A", "B", "");
        graph.add_edge("B", "C", "");
        graph.add_edge("D", "E", "");
        graph.ensure_node("F");

        let starts: Vec<_> = graph.start_nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(starts, vec!["A", "D"]);
    }

    #[test]
    fn test_condition_node_flags() {
        let mut graph = Graph::new();
        graph.define_condition("B", "predicate", "isanumber");

        let node = graph.node("B").unwrap();
        assert!(node.is_condition);
        assert!(!node.is_pattern);
        assert_eq!(node.condition_type, "predicate");
        assert_eq!(node.condition_name, "isanumber");
    }
}
