//! Corpus compiler - walks a flowchart graph and emits dialogue categories.

use corpus_model::{Category, Condition, ConditionType, ConditionalCategory, ConditionalResponse};
use tracing::{debug, trace};

use super::{FlowNode, Graph, DEFAULT_LABEL};

/// Categories compiled from one or more corpus sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledCorpus {
    pub categories: Vec<Category>,
    pub conditional_categories: Vec<ConditionalCategory>,
}

impl CompiledCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append everything from another compiled corpus.
    pub fn extend(&mut self, other: CompiledCorpus) {
        self.categories.extend(other.categories);
        self.conditional_categories.extend(other.conditional_categories);
    }

    /// Check if nothing was compiled.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.conditional_categories.is_empty()
    }
}

/// Compile a graph into plain and conditional categories.
///
/// # Plain categories
///
/// Every start node (no incoming edge, at least one outgoing edge) becomes a
/// category whose templates are the texts of its direct successors. Edges to
/// condition nodes and empty texts are skipped; a start node left with no
/// templates yields nothing.
///
/// # Conditional categories
///
/// Every pattern node that points at one or more condition nodes becomes a
/// conditional category. Each outgoing edge of such a condition node is one
/// branch: the edge label is the expected value and `*` marks the default.
pub fn compile(graph: &Graph, source_file: &str) -> CompiledCorpus {
    let categories = graph
        .start_nodes()
        .into_iter()
        .filter_map(|node| compile_category(graph, node, source_file))
        .collect::<Vec<_>>();

    let conditional_categories = graph
        .nodes()
        .filter(|node| node.is_pattern)
        .filter_map(|node| compile_conditional(graph, node))
        .collect::<Vec<_>>();

    debug!(
        source = source_file,
        categories = categories.len(),
        conditional = conditional_categories.len(),
        "Compiled flowchart"
    );

    CompiledCorpus {
        categories,
        conditional_categories,
    }
}

fn compile_category(graph: &Graph, start: &FlowNode, source_file: &str) -> Option<Category> {
    if start.text.is_empty() {
        trace!(node = %start.id, "Start node without text, skipping");
        return None;
    }

    let templates: Vec<String> = graph
        .outgoing(&start.id)
        .iter()
        .filter_map(|edge| graph.node(&edge.to))
        .filter(|target| !target.is_condition && !target.text.is_empty())
        .map(|target| target.text.clone())
        .collect();

    if templates.is_empty() {
        trace!(node = %start.id, "Start node without responses, skipping");
        return None;
    }

    Some(Category::new(start.text.clone(), templates).with_source(source_file))
}

fn compile_conditional(graph: &Graph, pattern: &FlowNode) -> Option<ConditionalCategory> {
    let conditions: Vec<ConditionalResponse> = graph
        .outgoing(&pattern.id)
        .iter()
        .filter_map(|edge| graph.node(&edge.to))
        .filter(|target| target.is_condition)
        .flat_map(|condition_node| condition_branches(graph, condition_node))
        .collect();

    if conditions.is_empty() {
        return None;
    }

    Some(ConditionalCategory {
        pattern: pattern.text.clone(),
        conditions,
    })
}

fn condition_branches(graph: &Graph, condition_node: &FlowNode) -> Vec<ConditionalResponse> {
    let condition_type = map_condition_type(&condition_node.condition_type);

    graph
        .outgoing(&condition_node.id)
        .iter()
        .map(|edge| {
            let response = graph
                .node(&edge.to)
                .map(|n| n.text.clone())
                .unwrap_or_default();

            ConditionalResponse {
                condition: Condition {
                    condition_type,
                    name: condition_node.condition_name.clone(),
                    value: edge.label.clone(),
                    is_default: edge.label == DEFAULT_LABEL,
                },
                response,
            }
        })
        .collect()
}

/// Map a condition keyword, falling back to a predicate check.
fn map_condition_type(keyword: &str) -> ConditionType {
    ConditionType::from_keyword(keyword).unwrap_or_else(|| {
        debug!(keyword, "Unknown condition type, treating as predicate");
        ConditionType::Predicate
    })
}
