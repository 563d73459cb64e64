//! Line-oriented flowchart parser.
//!
//! Lines are classified in priority order: comment, blank, flowchart
//! declaration, edge, standalone pattern node, standalone condition node.
//! Anything else is dropped. Nothing before the declaration line is parsed.
//! A line holding exactly one node definition is a node line even when its
//! text contains an arrow.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, info, trace, warn};

use super::Graph;
use crate::error::{Error, Result};

/// Condition name used when a condition node only names its type.
pub const UNKNOWN_CONDITION_NAME: &str = "unknown";

/// `id["quoted text"]` or `id[text]` anywhere in a line.
static PATTERN_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\[(?:\s*"([^"]*)"\s*|([^\]]*))\]"#).expect("pattern node regex")
});

/// `id{Condition: type name}` anywhere in a line.
static CONDITION_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\{\s*Condition:\s*([^}]*)\}").expect("condition node regex")
});

/// A line that is nothing but a pattern node.
static PURE_PATTERN_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\w+)\[(?:\s*"([^"]*)"\s*|([^\]]*))\]$"#).expect("pure pattern node regex")
});

/// A line that is nothing but a condition node.
static PURE_CONDITION_NODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\{\s*Condition:\s*([^}]*)\}$").expect("pure condition node regex")
});

/// `A -->|label| B`, either end may carry an inline definition.
static LABELLED_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(\w+)(?:\[(?:\s*"[^"]*"\s*|[^\]]*)\]|\{[^}]*\})?\s*-->\s*\|([^|]*)\|\s*(\w+)"#,
    )
    .expect("labelled edge regex")
});

/// `A[pattern] --> B{Condition: ...}` with both annotations optional.
static UNLABELLED_EDGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)(?:\[(?:\s*"[^"]*"\s*|[^\]]*)\]|\{[^}]*\})?\s*-->\s*(\w+)"#)
        .expect("unlabelled edge regex")
});

/// `A --> B` with nothing else.
static BARE_EDGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*-->\s*(\w+)").expect("bare edge regex"));

const ARROW: &str = "-->";

/// Classification of one trimmed corpus line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Comment,
    Blank,
    Declaration,
    Edge,
    PatternNode,
    ConditionNode,
    Unrecognized,
}

/// Classify a trimmed line.
pub fn classify_line(line: &str) -> LineKind {
    if line.starts_with("%%") {
        LineKind::Comment
    } else if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with("flowchart") || line.starts_with("graph") {
        LineKind::Declaration
    } else if PURE_PATTERN_NODE.is_match(line) {
        LineKind::PatternNode
    } else if PURE_CONDITION_NODE.is_match(line) {
        LineKind::ConditionNode
    } else if line.contains(ARROW) {
        LineKind::Edge
    } else {
        LineKind::Unrecognized
    }
}

/// Parse flowchart text into a graph. Malformed lines are skipped.
pub fn parse_flowchart(content: &str) -> Graph {
    let mut graph = Graph::new();
    let mut in_flowchart = false;

    for (index, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let line_number = index + 1;

        match classify_line(line) {
            LineKind::Comment | LineKind::Blank => {}
            LineKind::Declaration => {
                trace!(line_number, "Flowchart declaration");
                in_flowchart = true;
            }
            _ if !in_flowchart => {}
            LineKind::Edge => {
                trace!(line_number, line, "Edge line");
                if !parse_edge(line, &mut graph) {
                    warn!(line_number, line, "Skipping unparseable edge");
                }
            }
            LineKind::PatternNode => {
                trace!(line_number, line, "Pattern node line");
                register_pattern_nodes(line, &mut graph);
            }
            LineKind::ConditionNode => {
                trace!(line_number, line, "Condition node line");
                register_condition_nodes(line, &mut graph);
            }
            LineKind::Unrecognized => {
                debug!(line_number, line, "Dropping unrecognized line");
            }
        }
    }

    graph
}

/// Parse one corpus source, failing when it yields no nodes.
pub fn parse_corpus(source_name: &str, content: &str) -> Result<Graph> {
    let graph = parse_flowchart(content);
    if graph.is_empty() {
        return Err(Error::EmptyCorpus {
            source_name: source_name.to_string(),
        });
    }

    info!(
        source = source_name,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Parsed flowchart corpus"
    );
    Ok(graph)
}

/// Try the edge forms in order; the first that matches wins.
fn parse_edge(line: &str, graph: &mut Graph) -> bool {
    let (from, to, label, definitions) = if let Some(caps) = LABELLED_EDGE.captures(line) {
        (
            caps[1].to_string(),
            caps[3].to_string(),
            caps[2].trim().to_string(),
            without_label(line, &caps),
        )
    } else if let Some(caps) = UNLABELLED_EDGE.captures(line) {
        (caps[1].to_string(), caps[2].to_string(), String::new(), line.to_string())
    } else if let Some(caps) = BARE_EDGE.captures(line) {
        (caps[1].to_string(), caps[2].to_string(), String::new(), line.to_string())
    } else {
        return false;
    };

    // Inline definitions first, so the edge's endpoints carry their text.
    register_pattern_nodes(&definitions, graph);
    register_condition_nodes(&definitions, graph);

    trace!(from = %from, to = %to, label = %label, "Edge");
    graph.add_edge(&from, &to, &label);
    true
}

/// The line with its `|label|` cut out, so label text is never read as a node.
fn without_label(line: &str, caps: &Captures<'_>) -> String {
    match caps.get(2) {
        // The label group sits between two single-byte `|` delimiters.
        Some(label) => format!("{} {}", &line[..label.start() - 1], &line[label.end() + 1..]),
        None => line.to_string(),
    }
}

fn bracket_text<'a>(caps: &'a Captures<'_>) -> &'a str {
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().trim())
        .unwrap_or("")
}

fn register_pattern_nodes(line: &str, graph: &mut Graph) {
    for caps in PATTERN_NODE.captures_iter(line) {
        graph.define_pattern(&caps[1], bracket_text(&caps));
    }
}

fn register_condition_nodes(line: &str, graph: &mut Graph) {
    for caps in CONDITION_NODE.captures_iter(line) {
        let id = &caps[1];
        let mut words = caps[2].split_whitespace();
        match (words.next(), words.next()) {
            (Some(condition_type), name) => {
                let name = name.unwrap_or(UNKNOWN_CONDITION_NAME);
                graph.define_condition(id, condition_type, name);
            }
            (None, _) => warn!(node = id, "Condition node without a type, ignoring"),
        }
    }
}
