//! Flowchart writer - exports plain categories back to corpus text.

use std::collections::HashSet;
use std::fmt::Write;

use corpus_model::Category;

/// Number of letters taken from a text to build its node ID.
const ID_PREFIX_LEN: usize = 3;

/// Renders categories as a flowchart that the parser reads back.
///
/// Every category gets its own pattern node and its own response nodes, so
/// a text used both as a pattern and as a response, or a pattern shared by
/// several categories, survives a round trip. Node IDs are derived from the
/// first letters of the text, so the output stays readable when edited by
/// hand.
#[derive(Debug, Default)]
pub struct FlowchartWriter {
    used: HashSet<String>,
    fallback_counter: usize,
}

impl FlowchartWriter {
    /// Render categories in one pass.
    pub fn render(categories: &[Category]) -> String {
        Self::default().write(categories)
    }

    fn write(&mut self, categories: &[Category]) -> String {
        let mut out = String::from("flowchart TD\n");
        let mut edges = Vec::new();

        for category in categories {
            let from = self.define(&mut out, &category.pattern);
            for template in &category.templates {
                let to = self.define(&mut out, template);
                edges.push((from.clone(), to));
            }
        }

        if !categories.is_empty() {
            out.push('\n');
        }

        for (from, to) in edges {
            let _ = writeln!(out, "    {} --> {}", from, to);
        }

        out
    }

    /// Allocate a fresh node for `text` and write its definition.
    fn define(&mut self, out: &mut String, text: &str) -> String {
        let id = self.allocate_id(text);
        self.used.insert(id.clone());
        let _ = writeln!(out, "    {}[\"{}\"]", id, text.replace('"', "'"));
        id
    }

    fn allocate_id(&mut self, text: &str) -> String {
        let base: String = text
            .chars()
            .filter(char::is_ascii_alphabetic)
            .take(ID_PREFIX_LEN)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if base.is_empty() {
            loop {
                self.fallback_counter += 1;
                let candidate = format!("N{}", self.fallback_counter);
                if !self.used.contains(&candidate) {
                    return candidate;
                }
            }
        }

        if !self.used.contains(&base) {
            return base;
        }

        let mut suffix = 1;
        loop {
            let candidate = format!("{}{}", base, suffix);
            if !self.used.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flowchart::{compile, parse_flowchart};

    fn category(pattern: &str, templates: &[&str]) -> Category {
        Category::new(pattern, templates.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_render_layout() {
        let output = FlowchartWriter::render(&[category("hello", &["hi there"])]);
        assert_eq!(
            output,
            "flowchart TD\n    HEL[\"hello\"]\n    HIT[\"hi there\"]\n\n    HEL --> HIT\n"
        );
    }

    #[test]
    fn test_id_collisions_and_fallback() {
        let output = FlowchartWriter::render(&[
            category("hello", &["help me", "123"]),
            category("Hel", &["456"]),
        ]);

        assert!(output.contains("HEL[\"hello\"]"));
        assert!(output.contains("HEL1[\"help me\"]"));
        assert!(output.contains("N1[\"123\"]"));
        assert!(output.contains("HEL2[\"Hel\"]"));
        assert!(output.contains("N2[\"456\"]"));
        assert!(output.contains("HEL --> HEL1"));
        assert!(output.contains("HEL2 --> N2"));
    }

    #[test]
    fn test_quotes_are_replaced() {
        let output = FlowchartWriter::render(&[category("say \"hi\"", &["ok"])]);
        assert!(output.contains("SAY[\"say 'hi'\"]"));
    }

    #[test]
    fn test_round_trip_through_parser() {
        let categories = vec![
            category("hello", &["hi", "hey there [friend]"]),
            category("I AM *", &["nice to meet you, <star/>"]),
            category("what time is it", &["no idea"]),
        ];

        let text = FlowchartWriter::render(&categories);
        let compiled = compile(&parse_flowchart(&text), "");

        let patterns: Vec<_> = compiled.categories.iter().map(|c| c.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["hello", "I AM *", "what time is it"]);
        assert_eq!(compiled.categories[0].templates, vec!["hi", "hey there [friend]"]);
        assert_eq!(compiled.categories[1].templates, vec!["nice to meet you, <star/>"]);
    }

    fn round_trip(categories: &[Category]) -> Vec<(String, Vec<String>)> {
        let text = FlowchartWriter::render(categories);
        compile(&parse_flowchart(&text), "")
            .categories
            .into_iter()
            .map(|c| (c.pattern, c.templates))
            .collect()
    }

    fn expected(categories: &[Category]) -> Vec<(String, Vec<String>)> {
        categories
            .iter()
            .map(|c| (c.pattern.clone(), c.templates.clone()))
            .collect()
    }

    #[test]
    fn test_round_trip_text_used_as_pattern_and_response() {
        let categories = vec![category("hi", &["hello"]), category("hello", &["hi"])];
        assert_eq!(round_trip(&categories), expected(&categories));
    }

    #[test]
    fn test_round_trip_echo_category() {
        let categories = vec![category("echo", &["echo"])];
        assert_eq!(round_trip(&categories), expected(&categories));
    }

    #[test]
    fn test_round_trip_shared_pattern_stays_separate() {
        let categories = vec![category("a", &["b"]), category("a", &["c"])];
        assert_eq!(round_trip(&categories), expected(&categories));
    }

    #[test]
    fn test_round_trip_repeated_template() {
        let categories = vec![category("knock knock", &["who is there?", "who is there?"])];
        assert_eq!(round_trip(&categories), expected(&categories));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(FlowchartWriter::render(&[]), "flowchart TD\n");
    }
}
