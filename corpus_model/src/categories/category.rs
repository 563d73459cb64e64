//! Plain categories - a pattern and its candidate responses.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How one template is picked from a category with several responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSelection {
    /// Pick uniformly at random.
    #[default]
    Random,
    /// Always answer with the first template.
    First,
}

/// A trigger utterance and the responses it can produce.
///
/// Identity is positional: several categories may share a pattern and are
/// still independent entries of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Trigger utterance, may contain `*` / `_` wildcard tokens.
    pub pattern: String,

    /// Candidate responses in declaration order.
    pub templates: Vec<String>,

    /// File the category was loaded from. Empty for entries created at runtime.
    #[serde(default)]
    pub source_file: String,
}

impl Category {
    /// Create a new category with no provenance.
    pub fn new(pattern: impl Into<String>, templates: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            templates,
            source_file: String::new(),
        }
    }

    /// Set the source file.
    pub fn with_source(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Append a response template.
    pub fn add_template(&mut self, template: impl Into<String>) {
        self.templates.push(template.into());
    }

    /// Pick one template according to the selection policy.
    pub fn pick_template(&self, selection: ResponseSelection) -> Option<&str> {
        match selection {
            ResponseSelection::First => self.templates.first(),
            ResponseSelection::Random => self.templates.choose(&mut rand::thread_rng()),
        }
        .map(String::as_str)
    }
}
