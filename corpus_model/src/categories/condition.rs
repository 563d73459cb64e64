//! Conditional categories - responses gated by per-user state.

use serde::{Deserialize, Serialize};

/// What part of the user state a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// Compare a persistent predicate against the expected value.
    Predicate,
    /// Compare a session variable against the expected value.
    Variable,
    /// Satisfied when the named predicate is set at all.
    Star,
}

impl ConditionType {
    /// Map a corpus keyword (`predicate`, `variable`, `star`) to a condition type.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "predicate" => Some(ConditionType::Predicate),
            "variable" => Some(ConditionType::Variable),
            "star" => Some(ConditionType::Star),
            _ => None,
        }
    }

    /// The corpus keyword for this type.
    pub fn keyword(&self) -> &'static str {
        match self {
            ConditionType::Predicate => "predicate",
            ConditionType::Variable => "variable",
            ConditionType::Star => "star",
        }
    }
}

impl std::fmt::Display for ConditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A single test against a user's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub condition_type: ConditionType,
    /// Key looked up in the user state.
    pub name: String,
    /// Expected value for the equality types.
    pub value: String,
    /// The "else" branch of a conditional category.
    pub is_default: bool,
}

impl Condition {
    /// Create a non-default condition.
    pub fn new(
        condition_type: ConditionType,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            condition_type,
            name: name.into(),
            value: value.into(),
            is_default: false,
        }
    }

    /// Create a default (else) condition keyed on `name`.
    pub fn default_branch(condition_type: ConditionType, name: impl Into<String>) -> Self {
        Self {
            condition_type,
            name: name.into(),
            value: "*".to_string(),
            is_default: true,
        }
    }
}

/// A condition paired with the response it selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalResponse {
    pub condition: Condition,
    pub response: String,
}

/// A pattern whose response is chosen by evaluating conditions in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalCategory {
    pub pattern: String,
    /// Ordered branches. The first satisfied non-default branch wins.
    pub conditions: Vec<ConditionalResponse>,
}

impl ConditionalCategory {
    /// Create a conditional category with no branches.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            conditions: Vec::new(),
        }
    }

    /// Append a branch.
    pub fn with_branch(mut self, condition: Condition, response: impl Into<String>) -> Self {
        self.conditions.push(ConditionalResponse {
            condition,
            response: response.into(),
        });
        self
    }

    /// The first branch marked as default, if any.
    pub fn default_branch(&self) -> Option<&ConditionalResponse> {
        self.conditions.iter().find(|c| c.condition.is_default)
    }
}
