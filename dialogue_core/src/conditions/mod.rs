//! Conditional responses - user state, condition evaluation, and rendering.
//!
//! Resolution of a [`ConditionalCategory`] works in two passes:
//! 1. **Specific**: the first non-default condition the user's state satisfies
//! 2. **Fallback**: the first condition marked default
//!
//! If neither pass finds a response the category does not answer and the
//! caller falls through to normal dialogue lookup.

mod state;
mod template;

pub use state::*;
pub use template::*;

use corpus_model::{Condition, ConditionType, ConditionalCategory};

/// Check one condition against a user's state.
///
/// A missing key never fails: the condition's own default flag decides.
pub fn evaluate(state: &UserState, condition: &Condition) -> bool {
    match condition.condition_type {
        ConditionType::Predicate => state
            .predicate(&condition.name)
            .map_or(condition.is_default, |value| value == condition.value),
        ConditionType::Variable => state
            .variable(&condition.name)
            .map_or(condition.is_default, |value| value == condition.value),
        ConditionType::Star => state.predicates.contains_key(&condition.name),
    }
}

/// Pick the response of a conditional category for a user.
///
/// Returns `None` when no condition applies.
pub fn resolve<'a>(state: &UserState, category: &'a ConditionalCategory) -> Option<&'a str> {
    category
        .conditions
        .iter()
        .filter(|branch| !branch.condition.is_default)
        .find(|branch| evaluate(state, &branch.condition))
        .or_else(|| category.default_branch())
        .map(|branch| branch.response.as_str())
}
