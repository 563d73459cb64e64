//! Per-user dialogue state.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::matching::Captures;

/// Predicates, variables, and context of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    /// Persistent named facts, e.g. `age_known = true`.
    pub predicates: HashMap<String, String>,

    /// Session-scoped values, including wildcard captures.
    pub variables: HashMap<String, String>,

    /// Free-form values.
    pub context: HashMap<String, String>,
}

impl UserState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a predicate value.
    pub fn predicate(&self, name: &str) -> Option<&str> {
        self.predicates.get(name).map(String::as_str)
    }

    /// Get a variable value.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

/// Concurrent store of [`UserState`] keyed by user ID.
///
/// States are created on first access and live as long as the store.
/// Each user's entry is locked independently, so turns of different users
/// never contend.
#[derive(Debug, Default)]
pub struct UserStateStore {
    states: DashMap<String, UserState>,
}

impl UserStateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a user's state, creating it if needed.
    pub fn get_state(&self, user_id: &str) -> UserState {
        self.states.entry(user_id.to_string()).or_default().value().clone()
    }

    /// Set a persistent predicate.
    pub fn set_predicate(&self, user_id: &str, name: &str, value: &str) {
        self.update(user_id, |state| {
            state.predicates.insert(name.to_string(), value.to_string());
        });
    }

    /// Set a session variable.
    pub fn set_variable(&self, user_id: &str, name: &str, value: &str) {
        self.update(user_id, |state| {
            state.variables.insert(name.to_string(), value.to_string());
        });
    }

    /// Write all captures of one match under a single entry lock.
    pub fn set_variables(&self, user_id: &str, captures: &Captures) {
        if captures.is_empty() {
            return;
        }
        self.update(user_id, |state| {
            state
                .variables
                .extend(captures.iter().map(|(k, v)| (k.clone(), v.clone())));
        });
    }

    /// Reset variables, leaving predicates and context untouched.
    pub fn clear_variables(&self, user_id: &str) {
        self.update(user_id, |state| state.variables.clear());
    }

    /// Set a context value.
    pub fn set_context(&self, user_id: &str, name: &str, value: &str) {
        self.update(user_id, |state| {
            state.context.insert(name.to_string(), value.to_string());
        });
    }

    /// Forget a user entirely.
    pub fn remove(&self, user_id: &str) -> Option<UserState> {
        self.states.remove(user_id).map(|(_, state)| state)
    }

    /// Number of users seen so far.
    pub fn user_count(&self) -> usize {
        self.states.len()
    }

    fn update(&self, user_id: &str, f: impl FnOnce(&mut UserState)) {
        let mut entry = self.states.entry(user_id.to_string()).or_default();
        f(entry.value_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_created_lazily() {
        let store = UserStateStore::new();
        assert_eq!(store.user_count(), 0);

        let state = store.get_state("alice");
        assert_eq!(state, UserState::new());
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_predicates_and_variables() {
        let store = UserStateStore::new();
        store.set_predicate("alice", "age_known", "true");
        store.set_variable("alice", "star", "Beijing");
        store.set_context("alice", "channel", "console");

        let state = store.get_state("alice");
        assert_eq!(state.predicate("age_known"), Some("true"));
        assert_eq!(state.variable("star"), Some("Beijing"));
        assert_eq!(state.context["channel"], "console");
        assert_eq!(store.get_state("bob"), UserState::new());
    }

    #[test]
    fn test_clear_variables_keeps_predicates() {
        let store = UserStateStore::new();
        store.set_predicate("alice", "name", "Alice");
        store.set_variable("alice", "star", "x");
        store.set_context("alice", "mode", "chat");

        store.clear_variables("alice");

        let state = store.get_state("alice");
        assert!(state.variables.is_empty());
        assert_eq!(state.predicate("name"), Some("Alice"));
        assert_eq!(state.context.len(), 1);
    }

    #[test]
    fn test_set_variables_from_captures() {
        let store = UserStateStore::new();
        let captures: Captures = [("star", "Bob"), ("star1", "Bob")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        store.set_variables("alice", &captures);
        assert_eq!(store.get_state("alice").variables, captures);

        store.set_variables("carol", &Captures::new());
        assert_eq!(store.user_count(), 1);
    }

    #[test]
    fn test_remove_user() {
        let store = UserStateStore::new();
        store.set_predicate("alice", "a", "1");
        assert!(store.remove("alice").is_some());
        assert!(store.remove("alice").is_none());
        assert_eq!(store.user_count(), 0);
    }
}
