//! Dialogue engine - answers user input from the compiled corpus.
//!
//! Lookup order for every message:
//! 1. **Conditional**: categories whose response depends on user state
//! 2. **Pattern**: exact, wildcard, or word-sequence match on plain categories
//! 3. **Similarity**: closest plain category above the configured threshold
//! 4. **Default**: the configured default response

mod loader;
mod store;

pub use loader::*;
pub use store::*;

use corpus_model::{ConditionalCategory, EngineConfig};
use tracing::{debug, instrument};

use crate::conditions::{self, render, UserState, UserStateStore};
use crate::error::Result;
use crate::flowchart::CompiledCorpus;
use crate::matching::{best_match, PatternMatcher};

/// The dialogue engine.
///
/// Shared between callers as `Arc<DialogueEngine>`; every method takes
/// `&self`.
#[derive(Debug)]
pub struct DialogueEngine {
    config: EngineConfig,
    store: CategoryStore,
    matcher: PatternMatcher,
    users: UserStateStore,
}

impl DialogueEngine {
    /// Create an engine over an already compiled corpus.
    pub fn new(config: EngineConfig, corpus: CompiledCorpus) -> Self {
        Self {
            config,
            store: CategoryStore::new(corpus),
            matcher: PatternMatcher::new(),
            users: UserStateStore::new(),
        }
    }

    /// Validate the config and load the corpus from `config.corpus_path`.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let corpus = CorpusLoader::load_dir(&config.corpus_path)?;
        Ok(Self::new(config, corpus))
    }

    /// Reload the corpus directory and swap it in atomically.
    ///
    /// Cached pattern regexes are dropped with the old corpus. On error the
    /// current corpus and cache stay in place.
    pub fn reload(&self) -> Result<()> {
        let corpus = CorpusLoader::load_dir(&self.config.corpus_path)?;
        self.store.replace_all(corpus);
        self.matcher.clear_cache();
        Ok(())
    }

    /// Drop cached pattern regexes, e.g. after many edits through
    /// [`DialogueEngine::categories`].
    pub fn clear_pattern_cache(&self) {
        self.matcher.clear_cache();
    }

    /// Answer one message from one user.
    #[instrument(skip(self, input), fields(input_len = input.len()))]
    pub fn process_input(&self, user_id: &str, input: &str) -> String {
        if input.len() > self.config.max_input_length {
            debug!(limit = self.config.max_input_length, "Input too long, using default response");
            return self.config.default_response.clone();
        }

        if let Some(response) = self.answer_conditional(user_id, input) {
            debug!(stage = "conditional", "Answered");
            return response;
        }
        if let Some(response) = self.answer_pattern(user_id, input) {
            debug!(stage = "pattern", "Answered");
            return response;
        }
        if let Some(response) = self.answer_similar(user_id, input) {
            debug!(stage = "similarity", "Answered");
            return response;
        }

        debug!(stage = "default", "No category matched");
        self.config.default_response.clone()
    }

    /// Resolve a conditional category for a user and render the result.
    ///
    /// Returns an empty string when no condition applies.
    pub fn resolve(&self, user_id: &str, category: &ConditionalCategory) -> String {
        let state = self.users.get_state(user_id);
        match conditions::resolve(&state, category) {
            Some(response) if !response.is_empty() => render(response, &state),
            _ => String::new(),
        }
    }

    fn answer_conditional(&self, user_id: &str, input: &str) -> Option<String> {
        self.store.read(|corpus| {
            corpus
                .conditional_categories
                .iter()
                .filter(|category| self.matcher.matches(input, &category.pattern))
                .find_map(|category| {
                    self.store_captures(user_id, input, &category.pattern);
                    let response = self.resolve(user_id, category);
                    (!response.is_empty()).then_some(response)
                })
        })
    }

    fn answer_pattern(&self, user_id: &str, input: &str) -> Option<String> {
        self.store.read(|corpus| {
            let category = corpus
                .categories
                .iter()
                .find(|category| self.matcher.matches(input, &category.pattern))?;

            self.store_captures(user_id, input, &category.pattern);
            let template = category.pick_template(self.config.response_selection)?;
            Some(render(template, &self.users.get_state(user_id)))
        })
    }

    fn answer_similar(&self, user_id: &str, input: &str) -> Option<String> {
        self.store.read(|corpus| {
            let category = best_match(input, &corpus.categories, self.config.match_threshold)?;
            let template = category.pick_template(self.config.response_selection)?;
            Some(render(template, &self.users.get_state(user_id)))
        })
    }

    fn store_captures(&self, user_id: &str, input: &str, pattern: &str) {
        let captures = self.matcher.extract(input, pattern);
        debug!(captures = captures.len(), "Storing wildcard captures");
        self.users.set_variables(user_id, &captures);
    }

    /// The category store, for corpus edits.
    pub fn categories(&self) -> &CategoryStore {
        &self.store
    }

    /// The per-user state store.
    pub fn users(&self) -> &UserStateStore {
        &self.users
    }

    /// Snapshot of one user's state.
    pub fn user_state(&self, user_id: &str) -> UserState {
        self.users.get_state(user_id)
    }

    /// Number of plain categories.
    pub fn categories_len(&self) -> usize {
        self.store.len()
    }

    /// Number of conditional categories.
    pub fn conditional_len(&self) -> usize {
        self.store.conditional_len()
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
