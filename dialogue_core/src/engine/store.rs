//! Category store - the shared corpus behind a reader-writer lock.

use corpus_model::{Category, ConditionalCategory};
use parking_lot::RwLock;
use tracing::debug;

use crate::flowchart::CompiledCorpus;

/// Owns the compiled corpus and serialises edits against concurrent lookups.
///
/// Lookups take the shared lock for their whole pass over the corpus. Every
/// edit takes the exclusive lock, so readers see a corpus either before or
/// after an edit, never halfway through it.
#[derive(Debug, Default)]
pub struct CategoryStore {
    corpus: RwLock<CompiledCorpus>,
}

impl CategoryStore {
    /// Create a store owning the given corpus.
    pub fn new(corpus: CompiledCorpus) -> Self {
        Self {
            corpus: RwLock::new(corpus),
        }
    }

    /// Copy of the plain categories in corpus order.
    pub fn list_categories(&self) -> Vec<Category> {
        self.corpus.read().categories.clone()
    }

    /// Copy of the conditional categories in corpus order.
    pub fn list_conditional_categories(&self) -> Vec<ConditionalCategory> {
        self.corpus.read().conditional_categories.clone()
    }

    /// Append a plain category.
    pub fn add_category(&self, category: Category) {
        let mut corpus = self.corpus.write();
        debug!(index = corpus.categories.len(), pattern = %category.pattern, "Adding category");
        corpus.categories.push(category);
    }

    /// Replace the category at `index`. Returns `false` if out of bounds.
    pub fn replace_category(&self, index: usize, category: Category) -> bool {
        let mut corpus = self.corpus.write();
        match corpus.categories.get_mut(index) {
            Some(slot) => {
                debug!(index, pattern = %category.pattern, "Replacing category");
                *slot = category;
                true
            }
            None => false,
        }
    }

    /// Remove the category at `index`. Returns `None` if out of bounds.
    pub fn remove_category(&self, index: usize) -> Option<Category> {
        let mut corpus = self.corpus.write();
        if index >= corpus.categories.len() {
            return None;
        }
        debug!(index, "Removing category");
        Some(corpus.categories.remove(index))
    }

    /// Append a conditional category.
    pub fn add_conditional_category(&self, category: ConditionalCategory) {
        self.corpus.write().conditional_categories.push(category);
    }

    /// Swap in a whole new corpus, returning the old one.
    pub fn replace_all(&self, corpus: CompiledCorpus) -> CompiledCorpus {
        std::mem::replace(&mut *self.corpus.write(), corpus)
    }

    /// Number of plain categories.
    pub fn len(&self) -> usize {
        self.corpus.read().categories.len()
    }

    /// Number of conditional categories.
    pub fn conditional_len(&self) -> usize {
        self.corpus.read().conditional_categories.len()
    }

    /// Check if the store holds no categories of either kind.
    pub fn is_empty(&self) -> bool {
        self.corpus.read().is_empty()
    }

    /// Run a lookup under the shared lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&CompiledCorpus) -> R) -> R {
        f(&self.corpus.read())
    }
}
