//! Corpus loader - reads every flowchart file of a directory.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::flowchart::{compile, parse_corpus, CompiledCorpus};

/// File extensions recognised as flowchart corpora.
pub const CORPUS_EXTENSIONS: &[&str] = &["mmd", "mermaid"];

/// Loads and compiles corpus files.
pub struct CorpusLoader;

impl CorpusLoader {
    /// Load every corpus file in `dir`, in file name order.
    ///
    /// Unreadable files and files without nodes are skipped with a warning.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<CompiledCorpus> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::CorpusNotFound(dir.to_path_buf()));
        }

        let mut corpus = CompiledCorpus::new();
        let files = Self::corpus_files(dir)?;
        let file_count = files.len();

        for path in files {
            match Self::load_file(&path) {
                Ok(compiled) => corpus.extend(compiled),
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping corpus file"),
            }
        }

        info!(
            dir = %dir.display(),
            files = file_count,
            categories = corpus.categories.len(),
            conditional = corpus.conditional_categories.len(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Load a single corpus file, stamping its file name on every category.
    pub fn load_file(path: impl AsRef<Path>) -> Result<CompiledCorpus> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let graph = parse_corpus(&source_name, &content)?;
        Ok(compile(&graph, &source_name))
    }

    fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let io_error = |source: std::io::Error| Error::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.is_file() && is_corpus_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

fn is_corpus_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CORPUS_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_dir_merges_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b_farewell.mmd", "flowchart TD\nA[bye] --> B[see you]");
        write(&dir, "a_greeting.MMD", "flowchart TD\nA[hello] --> B[hi]");
        write(&dir, "notes.txt", "flowchart TD\nA[ignored] --> B[ignored]");

        let corpus = CorpusLoader::load_dir(dir.path()).unwrap();
        let patterns: Vec<_> = corpus.categories.iter().map(|c| c.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["hello", "bye"]);
        assert_eq!(corpus.categories[0].source_file, "a_greeting.MMD");
        assert_eq!(corpus.categories[1].source_file, "b_farewell.mmd");
    }

    #[test]
    fn test_empty_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.mermaid", "flowchart TD\n%% nothing here\n");
        write(&dir, "ok.mermaid", "flowchart TD\nA[ping] --> B[pong]");

        let corpus = CorpusLoader::load_dir(dir.path()).unwrap();
        assert_eq!(corpus.categories.len(), 1);
    }

    #[test]
    fn test_load_file_reports_empty_corpus() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.mmd", "");

        let result = CorpusLoader::load_file(dir.path().join("empty.mmd"));
        assert!(matches!(result, Err(Error::EmptyCorpus { .. })));
    }

    #[test]
    fn test_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            CorpusLoader::load_dir(&missing),
            Err(Error::CorpusNotFound(path)) if path == missing
        ));
    }
}
