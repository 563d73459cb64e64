//! Wildcard pattern matcher.
//!
//! Patterns are whitespace-separated tokens. A token of exactly `*` or `_`
//! spans one or more words; everything else is literal. Patterns without
//! wildcards match when their words appear contiguously in the input.

use std::collections::HashMap;

use parking_lot::RwLock;
use regex::Regex;
use tracing::{trace, warn};

use super::{normalize_whitespace, Captures};

/// Token matching one or more words, capturing them.
pub const STAR: &str = "*";

/// Token matching one or more words without capturing.
pub const UNDERSCORE: &str = "_";

/// Key under which the first capture is duplicated.
pub const STAR_KEY: &str = "star";

/// How letter case is treated while matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseFolding {
    /// Lower-case input and pattern before comparing.
    #[default]
    Insensitive,
    /// Keep the input as written and compare with a case-insensitive regex.
    Preserve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RegexKind {
    Match(CaseFolding),
    Extract,
}

/// Matches user input against category patterns.
///
/// Wildcard regexes are compiled once per pattern and cached. The cache is
/// shared by all readers, so one matcher serves every concurrent request.
/// Entries are never evicted individually: the cache grows with every
/// distinct pattern seen, including patterns later edited out of the corpus,
/// until [`PatternMatcher::clear_cache`] is called.
#[derive(Debug, Default)]
pub struct PatternMatcher {
    cache: RwLock<HashMap<(String, RegexKind), Option<Regex>>>,
}

impl PatternMatcher {
    /// Create a matcher with an empty regex cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive match used for dialogue lookup.
    pub fn matches(&self, input: &str, pattern: &str) -> bool {
        self.matches_with(input, pattern, CaseFolding::Insensitive)
    }

    /// Match with an explicit case-folding policy.
    pub fn matches_with(&self, input: &str, pattern: &str, folding: CaseFolding) -> bool {
        let mut input = normalize_whitespace(input);
        let mut pattern = normalize_whitespace(pattern);
        if folding == CaseFolding::Insensitive {
            input = input.to_lowercase();
            pattern = pattern.to_lowercase();
        }

        if pattern.is_empty() {
            return input.is_empty();
        }

        if has_wildcard(&pattern) {
            return self
                .regex(&pattern, RegexKind::Match(folding))
                .is_some_and(|re| re.is_match(&input));
        }

        input == pattern || contains_word_sequence(&input, &pattern)
    }

    /// Extract wildcard captures, keeping the input's casing.
    ///
    /// Returns an empty map when the pattern has no `*` tokens or the input
    /// does not match.
    pub fn extract(&self, input: &str, pattern: &str) -> Captures {
        let input = normalize_whitespace(input);
        let pattern = normalize_whitespace(pattern);

        let mut captures = Captures::new();
        let Some(re) = self.regex(&pattern, RegexKind::Extract) else {
            return captures;
        };
        let Some(caps) = re.captures(&input) else {
            return captures;
        };

        for (index, group) in caps.iter().skip(1).enumerate() {
            if let Some(group) = group {
                captures.insert(format!("{}{}", STAR_KEY, index + 1), group.as_str().to_string());
            }
        }
        if let Some(first) = captures.get("star1").cloned() {
            captures.insert(STAR_KEY.to_string(), first);
        }

        trace!(captures = captures.len(), "Extracted wildcard captures");
        captures
    }

    /// Drop every cached regex.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Number of cached regexes, failed compilations included.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    fn regex(&self, pattern: &str, kind: RegexKind) -> Option<Regex> {
        let key = (pattern.to_string(), kind);
        if let Some(cached) = self.cache.read().get(&key) {
            return cached.clone();
        }

        let source = build_regex_source(pattern, kind);
        trace!(pattern, regex = %source, "Compiling pattern regex");
        let compiled = match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(pattern, error = %err, "Pattern regex failed to compile, treating as no match");
                None
            }
        };

        self.cache.write().entry(key).or_insert(compiled).clone()
    }
}

fn has_wildcard(pattern: &str) -> bool {
    pattern
        .split(' ')
        .any(|token| token == STAR || token == UNDERSCORE)
}

fn contains_word_sequence(input: &str, pattern: &str) -> bool {
    let input_words: Vec<&str> = input.split(' ').collect();
    let pattern_words: Vec<&str> = pattern.split(' ').collect();

    if pattern_words.len() > input_words.len() {
        return false;
    }
    input_words
        .windows(pattern_words.len())
        .any(|window| {
            window
                .iter()
                .zip(&pattern_words)
                .all(|(a, b)| a.to_lowercase() == b.to_lowercase())
        })
}

fn build_regex_source(pattern: &str, kind: RegexKind) -> String {
    let body = pattern
        .split(' ')
        .map(|token| match (token, kind) {
            (STAR | UNDERSCORE, RegexKind::Match(_)) => r"\S+(?:\s+\S+)*".to_string(),
            (STAR, RegexKind::Extract) => "(.+)".to_string(),
            (UNDERSCORE, RegexKind::Extract) => "(?:.+)".to_string(),
            (literal, _) => regex::escape(literal),
        })
        .collect::<Vec<_>>()
        .join(r"\s+");

    match kind {
        RegexKind::Match(CaseFolding::Insensitive) => format!("^{}$", body),
        RegexKind::Match(CaseFolding::Preserve) | RegexKind::Extract => format!("(?i)^{}$", body),
    }
}
