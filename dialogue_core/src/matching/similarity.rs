//! Fallback similarity matcher.
//!
//! Scores how close an input is to a pattern on a 0-100 scale:
//! identical strings score 100, a substring in either direction scores 80,
//! anything else is scored from the Levenshtein distance over code points.

use corpus_model::Category;
use tracing::debug;

use super::normalize_whitespace;

/// Score for identical strings.
pub const EXACT_SCORE: u32 = 100;

/// Score when one string contains the other.
pub const SUBSTRING_SCORE: u32 = 80;

/// Similarity of two strings, case-insensitive, in `0..=100`.
///
/// When exactly one side is empty the score is 0, not [`SUBSTRING_SCORE`],
/// even though the empty string is a substring of every string.
pub fn similarity(a: &str, b: &str) -> u32 {
    let a = normalize_whitespace(a).to_lowercase();
    let b = normalize_whitespace(b).to_lowercase();

    if a == b {
        return EXACT_SCORE;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    if a.contains(&b) || b.contains(&a) {
        return SUBSTRING_SCORE;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let distance = edit_distance(&a, &b) as f64;
    let longest = a.len().max(b.len()) as f64;

    ((1.0 - distance / longest) * 100.0).round() as u32
}

/// Levenshtein distance counted in Unicode code points.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    edit_distance(&a, &b)
}

fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// The most similar category scoring at least `threshold`.
///
/// Ties keep the category that comes first.
pub fn best_match<'a>(input: &str, categories: &'a [Category], threshold: u32) -> Option<&'a Category> {
    let mut best: Option<(u32, &Category)> = None;

    for category in categories {
        let score = similarity(input, &category.pattern);
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, category));
        }
    }

    match best {
        Some((score, category)) if score >= threshold => {
            debug!(score, pattern = %category.pattern, "Similarity fallback matched");
            Some(category)
        }
        Some((score, _)) => {
            debug!(score, threshold, "Best similarity below threshold");
            None
        }
        None => None,
    }
}
