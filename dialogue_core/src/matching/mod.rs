//! Input matching.
//!
//! - **pattern**: wildcard / word-sequence matching and capture extraction
//! - **similarity**: edit-distance fallback when no pattern matches

mod pattern;
mod similarity;

pub use pattern::*;
pub use similarity::*;

use std::collections::HashMap;

/// Wildcard captures keyed `star`, `star1`, `star2`, ...
pub type Captures = HashMap<String, String>;

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  hello \t  world\n"), "hello world");
        assert_eq!(normalize_whitespace("   "), "");
    }
}
