//! Template rendering.
//!
//! Supported tags, applied in order:
//! 1. `<get name="x"/>` - the user's predicate `x`
//! 2. `<star/>` (or `<star />`) - the user's `star` variable
//!
//! Unset values render as empty text. Any other markup is left as is.

use regex::{Captures, NoExpand, Regex};
use std::sync::LazyLock;

use super::UserState;
use crate::matching::STAR_KEY;

static GET_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<get\s+name\s*=\s*"([^"]*)"\s*/>"#).expect("valid get tag regex")
});

static STAR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<star\s*/>").expect("valid star tag regex"));

/// Replace control tags in a response with the user's values.
pub fn render(template: &str, state: &UserState) -> String {
    let rendered = GET_TAG.replace_all(template, |caps: &Captures| {
        state.predicate(&caps[1]).unwrap_or_default().to_string()
    });

    let star = state.variable(STAR_KEY).unwrap_or_default();
    STAR_TAG.replace_all(&rendered, NoExpand(star)).into_owned()
}
