//! Category definitions for the dialogue corpus.
//!
//! - **Category**: a trigger pattern with one or more response templates
//! - **ConditionalCategory**: a trigger pattern whose response depends on per-user state

mod category;
mod condition;

pub use category::*;
pub use condition::*;
