//! # Dialogue Core
//!
//! The rule-based dialogue engine. It parses flowchart corpora into dialogue
//! categories, matches user input against their patterns, and resolves
//! conditional responses against per-user state.
//!
//! ## Core Components
//!
//! - **flowchart**: Graph builder, corpus compiler, and flowchart writer
//! - **matching**: Wildcard pattern matcher and similarity fallback
//! - **conditions**: User state store, condition evaluator, and template renderer
//! - **engine**: Category store, corpus loader, and the `process_input` entry point
//!
//! ## Lookup Order
//!
//! For every message the engine tries conditional categories first, then
//! exact / wildcard / word-sequence matches, then the similarity fallback,
//! and finally the configured default response.

pub mod conditions;
pub mod engine;
pub mod error;
pub mod flowchart;
pub mod matching;

pub use conditions::*;
pub use engine::*;
pub use error::{Error, Result};
pub use flowchart::*;
pub use matching::*;
