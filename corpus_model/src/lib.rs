//! # Corpus Model
//!
//! The data side of the dialogue engine - categories, conditional categories,
//! and the engine configuration. This crate is the single source of truth for
//! what a corpus *is* and does not contain any matching logic.

pub mod categories;
pub mod config;

pub use categories::*;
pub use config::*;
