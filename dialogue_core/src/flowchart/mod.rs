//! Flowchart corpus handling.
//!
//! A corpus is written as a restricted flowchart:
//! - **Nodes**: `id[text]` pattern/response nodes and `id{Condition: type name}` condition nodes
//! - **Edges**: `A --> B` or `A -->|label| B`, optionally with inline node definitions
//!
//! The parser turns the text into a [`Graph`], the compiler turns the graph
//! into categories, and the writer turns categories back into text.

mod compiler;
mod graph;
mod parser;
mod writer;

pub use compiler::*;
pub use graph::*;
pub use parser::*;
pub use writer::*;
