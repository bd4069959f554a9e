//! Low-level primitives
//!
//! Grammar detection, tokenizing and styled lines.

pub mod highlighter;
