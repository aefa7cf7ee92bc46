//! Recursive descent parsing
//!
//! - [`recognizer`]: a hand-written recognizer for a small textbook grammar,
//!   one method per nonterminal and a single character of lookahead
//!
//! No external parser generator dependencies.

pub mod recognizer;

pub use recognizer::{recognize, RecognizeError, Recognizer};
