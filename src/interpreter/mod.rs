//! Statement language interpreter
//!
//! This module provides a tree-walking interpreter for a tiny imperative
//! language:
//! - [`ast`]: expression and statement nodes plus builder functions
//! - [`engine`]: the [`Interpreter`](engine::Interpreter) and its symbol table
//! - [`errors`]: runtime error types
//! - [`programs`]: reference programs (factorial, textbook example)
//!
//! # Execution Model
//!
//! Statements run in order against a single flat symbol table. Conditions
//! treat any non-zero value as true. Arithmetic is checked, and every loop is
//! bounded by [`InterpreterConfig::max_loop_iterations`](crate::config::InterpreterConfig).

pub mod ast;
pub mod engine;
pub mod errors;
pub mod programs;

pub use engine::Interpreter;
pub use errors::RuntimeError;
