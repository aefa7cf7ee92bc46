//! Runtime error types for the statement interpreter
//!
//! All runtime errors are fatal: they halt execution, leaving the symbol
//! table as it was after the last completed assignment.

use super::ast::BinOp;
use crate::snapshot::SnapshotError;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Checked arithmetic overflowed
    #[error("Integer overflow in operation: {left} {sym} {right}", sym = .op.symbol())]
    IntegerOverflow { op: BinOp, left: i32, right: i32 },

    /// Division by zero
    #[error("Division by zero: {left} / 0")]
    DivisionByZero { left: i32 },

    /// A loop ran past the configured iteration limit
    #[error("Loop exceeded {limit} iterations")]
    LoopLimitExceeded { limit: usize },

    /// Recording the symbol table history failed
    #[error("History operation failed: {0}")]
    History(#[from] SnapshotError),
}
