//! Limits and defaults
//!
//! Configuration is in-code only. Each component takes its own section:
//! [`MemoryConfig`] for the storage model and its trace, [`InterpreterConfig`]
//! for the statement interpreter.

/// Storage model limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Upper bound on live heap bytes
    pub max_heap_size: usize,
    /// Upper bound on the estimated size of recorded snapshots
    pub snapshot_memory_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            max_heap_size: 10 * 1024 * 1024,          // 10 MB
            snapshot_memory_limit: 100 * 1024 * 1024, // 100 MB
        }
    }
}

/// AST interpreter limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Iterations a single loop may run before execution is aborted
    pub max_loop_iterations: usize,
    /// Record the symbol table after every assignment
    pub record_history: bool,
    /// Upper bound on the estimated size of the recorded history
    pub history_memory_limit: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_loop_iterations: 1_000_000,
            record_history: false,
            history_memory_limit: 16 * 1024 * 1024,
        }
    }
}

impl InterpreterConfig {
    pub fn with_history(mut self) -> Self {
        self.record_history = true;
        self
    }

    pub fn with_max_loop_iterations(mut self, max: usize) -> Self {
        self.max_loop_iterations = max;
        self
    }
}
