// Output capture and bounded snapshot history

use crate::memory::constants::INT_SIZE;
use crate::memory::Memory;
use std::io;
use thiserror::Error;

/// Mock console for capturing demo output
#[derive(Debug, Clone, Default)]
pub struct Console {
    text: String,
}

impl Console {
    pub fn new() -> Self {
        Console::default()
    }

    /// Print without newline
    pub fn print(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Everything printed so far, verbatim
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Get all lines as a vector of strings
    pub fn lines(&self) -> Vec<String> {
        // A trailing newline does not start a new line
        self.text.lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl io::Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = std::str::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.print(text);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Snapshot history errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Snapshot memory limit exceeded: {current} + {requested} > {limit}")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },
}

/// Rough size accounting for anything kept in a [`SnapshotManager`]
pub trait EstimatedSize {
    fn estimated_size(&self) -> usize;
}

/// Storage state captured after one step of a trace
#[derive(Debug, Clone)]
pub struct MemorySnapshot {
    pub label: String,
    pub memory: Memory,
}

impl EstimatedSize for MemorySnapshot {
    fn estimated_size(&self) -> usize {
        // Each frame costs its name plus one slot per local
        let stack_size: usize = self
            .memory
            .stack
            .frames()
            .iter()
            .map(|frame| frame.function_name.len() + frame.locals.len() * INT_SIZE)
            .sum();

        // Heap: every block is kept, tombstones included
        let heap_size = self.memory.heap.total_allocated();

        // Globals: name plus slot
        let globals_size = self.memory.globals.len() * 32;

        stack_size + heap_size + globals_size + self.label.len()
    }
}

/// Bounded execution history
#[derive(Debug)]
pub struct SnapshotManager<S> {
    snapshots: Vec<S>,
    max_memory: usize,
    current_memory: usize,
}

impl<S: EstimatedSize> SnapshotManager<S> {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: S) -> Result<(), SnapshotError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(SnapshotError::LimitExceeded {
                current: self.current_memory,
                requested: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&S> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&S> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.snapshots.iter()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn into_vec(self) -> Vec<S> {
        self.snapshots
    }
}
