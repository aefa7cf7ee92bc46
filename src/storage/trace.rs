//! Step-by-step replay of the storage demo on the virtual memory model.
//!
//! Each step records a [`MemorySnapshot`], so a test can look at the model
//! between any two steps: `bar` only exists while the `demo` frame is live,
//! `baz` stays uninitialised, and after the return the heap holds nothing
//! but a tombstone.

use crate::config::MemoryConfig;
use crate::memory::constants::INT_SIZE;
use crate::memory::errors::MemoryError;
use crate::memory::value::{Address, Value};
use crate::memory::Memory;
use crate::snapshot::{MemorySnapshot, SnapshotError, SnapshotManager};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error(transparent)]
    Memory(#[from] MemoryError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Points at which the replay records a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ProgramStart,
    EnterMain,
    EnterDemo,
    DeclareBar,
    AllocateBaz,
    ReturnFromDemo,
    ExitMain,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Step::ProgramStart,
        Step::EnterMain,
        Step::EnterDemo,
        Step::DeclareBar,
        Step::AllocateBaz,
        Step::ReturnFromDemo,
        Step::ExitMain,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Step::ProgramStart => "program start",
            Step::EnterMain => "enter main",
            Step::EnterDemo => "call demo",
            Step::DeclareBar => "declare bar",
            Step::AllocateBaz => "malloc baz",
            Step::ReturnFromDemo => "return from demo",
            Step::ExitMain => "exit main",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A heap block still allocated when the program ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leak {
    pub address: Address,
    pub size: usize,
}

/// Result of replaying the demo
#[derive(Debug)]
pub struct StorageTrace {
    snapshots: Vec<MemorySnapshot>,
    memory: Memory,
    global_address: Address,
    bar_address: Address,
    baz_address: Address,
}

impl StorageTrace {
    /// Snapshots in step order
    pub fn snapshots(&self) -> &[MemorySnapshot] {
        &self.snapshots
    }

    /// Memory as it was right after `step`
    pub fn at(&self, step: Step) -> Option<&Memory> {
        self.snapshots
            .iter()
            .find(|s| s.label == step.label())
            .map(|s| &s.memory)
    }

    /// Memory after the program ended
    pub fn final_memory(&self) -> &Memory {
        &self.memory
    }

    pub fn final_memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn global_address(&self) -> Address {
        self.global_address
    }

    pub fn bar_address(&self) -> Address {
        self.bar_address
    }

    pub fn baz_address(&self) -> Address {
        self.baz_address
    }

    /// Heap blocks nobody released
    pub fn leak_check(&self) -> Vec<Leak> {
        self.memory
            .heap
            .live_blocks()
            .into_iter()
            .map(|(address, size)| Leak { address, size })
            .collect()
    }
}

/// Replay the demo with `baz` released by its owner on return
pub fn trace_demo(config: &MemoryConfig) -> Result<StorageTrace, TraceError> {
    replay(config, true)
}

/// Replay the literal translation that never releases `baz`
pub fn trace_leaky_demo(config: &MemoryConfig) -> Result<StorageTrace, TraceError> {
    replay(config, false)
}

struct Recorder {
    memory: Memory,
    history: SnapshotManager<MemorySnapshot>,
}

impl Recorder {
    fn record(&mut self, step: Step) -> Result<(), TraceError> {
        debug!(
            step = step.label(),
            frames = self.memory.stack.depth(),
            live_bytes = self.memory.heap.live_bytes(),
            "storage step"
        );
        self.history.push(MemorySnapshot {
            label: step.label().to_string(),
            memory: self.memory.clone(),
        })?;
        Ok(())
    }
}

fn replay(config: &MemoryConfig, release_baz: bool) -> Result<StorageTrace, TraceError> {
    let mut rec = Recorder {
        memory: Memory::new(config),
        history: SnapshotManager::new(config.snapshot_memory_limit),
    };

    // Globals exist before the first frame
    let global_address = rec.memory.globals.define("global", Value::Int(42))?;
    rec.record(Step::ProgramStart)?;

    rec.memory.stack.push_frame("main");
    rec.record(Step::EnterMain)?;

    rec.memory.stack.push_frame("demo");
    rec.record(Step::EnterDemo)?;

    let bar_address = rec.memory.stack.declare_var("bar", Value::Int(42))?;
    rec.record(Step::DeclareBar)?;

    let baz_address = rec.memory.heap.allocate(INT_SIZE)?;
    rec.memory
        .stack
        .declare_var("baz", Value::Pointer(baz_address))?;
    rec.record(Step::AllocateBaz)?;

    // The owner of `baz` is dropped as the frame unwinds
    if release_baz {
        rec.memory.heap.free(baz_address)?;
    }
    rec.memory.stack.pop_frame().ok_or(MemoryError::NoStackFrame)?;
    rec.record(Step::ReturnFromDemo)?;

    rec.memory.stack.pop_frame().ok_or(MemoryError::NoStackFrame)?;
    rec.record(Step::ExitMain)?;

    let trace = StorageTrace {
        snapshots: rec.history.into_vec(),
        memory: rec.memory,
        global_address,
        bar_address,
        baz_address,
    };

    for leak in trace.leak_check() {
        warn!(address = leak.address, size = leak.size, "heap block leaked");
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_recorded_in_order() {
        let trace = trace_demo(&MemoryConfig::default()).unwrap();
        let labels: Vec<&str> = trace.snapshots().iter().map(|s| s.label.as_str()).collect();
        let expected: Vec<&str> = Step::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_snapshot_limit_aborts_trace() {
        let config = MemoryConfig {
            snapshot_memory_limit: 64,
            ..MemoryConfig::default()
        };
        assert!(matches!(
            trace_demo(&config),
            Err(TraceError::Snapshot(SnapshotError::LimitExceeded { .. }))
        ));
    }

    #[test]
    fn test_heap_too_small_for_baz() {
        let config = MemoryConfig {
            max_heap_size: 2,
            ..MemoryConfig::default()
        };
        assert!(matches!(
            trace_demo(&config),
            Err(TraceError::Memory(MemoryError::OutOfMemory { requested: 4, .. }))
        ));
    }
}
