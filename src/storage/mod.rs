//! Storage duration demo
//!
//! [`demo`] touches one value of each storage duration:
//!
//! | name     | duration  | lifetime                                  |
//! |----------|-----------|-------------------------------------------|
//! | `GLOBAL` | static    | whole process, const-initialised to 42    |
//! | `bar`    | automatic | the call to [`demo`]                      |
//! | `baz`    | dynamic   | its [`HeapCell`] owner, released on drop  |
//!
//! The heap cell is never written, so its contents stay indeterminate, and it
//! is released exactly once when `demo` returns (on any exit path).
//!
//! [`trace`] replays the same sequence against the virtual
//! [`Memory`](crate::memory::Memory) so those lifetimes can be inspected.

pub mod trace;

use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::{debug, trace};

pub use trace::{trace_demo, trace_leaky_demo, StorageTrace, TraceError};

/// Process-wide value, initialised before `main` runs
pub static GLOBAL: AtomicI32 = AtomicI32::new(42);

/// Current value of [`GLOBAL`]
pub fn global() -> i32 {
    GLOBAL.load(Ordering::Relaxed)
}

pub fn set_global(value: i32) {
    GLOBAL.store(value, Ordering::Relaxed);
}

/// Scoped owner of a single heap-allocated `i32`.
///
/// The cell starts uninitialised; [`HeapCell::get`] returns `None` until
/// [`HeapCell::write`] has been called. Dropping the owner frees the cell.
#[derive(Debug)]
pub struct HeapCell {
    slot: Box<MaybeUninit<i32>>,
    initialized: bool,
}

impl HeapCell {
    /// Allocate one `i32` without initialising it
    pub fn new_uninit() -> Self {
        trace!("allocating heap cell");
        HeapCell {
            slot: Box::new(MaybeUninit::uninit()),
            initialized: false,
        }
    }

    pub fn write(&mut self, value: i32) {
        self.slot.as_mut().write(value);
        self.initialized = true;
    }

    pub fn get(&self) -> Option<i32> {
        if self.initialized {
            // SAFETY: `initialized` is only set by `write`, which stored a value.
            Some(unsafe { self.slot.assume_init_read() })
        } else {
            None
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Heap address of the cell, for display only
    pub fn address(&self) -> *const i32 {
        self.slot.as_ptr()
    }
}

impl Drop for HeapCell {
    fn drop(&mut self) {
        trace!(address = ?self.address(), "releasing heap cell");
    }
}

/// One pass over the three storage durations. Produces no output.
pub fn demo() {
    // static storage
    let global = global();

    // automatic storage, reclaimed on return
    let bar = 42;

    // dynamic storage, reclaimed when `baz` goes out of scope
    let baz = HeapCell::new_uninit();

    debug!(
        global,
        bar,
        baz_initialized = baz.is_initialized(),
        "storage demo"
    );
}
