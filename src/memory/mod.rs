//! Virtual storage model
//!
//! This module provides one region per storage duration:
//! - [`globals`]: process-lifetime slots, defined once before any frame runs
//! - [`stack`]: call stack with frames and automatically reclaimed locals
//! - [`heap`]: explicit allocation with malloc/free and tombstone tracking
//! - [`value`]: the tagged `int` / uninitialized cell stored in every region
//!
//! # Address Layout
//!
//! ```text
//! 0x0000_0004 ..  stack slots (grow upward)
//! 0x0000_1000 ..  globals
//! 0x1000_0000 ..  heap blocks
//! ```
//!
//! [`Memory::read_int`] and [`Memory::write_int`] route an address to
//! the region that owns it, so a stale stack address, a freed heap block and an
//! unwritten cell all surface as distinct [`MemoryError`]s.

pub mod constants;
pub mod errors;
pub mod globals;
pub mod heap;
pub mod stack;
pub mod value;

use crate::config::MemoryConfig;
use constants::{GLOBAL_ADDRESS_START, HEAP_ADDRESS_START, INT_SIZE};
use errors::MemoryError;
use globals::Globals;
use heap::Heap;
use stack::Stack;
use value::{Address, Value};

/// Region an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Stack,
    Global,
    Heap,
}

impl Region {
    pub fn of(address: Address) -> Self {
        if address >= HEAP_ADDRESS_START {
            Region::Heap
        } else if address >= GLOBAL_ADDRESS_START {
            Region::Global
        } else {
            Region::Stack
        }
    }
}

/// All three storage regions together
#[derive(Debug, Clone, Default)]
pub struct Memory {
    pub globals: Globals,
    pub stack: Stack,
    pub heap: Heap,
}

impl Memory {
    pub fn new(config: &MemoryConfig) -> Self {
        Memory {
            globals: Globals::new(),
            stack: Stack::new(),
            heap: Heap::new(config.max_heap_size),
        }
    }

    /// Read the `int` stored at `address`, whichever region owns it
    pub fn read_int(&self, address: Address) -> Result<i32, MemoryError> {
        match Region::of(address) {
            Region::Stack => self
                .stack
                .at(address)
                .ok_or(MemoryError::InvalidAddress { address })?
                .value
                .expect_int(address),
            Region::Global => self
                .globals
                .at(address)
                .ok_or(MemoryError::InvalidAddress { address })?
                .value
                .expect_int(address),
            Region::Heap => {
                let bytes = self.heap.read_bytes_at(address, INT_SIZE)?;
                let mut raw = [0u8; INT_SIZE];
                raw.copy_from_slice(&bytes);
                Value::int_from_bytes(raw).expect_int(address)
            }
        }
    }

    /// Write an `int` to `address`, whichever region owns it
    pub fn write_int(&mut self, address: Address, n: i32) -> Result<(), MemoryError> {
        match Region::of(address) {
            Region::Stack => {
                self.stack
                    .at_mut(address)
                    .ok_or(MemoryError::InvalidAddress { address })?
                    .value = Value::Int(n);
                Ok(())
            }
            Region::Global => {
                self.globals
                    .at_mut(address)
                    .ok_or(MemoryError::InvalidAddress { address })?
                    .value = Value::Int(n);
                Ok(())
            }
            Region::Heap => self.heap.write_bytes_at(address, &Value::int_to_bytes(n)),
        }
    }
}
