//! Errors raised by the virtual storage model.

use super::value::Address;
use thiserror::Error;

/// Failures of a storage operation.
///
/// Every variant corresponds to a storage-duration defect the model detects
/// instead of silently permitting: touching a released block, releasing twice,
/// reading memory nobody wrote, or naming a local whose frame is gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} bytes, {allocated} already allocated, limit is {limit}")]
    OutOfMemory {
        requested: usize,
        allocated: usize,
        limit: usize,
    },

    #[error("Invalid allocation size: {size} (must be positive)")]
    InvalidSize { size: usize },

    #[error("Double free detected at address 0x{address:x}")]
    DoubleFree { address: Address },

    #[error("Invalid free: address 0x{address:x} was never allocated")]
    InvalidFree { address: Address },

    #[error("Use-after-free: address 0x{address:x} has been freed")]
    UseAfterFree { address: Address },

    #[error("Invalid pointer: address 0x{address:x} not in any live allocation")]
    InvalidAddress { address: Address },

    #[error("Uninitialized read at address 0x{address:x}")]
    UninitializedRead { address: Address },

    #[error("Type mismatch at address 0x{address:x}: expected {expected}")]
    TypeMismatch {
        expected: &'static str,
        address: Address,
    },

    #[error("Buffer overrun: {len} bytes at offset {offset} in block of size {size}")]
    BufferOverrun {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("Global '{name}' is already defined")]
    DuplicateGlobal { name: String },

    #[error("No stack frame available")]
    NoStackFrame,

    #[error("Stack overflow: no slot left below 0x{limit:x}")]
    StackOverflow { limit: Address },
}
