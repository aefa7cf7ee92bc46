//! Runtime value representation
//!
//! The storage model holds `int` cells and pointers to them. A slot that was
//! declared but never written holds [`Value::Uninitialized`], which is what
//! lets the model refuse reads of memory nobody wrote.

use super::constants::INT_SIZE;
use super::errors::MemoryError;

/// Memory address type (64-bit)
pub type Address = u64;

/// Runtime values in the storage model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    Int(i32),
    Pointer(Address),
    #[default]
    Uninitialized, // Special marker for uninitialized memory
}

impl Value {
    /// Check if this value is initialized
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized)
    }

    /// Get the integer value, returns None if uninitialized
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the pointer value, returns None if not a Pointer
    pub fn as_pointer(&self) -> Option<Address> {
        match self {
            Value::Pointer(addr) => Some(*addr),
            _ => None,
        }
    }

    /// Read the integer stored at `address`, failing if it was never written
    pub fn expect_int(&self, address: Address) -> Result<i32, MemoryError> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Uninitialized => Err(MemoryError::UninitializedRead { address }),
            Value::Pointer(_) => Err(MemoryError::TypeMismatch {
                expected: "int",
                address,
            }),
        }
    }

    /// Encode an int as little-endian heap bytes
    pub fn int_to_bytes(n: i32) -> [u8; INT_SIZE] {
        n.to_le_bytes()
    }

    /// Decode little-endian heap bytes into an int
    pub fn int_from_bytes(bytes: [u8; INT_SIZE]) -> Value {
        Value::Int(i32::from_le_bytes(bytes))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}
