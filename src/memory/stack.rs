//! Call stack implementation
//!
//! This module provides automatic storage for the model:
//! - [`Stack`]: The call stack containing frames
//! - [`StackFrame`]: A single function's activation record
//! - [`LocalVar`]: A local variable with its slot address
//!
//! # Slot Reclamation
//!
//! Every local gets a 4-byte slot above the previous one. Popping a frame
//! rewinds the next free slot to where that frame began, so a later call
//! reuses the same addresses and nothing of the old frame stays reachable.

use super::constants::{GLOBAL_ADDRESS_START, INT_SIZE, STACK_ADDRESS_START};
use super::errors::MemoryError;
use super::value::{Address, Value};
use rustc_hash::FxHashMap;

/// Local variable on the stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub value: Value,
    pub address: Address, // Virtual address for this variable
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    pub locals: FxHashMap<String, LocalVar>,
    pub insertion_order: Vec<String>, // Track order of variable declarations
    base_address: Address,
}

impl StackFrame {
    fn new(function_name: String, base_address: Address) -> Self {
        StackFrame {
            function_name,
            locals: FxHashMap::default(),
            insertion_order: Vec::new(),
            base_address,
        }
    }

    /// Get a local variable
    pub fn get_var(&self, name: &str) -> Option<&LocalVar> {
        self.locals.get(name)
    }

    /// Locals in declaration order
    pub fn ordered_locals(&self) -> impl Iterator<Item = (&str, &LocalVar)> {
        self.insertion_order
            .iter()
            .filter_map(|name| self.locals.get(name).map(|var| (name.as_str(), var)))
    }

    /// First address owned by this frame
    pub fn base_address(&self) -> Address {
        self.base_address
    }
}

/// The call stack
#[derive(Debug, Clone)]
pub struct Stack {
    frames: Vec<StackFrame>,
    next_address: Address,
}

impl Stack {
    pub fn new() -> Self {
        Stack {
            frames: Vec::new(),
            next_address: STACK_ADDRESS_START,
        }
    }

    /// Push a new stack frame
    pub fn push_frame(&mut self, function_name: &str) {
        self.frames
            .push(StackFrame::new(function_name.to_string(), self.next_address));
    }

    /// Pop the top stack frame, reclaiming its slots
    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        let frame = self.frames.pop()?;
        self.next_address = frame.base_address;
        Some(frame)
    }

    /// Declare a new local variable in the current frame
    pub fn declare_var(&mut self, name: &str, value: Value) -> Result<Address, MemoryError> {
        let frame = self.frames.last_mut().ok_or(MemoryError::NoStackFrame)?;
        // Redeclaring a name in the same frame keeps its original slot
        if let Some(existing) = frame.locals.get_mut(name) {
            existing.value = value;
            return Ok(existing.address);
        }

        let address = self.next_address;
        if address + INT_SIZE as u64 > GLOBAL_ADDRESS_START {
            return Err(MemoryError::StackOverflow {
                limit: GLOBAL_ADDRESS_START,
            });
        }

        frame.locals.insert(name.to_string(), LocalVar { value, address });
        frame.insertion_order.push(name.to_string());
        self.next_address += INT_SIZE as u64;
        Ok(address)
    }

    /// Look up a local in the current frame
    pub fn get_var(&self, name: &str) -> Result<&LocalVar, MemoryError> {
        self.current_frame()
            .ok_or(MemoryError::NoStackFrame)?
            .get_var(name)
            .ok_or_else(|| MemoryError::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Assign to a local in the current frame
    pub fn set_var(&mut self, name: &str, value: Value) -> Result<(), MemoryError> {
        let var = self
            .current_frame_mut()
            .ok_or(MemoryError::NoStackFrame)?
            .locals
            .get_mut(name)
            .ok_or_else(|| MemoryError::UndefinedVariable {
                name: name.to_string(),
            })?;
        var.value = value;
        Ok(())
    }

    /// Find the live local occupying `address`, searching every frame
    pub fn at(&self, address: Address) -> Option<&LocalVar> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.locals.values())
            .find(|var| var.address == address)
    }

    pub(crate) fn at_mut(&mut self, address: Address) -> Option<&mut LocalVar> {
        self.frames
            .iter_mut()
            .rev()
            .flat_map(|frame| frame.locals.values_mut())
            .find(|var| var.address == address)
    }

    /// Get the current (top) frame
    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    /// Get a mutable reference to the current frame
    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    /// Get all frames, outermost first
    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    /// Get the depth of the call stack
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_without_frame() {
        let mut stack = Stack::new();
        assert_eq!(
            stack.declare_var("bar", Value::Int(42)),
            Err(MemoryError::NoStackFrame)
        );
    }

    #[test]
    fn test_locals_disappear_with_their_frame() {
        let mut stack = Stack::new();
        stack.push_frame("demo");
        let addr = stack.declare_var("bar", Value::Int(42)).unwrap();
        assert_eq!(stack.get_var("bar").unwrap().value, Value::Int(42));

        let frame = stack.pop_frame().unwrap();
        assert_eq!(frame.function_name, "demo");
        assert!(stack.at(addr).is_none());
        assert_eq!(stack.get_var("bar"), Err(MemoryError::NoStackFrame));
    }

    #[test]
    fn test_popped_slots_are_reused() {
        let mut stack = Stack::new();
        stack.push_frame("main");
        stack.push_frame("first");
        let first = stack.declare_var("x", Value::Int(1)).unwrap();
        stack.pop_frame();

        stack.push_frame("second");
        let second = stack.declare_var("y", Value::Uninitialized).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            stack.get_var("x"),
            Err(MemoryError::UndefinedVariable {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_redeclare_on_full_stack_reuses_slot() {
        let mut stack = Stack::new();
        stack.push_frame("deep");
        let slots = (GLOBAL_ADDRESS_START - STACK_ADDRESS_START) / INT_SIZE as u64;
        for i in 0..slots - 1 {
            stack.declare_var(&format!("v{}", i), Value::Int(0)).unwrap();
        }
        let last = stack.declare_var("bar", Value::Int(1)).unwrap();
        assert_eq!(last + INT_SIZE as u64, GLOBAL_ADDRESS_START);

        assert_eq!(
            stack.declare_var("baz", Value::Int(2)),
            Err(MemoryError::StackOverflow {
                limit: GLOBAL_ADDRESS_START
            })
        );
        assert_eq!(stack.declare_var("bar", Value::Int(3)), Ok(last));
        assert_eq!(stack.get_var("bar").unwrap().value, Value::Int(3));
    }

    #[test]
    fn test_ordered_locals() {
        let mut stack = Stack::new();
        stack.push_frame("f");
        stack.declare_var("b", Value::Int(2)).unwrap();
        stack.declare_var("a", Value::Int(1)).unwrap();
        let names: Vec<&str> = stack
            .current_frame()
            .unwrap()
            .ordered_locals()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
