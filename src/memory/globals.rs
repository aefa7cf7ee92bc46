//! Process-lifetime storage
//!
//! Globals are defined once, before the first frame is pushed, and stay
//! addressable until the model is dropped. Each one occupies a fixed
//! `int` slot in the global region.

use super::constants::{GLOBAL_ADDRESS_START, HEAP_ADDRESS_START, INT_SIZE};
use super::errors::MemoryError;
use super::value::{Address, Value};
use rustc_hash::FxHashMap;

/// A single global slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVar {
    pub name: String,
    pub value: Value,
    pub address: Address,
}

/// The global region
#[derive(Debug, Clone)]
pub struct Globals {
    vars: Vec<GlobalVar>,
    index: FxHashMap<String, usize>,
    next_address: Address,
}

impl Globals {
    pub fn new() -> Self {
        Globals {
            vars: Vec::new(),
            index: FxHashMap::default(),
            next_address: GLOBAL_ADDRESS_START,
        }
    }

    /// Define a global and return its address
    pub fn define(&mut self, name: &str, value: Value) -> Result<Address, MemoryError> {
        if self.index.contains_key(name) {
            return Err(MemoryError::DuplicateGlobal {
                name: name.to_string(),
            });
        }

        let address = self.next_address;
        if address + INT_SIZE as u64 > HEAP_ADDRESS_START {
            return Err(MemoryError::OutOfMemory {
                requested: INT_SIZE,
                allocated: self.vars.len() * INT_SIZE,
                limit: (HEAP_ADDRESS_START - GLOBAL_ADDRESS_START) as usize,
            });
        }
        self.next_address += INT_SIZE as u64;

        self.index.insert(name.to_string(), self.vars.len());
        self.vars.push(GlobalVar {
            name: name.to_string(),
            value,
            address,
        });
        Ok(address)
    }

    pub fn get(&self, name: &str) -> Option<&GlobalVar> {
        self.index.get(name).map(|&i| &self.vars[i])
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), MemoryError> {
        let i = *self
            .index
            .get(name)
            .ok_or_else(|| MemoryError::UndefinedVariable {
                name: name.to_string(),
            })?;
        self.vars[i].value = value;
        Ok(())
    }

    /// Find the global occupying `address`
    pub fn at(&self, address: Address) -> Option<&GlobalVar> {
        self.vars.iter().find(|g| g.address == address)
    }

    pub(crate) fn at_mut(&mut self, address: Address) -> Option<&mut GlobalVar> {
        self.vars.iter_mut().find(|g| g.address == address)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl Default for Globals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_assigns_consecutive_slots() {
        let mut globals = Globals::new();
        let a = globals.define("a", Value::Int(1)).unwrap();
        let b = globals.define("b", Value::Int(2)).unwrap();
        assert_eq!(a, GLOBAL_ADDRESS_START);
        assert_eq!(b, GLOBAL_ADDRESS_START + INT_SIZE as u64);
        assert_eq!(globals.at(b).map(|g| g.name.as_str()), Some("b"));
    }

    #[test]
    fn test_define_twice_is_rejected() {
        let mut globals = Globals::new();
        globals.define("global", Value::Int(42)).unwrap();
        assert_eq!(
            globals.define("global", Value::Int(0)),
            Err(MemoryError::DuplicateGlobal {
                name: "global".to_string()
            })
        );
    }

    #[test]
    fn test_set_unknown_global() {
        let mut globals = Globals::new();
        assert!(matches!(
            globals.set("nope", Value::Int(1)),
            Err(MemoryError::UndefinedVariable { .. })
        ));
    }
}
