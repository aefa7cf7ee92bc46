//! Heap implementation for the storage model
//!
//! This module provides dynamic storage with:
//! - Explicit allocation/deallocation (malloc/free)
//! - Tombstone tracking for freed blocks, so a second release or a late
//!   access is reported instead of silently succeeding
//! - Per-byte initialization tracking (fresh blocks hold indeterminate bytes)
//! - Leak reporting via [`Heap::live_blocks`]

use super::constants::HEAP_ADDRESS_START;
use super::errors::MemoryError;
use super::value::Address;
use rustc_hash::FxHashMap;

/// State of a heap block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    Allocated,
    Tombstone, // Freed but kept so misuse can be diagnosed
}

/// A block of heap memory
#[derive(Debug, Clone)]
pub struct HeapBlock {
    pub data: Vec<u8>, // Raw bytes
    pub size: usize,
    pub state: BlockState,
    pub init_map: Vec<bool>, // Per-byte initialization tracking
}

impl HeapBlock {
    pub fn new(size: usize) -> Self {
        HeapBlock {
            data: vec![0; size],
            size,
            state: BlockState::Allocated,
            init_map: vec![false; size],
        }
    }

    /// End of `offset..offset + len`, if that range lies inside the block
    fn range_end(&self, offset: usize, len: usize) -> Option<usize> {
        offset.checked_add(len).filter(|&end| end <= self.size)
    }

    /// Check if a byte range is initialized
    pub fn is_initialized(&self, offset: usize, size: usize) -> bool {
        match self.range_end(offset, size) {
            Some(end) => self.init_map[offset..end].iter().all(|&b| b),
            None => false,
        }
    }

    /// Write bytes to the block
    pub fn write_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), MemoryError> {
        let end = self
            .range_end(offset, bytes.len())
            .ok_or(MemoryError::BufferOverrun {
                offset,
                len: bytes.len(),
                size: self.size,
            })?;
        self.data[offset..end].copy_from_slice(bytes);
        self.init_map[offset..end].fill(true);
        Ok(())
    }
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    allocations: FxHashMap<Address, HeapBlock>,
    next_address: Address,
    live_bytes: usize,
    total_allocated_bytes: usize,
    max_heap_size: usize,
}

impl Heap {
    /// Create a new heap with a maximum size limit
    pub fn new(max_heap_size: usize) -> Self {
        Heap {
            allocations: FxHashMap::default(),
            next_address: HEAP_ADDRESS_START, // Start heap at high address
            live_bytes: 0,
            total_allocated_bytes: 0,
            max_heap_size,
        }
    }

    /// Allocate a block of memory
    pub fn allocate(&mut self, size: usize) -> Result<Address, MemoryError> {
        if size == 0 {
            return Err(MemoryError::InvalidSize { size });
        }
        if size > self.max_heap_size.saturating_sub(self.live_bytes) {
            return Err(MemoryError::OutOfMemory {
                requested: size,
                allocated: self.live_bytes,
                limit: self.max_heap_size,
            });
        }

        // Addresses are never reused, so a tombstone keeps identifying its block
        let addr = self.next_address;
        self.next_address += size as u64;
        self.allocations.insert(addr, HeapBlock::new(size));
        self.live_bytes += size;
        self.total_allocated_bytes += size;

        Ok(addr)
    }

    /// Free a block of memory (mark as tombstone)
    pub fn free(&mut self, addr: Address) -> Result<(), MemoryError> {
        match self.allocations.get_mut(&addr) {
            Some(block) if block.state == BlockState::Allocated => {
                block.state = BlockState::Tombstone;
                self.live_bytes -= block.size;
                Ok(())
            }
            Some(_) => Err(MemoryError::DoubleFree { address: addr }),
            None => Err(MemoryError::InvalidFree { address: addr }),
        }
    }

    /// Get a heap block (returns error if tombstone or doesn't exist)
    pub fn get_block(&self, addr: Address) -> Result<&HeapBlock, MemoryError> {
        match self.allocations.get(&addr) {
            Some(block) if block.state == BlockState::Allocated => Ok(block),
            Some(_) => Err(MemoryError::UseAfterFree { address: addr }),
            None => Err(MemoryError::InvalidAddress { address: addr }),
        }
    }

    /// Get a mutable heap block
    pub fn get_block_mut(&mut self, addr: Address) -> Result<&mut HeapBlock, MemoryError> {
        match self.allocations.get_mut(&addr) {
            Some(block) if block.state == BlockState::Allocated => Ok(block),
            Some(_) => Err(MemoryError::UseAfterFree { address: addr }),
            None => Err(MemoryError::InvalidAddress { address: addr }),
        }
    }

    /// Locate the block containing `addr` and the offset within it.
    /// Tombstones are included so a stale pointer reports use-after-free.
    fn locate(&self, addr: Address) -> Result<(Address, usize), MemoryError> {
        self.allocations
            .iter()
            .find(|&(&base, block)| addr >= base && addr < base + block.size as u64)
            .map(|(&base, _)| (base, (addr - base) as usize))
            .ok_or(MemoryError::InvalidAddress { address: addr })
    }

    /// Write bytes starting at an address
    pub fn write_bytes_at(&mut self, addr: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let (base, offset) = self.locate(addr)?;
        self.get_block_mut(base)?.write_bytes(offset, bytes)
    }

    /// Read bytes starting at an address
    pub fn read_bytes_at(&self, addr: Address, size: usize) -> Result<Vec<u8>, MemoryError> {
        let (base, offset) = self.locate(addr)?;
        let block = self.get_block(base)?;

        let end = block
            .range_end(offset, size)
            .ok_or(MemoryError::BufferOverrun {
                offset,
                len: size,
                size: block.size,
            })?;
        if !block.is_initialized(offset, size) {
            return Err(MemoryError::UninitializedRead { address: addr });
        }

        Ok(block.data[offset..end].to_vec())
    }

    /// Blocks that are still allocated, ordered by address
    pub fn live_blocks(&self) -> Vec<(Address, usize)> {
        let mut live: Vec<(Address, usize)> = self
            .allocations
            .iter()
            .filter(|(_, block)| block.state == BlockState::Allocated)
            .map(|(&addr, block)| (addr, block.size))
            .collect();
        live.sort_unstable();
        live
    }

    /// Bytes currently allocated and not yet freed
    pub fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Bytes ever allocated, freed or not
    pub fn total_allocated(&self) -> usize {
        self.total_allocated_bytes
    }
}

impl Default for Heap {
    fn default() -> Self {
        // Default heap size: 10 MB
        Self::new(10 * 1024 * 1024)
    }
}
