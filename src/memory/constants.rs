// Address layout for the virtual storage model

/// Size of an `int` slot in bytes
pub const INT_SIZE: usize = 4;

/// Starting address for stack slots
/// Stack addresses start at 0x00000004 and grow upward in `INT_SIZE` steps
pub const STACK_ADDRESS_START: u64 = 0x0000_0004;

/// Starting address for process-lifetime globals
/// Everything below this address belongs to the stack region
pub const GLOBAL_ADDRESS_START: u64 = 0x0000_1000;

/// Starting address for heap allocations
/// Heap addresses start at 0x10000000 to clearly distinguish them from stack and global addresses
pub const HEAP_ADDRESS_START: u64 = 0x1000_0000;
