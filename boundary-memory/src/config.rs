//! Linear memory configuration

use crate::error::{MemoryError, Result};

/// Sizing of the shared buffer and the heap carved out of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Total bytes in the linear buffer
    pub memory_size: u32,

    /// First byte the allocator may hand out; offset 0 stays reserved
    pub heap_base: u32,

    /// Alignment of every allocation, a power of two
    pub alignment: u32,
}

impl MemoryConfig {
    /// One full 16-bit address space (64KiB)
    pub const DEFAULT_MEMORY_SIZE: u32 = 1 << 16;

    pub const DEFAULT_HEAP_BASE: u32 = 8;

    pub const DEFAULT_ALIGNMENT: u32 = 8;

    /// Offsets travel in 16 bits, so nothing past this is addressable
    pub const MAX_MEMORY_SIZE: u32 = 1 << 16;

    pub fn new(memory_size: u32) -> Self {
        Self {
            memory_size,
            ..Self::default()
        }
    }

    pub fn with_heap_base(mut self, heap_base: u32) -> Self {
        self.heap_base = heap_base;
        self
    }

    pub fn with_alignment(mut self, alignment: u32) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.memory_size > Self::MAX_MEMORY_SIZE {
            return Err(MemoryError::InvalidConfig(format!(
                "memory_size {} exceeds the 16-bit address space ({})",
                self.memory_size,
                Self::MAX_MEMORY_SIZE
            )));
        }
        if !self.alignment.is_power_of_two() {
            return Err(MemoryError::InvalidConfig(format!(
                "alignment {} is not a power of two",
                self.alignment
            )));
        }
        if self.heap_base == 0 {
            return Err(MemoryError::InvalidConfig(
                "heap_base must be non-zero, offset 0 means no allocation".to_string(),
            ));
        }
        if self.heap_base >= self.memory_size {
            return Err(MemoryError::InvalidConfig(format!(
                "heap_base {:#x} leaves no heap in {} bytes of memory",
                self.heap_base, self.memory_size
            )));
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            memory_size: Self::DEFAULT_MEMORY_SIZE,
            heap_base: Self::DEFAULT_HEAP_BASE,
            alignment: Self::DEFAULT_ALIGNMENT,
        }
    }
}
