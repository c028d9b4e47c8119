//! Allocator capability for the shared buffer

use std::collections::BTreeMap;

use metrics::{counter, gauge};
use tracing::{debug, trace};

use crate::config::MemoryConfig;
use crate::error::{MemoryError, Result};

// Minimal interface the marshaller needs from whatever manages the heap
pub trait Allocator {
    /// Reserve `size` bytes and return the region's offset. Never returns 0
    /// for a live region.
    fn allocate(&mut self, size: u32) -> Result<u32>;

    /// Release the region starting at `offset`
    fn release(&mut self, offset: u32) -> Result<()>;
}

impl<A: Allocator + ?Sized> Allocator for &mut A {
    fn allocate(&mut self, size: u32) -> Result<u32> {
        (**self).allocate(size)
    }

    fn release(&mut self, offset: u32) -> Result<()> {
        (**self).release(offset)
    }
}

impl<A: Allocator + ?Sized> Allocator for Box<A> {
    fn allocate(&mut self, size: u32) -> Result<u32> {
        (**self).allocate(size)
    }

    fn release(&mut self, offset: u32) -> Result<()> {
        (**self).release(offset)
    }
}

/// First-fit allocator over `[heap_base, memory_size)`
///
/// Live blocks are kept ordered by offset; a request takes the first aligned
/// gap large enough to hold it.
#[derive(Debug, Clone)]
pub struct FirstFitAllocator {
    config: MemoryConfig,
    live: BTreeMap<u32, u32>,
    bytes_in_use: u32,
}

impl FirstFitAllocator {
    pub fn new(config: MemoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            live: BTreeMap::new(),
            bytes_in_use: 0,
        })
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn live_allocations(&self) -> usize {
        self.live.len()
    }

    pub fn bytes_in_use(&self) -> u32 {
        self.bytes_in_use
    }

    /// Size of the live block at `offset`, if any
    pub fn block_size(&self, offset: u32) -> Option<u32> {
        self.live.get(&offset).copied()
    }

    fn align_up(&self, value: u64) -> u64 {
        let mask = self.config.alignment as u64 - 1;
        (value + mask) & !mask
    }

    fn find_gap(&self, size: u32) -> Option<u32> {
        let size = size as u64;
        let mut candidate = self.align_up(self.config.heap_base as u64);
        for (&offset, &block) in &self.live {
            if candidate + size <= offset as u64 {
                break;
            }
            candidate = candidate.max(self.align_up(offset as u64 + block as u64));
        }
        if candidate + size <= self.config.memory_size as u64 {
            Some(candidate as u32)
        } else {
            None
        }
    }
}

impl Default for FirstFitAllocator {
    fn default() -> Self {
        Self {
            config: MemoryConfig::default(),
            live: BTreeMap::new(),
            bytes_in_use: 0,
        }
    }
}

impl Allocator for FirstFitAllocator {
    fn allocate(&mut self, size: u32) -> Result<u32> {
        if size == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }
        let Some(offset) = self.find_gap(size) else {
            let available = self
                .config
                .memory_size
                .saturating_sub(self.config.heap_base)
                .saturating_sub(self.bytes_in_use);
            debug!(size, available, "allocation failed");
            return Err(MemoryError::OutOfMemory {
                requested: size,
                available,
            });
        };

        self.live.insert(offset, size);
        self.bytes_in_use += size;
        trace!(offset, size, "allocated");
        counter!("boundary_memory.allocations").increment(1);
        gauge!("boundary_memory.bytes_in_use").set(self.bytes_in_use as f64);
        Ok(offset)
    }

    fn release(&mut self, offset: u32) -> Result<()> {
        let size = self
            .live
            .remove(&offset)
            .ok_or(MemoryError::NotAllocated(offset))?;
        self.bytes_in_use -= size;
        trace!(offset, size, "released");
        counter!("boundary_memory.releases").increment(1);
        gauge!("boundary_memory.bytes_in_use").set(self.bytes_in_use as f64);
        Ok(())
    }
}
