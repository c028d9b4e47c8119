//! String marshalling across the linear memory boundary
//!
//! [`StringMarshaller::serialize`] reserves two bytes per code unit but
//! stores unit `i` with a one-byte stride, so the byte at `offset + i` is the
//! low byte of unit `i`. [`StringMarshaller::deserialize`] reads those bytes
//! back one per iteration and widens each to a 16-bit unit with a zero high
//! byte. The pair therefore carries Latin-1 text; units above 0xFF are
//! rejected on the way in.
//!
//! Full UTF-16 text uses the wide layout instead: two bytes per unit,
//! little-endian, at `offset + 2i`, through
//! [`StringMarshaller::serialize_utf16`] and
//! [`StringMarshaller::deserialize_utf16`].

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, trace, warn};

use crate::config::MemoryConfig;
use crate::core::allocation::{AllocationRef, EncodedAllocation};
use crate::core::codec::MemoryInt;
use crate::core::region::OwnedRegion;
use crate::error::{MemoryError, Result};
use crate::memory::{Allocator, FirstFitAllocator, LinearMemory};

/// Copies strings into and out of a linear memory through an allocator.
///
/// Both capabilities are injected; the marshaller holds no global state.
#[derive(Debug)]
pub struct StringMarshaller<A: Allocator = FirstFitAllocator> {
    memory: LinearMemory,
    allocator: A,
}

impl StringMarshaller<FirstFitAllocator> {
    /// Memory and first-fit allocator sized from one config
    pub fn with_config(config: MemoryConfig) -> Result<Self> {
        let memory = LinearMemory::from_config(&config)?;
        let allocator = FirstFitAllocator::new(config)?;
        Ok(Self::new(memory, allocator))
    }
}

impl<A: Allocator> StringMarshaller<A> {
    pub fn new(memory: LinearMemory, allocator: A) -> Self {
        Self { memory, allocator }
    }

    pub fn memory(&self) -> &LinearMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut LinearMemory {
        &mut self.memory
    }

    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.allocator
    }

    pub fn into_parts(self) -> (LinearMemory, A) {
        (self.memory, self.allocator)
    }

    /// Write `value` into a fresh region and return its reference.
    ///
    /// Every code unit must fit one byte. Empty strings are rejected: a zero
    /// length is reserved for sentinels.
    pub fn serialize(&mut self, value: &str) -> Result<EncodedAllocation> {
        let units: Vec<u16> = value.encode_utf16().collect();
        let length = field_length(units.len())?;
        for (index, &unit) in units.iter().enumerate() {
            if unit > 0xFF {
                return Err(MemoryError::UnitOutOfRange { index, unit });
            }
        }

        // Unit `i` lands at `i`, overwriting the high byte of unit `i - 1`
        let mut buffer = vec![0u8; units.len() << 1];
        for (i, &unit) in units.iter().enumerate() {
            LittleEndian::write_u16(&mut buffer[i..i + 2], unit);
        }

        let allocation = self.write_region(length, &buffer)?;
        let offset = allocation.offset();
        debug!(offset, length, "serialized string");
        Ok(allocation.encode())
    }

    /// Write `value` in the wide layout, two bytes per UTF-16 code unit.
    pub fn serialize_utf16(&mut self, value: &str) -> Result<EncodedAllocation> {
        let units: Vec<u16> = value.encode_utf16().collect();
        self.serialize_utf16_units(&units)
    }

    /// Like [`serialize_utf16`](Self::serialize_utf16) for raw code units,
    /// which need not form valid UTF-16.
    pub fn serialize_utf16_units(&mut self, units: &[u16]) -> Result<EncodedAllocation> {
        let length = field_length(units.len())?;
        let mut buffer = vec![0u8; units.len() << 1];
        LittleEndian::write_u16_into(units, &mut buffer);

        let allocation = self.write_region(length, &buffer)?;
        let offset = allocation.offset();
        debug!(offset, length, "serialized wide string");
        Ok(allocation.encode())
    }

    /// Write a narrow byte string, one byte per code unit.
    pub fn serialize_latin1(&mut self, bytes: &[u8]) -> Result<EncodedAllocation> {
        let length = field_length(bytes.len())?;
        let allocation = self.write_region(length, bytes)?;
        let offset = allocation.offset();
        debug!(offset, length, "serialized narrow string");
        Ok(allocation.encode())
    }

    fn write_region(&mut self, length: MemoryInt, data: &[u8]) -> Result<AllocationRef> {
        let offset = self.allocator.allocate(data.len() as u32)?;
        let written = MemoryInt::try_from(offset)
            .map_err(|_| MemoryError::OffsetOutOfRange(offset))
            .and_then(|short| AllocationRef::new(short, length))
            .and_then(|allocation| {
                self.memory.write_bytes(offset, data)?;
                Ok(allocation)
            });
        if written.is_err() {
            if let Err(err) = self.allocator.release(offset) {
                warn!(offset, %err, "failed to release unwritten region");
            }
        }
        written
    }

    /// Widen the narrow string at `allocation` into code units.
    ///
    /// Reads `length` bytes from `offset`, one per iteration, each becoming a
    /// 16-bit unit whose high byte is zero.
    pub fn deserialize_units(&self, allocation: AllocationRef) -> Result<Vec<u16>> {
        let length = allocation.length() as usize;
        let source = self
            .memory
            .read_bytes(allocation.offset() as u32, allocation.length() as u32)?;
        let mut units = vec![0u16; length];
        for (i, &byte) in source.iter().enumerate() {
            units[i] = u16::from(byte);
        }
        let offset = allocation.offset();
        trace!(offset, length, "widened narrow string");
        Ok(units)
    }

    /// Read the narrow string at `allocation` into a native string.
    ///
    /// The source region is left in place; release it with
    /// [`free`](Self::free) or hold it through [`claim`](Self::claim).
    pub fn deserialize(&self, allocation: AllocationRef) -> Result<String> {
        let units = self.deserialize_units(allocation)?;
        decode_units(&units, allocation)
    }

    /// Read the wide string written by [`serialize_utf16`](Self::serialize_utf16).
    pub fn deserialize_utf16(&self, allocation: AllocationRef) -> Result<String> {
        let source = self
            .memory
            .read_bytes(allocation.offset() as u32, allocation.byte_len())?;
        let mut units = vec![0u16; allocation.length() as usize];
        LittleEndian::read_u16_into(source, &mut units);
        decode_units(&units, allocation)
    }

    /// Validate a raw word, then [`deserialize`](Self::deserialize) it.
    pub fn deserialize_word(&self, word: u32) -> Result<String> {
        let allocation = AllocationRef::try_from(EncodedAllocation::from_bits(word))?;
        self.deserialize(allocation)
    }

    /// Release the region at `offset`. Offset 0 means "no allocation" and is
    /// a no-op; anything else goes to the allocator as is.
    pub fn free(&mut self, offset: u32) -> Result<()> {
        if offset == 0 {
            return Ok(());
        }
        self.allocator.release(offset)?;
        debug!(offset, "freed region");
        Ok(())
    }

    /// Take ownership of `allocation`; the region is released when the
    /// returned guard drops.
    pub fn claim(&mut self, allocation: AllocationRef) -> OwnedRegion<'_, A> {
        OwnedRegion::new(self, allocation)
    }
}

fn field_length(count: usize) -> Result<MemoryInt> {
    match MemoryInt::try_from(count) {
        Ok(0) => Err(MemoryError::EmptyString),
        Ok(length) => Ok(length),
        Err(_) => Err(MemoryError::StringTooLong { length: count }),
    }
}

fn decode_units(units: &[u16], allocation: AllocationRef) -> Result<String> {
    String::from_utf16(units).map_err(|_| MemoryError::InvalidUtf16 {
        offset: allocation.offset(),
    })
}
