//! Shared linear buffer
//!
//! Byte-addressable memory visible to both sides of the boundary. Multi-byte
//! values are stored little-endian, the byte order of wasm linear memory.

use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};

use crate::config::MemoryConfig;
use crate::core::allocation::EncodedAllocation;
use crate::error::{MemoryError, Result};

#[derive(Clone, PartialEq, Eq)]
pub struct LinearMemory {
    bytes: Vec<u8>,
}

impl LinearMemory {
    /// Zero-filled memory of `size` bytes
    pub fn new(size: u32) -> Self {
        Self {
            bytes: vec![0; size as usize],
        }
    }

    pub fn from_config(config: &MemoryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.memory_size))
    }

    pub fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn range(&self, offset: u32, length: u32) -> Result<Range<usize>> {
        let start = offset as usize;
        match start.checked_add(length as usize) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(MemoryError::OutOfBounds {
                offset,
                length,
                memory_size: self.size(),
            }),
        }
    }

    pub fn read_u8(&self, offset: u32) -> Result<u8> {
        let range = self.range(offset, 1)?;
        Ok(self.bytes[range.start])
    }

    pub fn read_bytes(&self, offset: u32, length: u32) -> Result<&[u8]> {
        let range = self.range(offset, length)?;
        Ok(&self.bytes[range])
    }

    pub fn write_bytes(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        let range = self.range(offset, data.len() as u32)?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    pub fn read_u16(&self, offset: u32) -> Result<u16> {
        let range = self.range(offset, 2)?;
        Ok(LittleEndian::read_u16(&self.bytes[range]))
    }

    pub fn write_u16(&mut self, offset: u32, value: u16) -> Result<()> {
        let range = self.range(offset, 2)?;
        LittleEndian::write_u16(&mut self.bytes[range], value);
        Ok(())
    }

    /// Read an encoded word stored at `offset`
    pub fn read_word(&self, offset: u32) -> Result<EncodedAllocation> {
        let range = self.range(offset, 4)?;
        Ok(EncodedAllocation::from_bits(LittleEndian::read_u32(
            &self.bytes[range],
        )))
    }

    /// Store an encoded word at `offset`. The field order inside the word is
    /// fixed by the codec, not by this byte order.
    pub fn write_word(&mut self, offset: u32, word: EncodedAllocation) -> Result<()> {
        let range = self.range(offset, 4)?;
        LittleEndian::write_u32(&mut self.bytes[range], word.bits());
        Ok(())
    }
}

impl std::fmt::Debug for LinearMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearMemory")
            .field("size", &self.bytes.len())
            .finish()
    }
}
