//! Encoded allocations and their validation
//!
//! A word with a non-zero low half names a region `(offset, length)`; a word
//! with a zero low half is an error sentinel whose high half is an
//! [`ErrorCode`] ordinal.

use std::fmt;
use std::num::NonZeroU16;

use crate::core::codec::{MEMORY_INT_MAX, MemoryBits, MemoryInt, merge_bits, split_bits};
use crate::core::error_code::ErrorCode;
use crate::error::{MemoryError, Result};

/// Classify a raw word.
///
/// Sentinels return their carried code unchanged, without further checks.
/// Valid-looking words return `PAGE_OVERFLOW_ERROR` when `offset + length`
/// exceeds 65535, otherwise `SUCCESS`.
pub fn check_encoded_allocation(word: MemoryBits) -> ErrorCode {
    let (offset, length) = split_bits(word);
    if length == 0 {
        return ErrorCode::from(offset);
    }
    if offset as MemoryBits + length as MemoryBits > MEMORY_INT_MAX {
        return ErrorCode::PAGE_OVERFLOW_ERROR;
    }
    ErrorCode::SUCCESS
}

/// Wire form of an allocation reference or error sentinel
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EncodedAllocation(MemoryBits);

impl EncodedAllocation {
    pub const fn from_bits(word: MemoryBits) -> Self {
        Self(word)
    }

    pub const fn bits(self) -> MemoryBits {
        self.0
    }

    /// Sentinel word carrying `code`
    pub const fn from_error(code: ErrorCode) -> Self {
        Self(merge_bits(code.ordinal(), 0))
    }

    pub const fn offset(self) -> MemoryInt {
        split_bits(self.0).0
    }

    pub const fn length(self) -> MemoryInt {
        split_bits(self.0).1
    }

    pub const fn is_sentinel(self) -> bool {
        self.length() == 0
    }

    pub fn check(self) -> ErrorCode {
        check_encoded_allocation(self.0)
    }

    /// Typed view of the word.
    ///
    /// A sentinel decodes to `Err` with its carried code, so the all-zero
    /// word decodes to `Err(ErrorCode::SUCCESS)`: completed, no payload.
    pub fn decode(self) -> std::result::Result<AllocationRef, ErrorCode> {
        let code = self.check();
        if self.is_sentinel() || !code.is_success() {
            return Err(code);
        }
        match NonZeroU16::new(self.length()) {
            Some(length) => Ok(AllocationRef {
                offset: self.offset(),
                length,
            }),
            None => Err(code),
        }
    }
}

impl fmt::Debug for EncodedAllocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "Sentinel({})", ErrorCode::from(self.offset()))
        } else {
            write!(f, "Allocation({:#06x}, {})", self.offset(), self.length())
        }
    }
}

impl From<MemoryBits> for EncodedAllocation {
    fn from(word: MemoryBits) -> Self {
        Self(word)
    }
}

impl From<EncodedAllocation> for MemoryBits {
    fn from(encoded: EncodedAllocation) -> Self {
        encoded.0
    }
}

impl From<AllocationRef> for EncodedAllocation {
    fn from(allocation: AllocationRef) -> Self {
        allocation.encode()
    }
}

impl From<ErrorCode> for EncodedAllocation {
    fn from(code: ErrorCode) -> Self {
        Self::from_error(code)
    }
}

/// A validated, non-empty region reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllocationRef {
    offset: MemoryInt,
    length: NonZeroU16,
}

impl AllocationRef {
    pub fn new(offset: MemoryInt, length: MemoryInt) -> Result<Self> {
        let length = NonZeroU16::new(length).ok_or(MemoryError::EmptyString)?;
        if offset as MemoryBits + length.get() as MemoryBits > MEMORY_INT_MAX {
            return Err(MemoryError::PageOverflow {
                offset,
                length: length.get(),
            });
        }
        Ok(Self { offset, length })
    }

    pub const fn offset(&self) -> MemoryInt {
        self.offset
    }

    /// Length in code units
    pub const fn length(&self) -> MemoryInt {
        self.length.get()
    }

    /// Bytes spanned when every code unit occupies two bytes
    pub const fn byte_len(&self) -> u32 {
        (self.length.get() as u32) << 1
    }

    pub const fn encode(&self) -> EncodedAllocation {
        EncodedAllocation(merge_bits(self.offset, self.length.get()))
    }
}

impl TryFrom<EncodedAllocation> for AllocationRef {
    type Error = MemoryError;

    fn try_from(encoded: EncodedAllocation) -> Result<Self> {
        encoded.decode().map_err(|code| {
            if code == ErrorCode::PAGE_OVERFLOW_ERROR && !encoded.is_sentinel() {
                MemoryError::PageOverflow {
                    offset: encoded.offset(),
                    length: encoded.length(),
                }
            } else {
                MemoryError::Sentinel(code)
            }
        })
    }
}
