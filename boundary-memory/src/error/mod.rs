//! Error types for linear memory and marshalling operations

use crate::core::error_code::ErrorCode;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} bytes, {available} available")]
    OutOfMemory { requested: u32, available: u32 },

    #[error("Zero-sized allocation requested")]
    ZeroSizedAllocation,

    #[error("Empty strings cannot be encoded as an allocation")]
    EmptyString,

    #[error("String of {length} code units does not fit a 16-bit length field")]
    StringTooLong { length: usize },

    #[error("Code unit {unit:#06x} at index {index} does not fit one byte")]
    UnitOutOfRange { index: usize, unit: u16 },

    #[error("Access of {length} bytes at offset {offset:#x} exceeds memory of {memory_size} bytes")]
    OutOfBounds {
        offset: u32,
        length: u32,
        memory_size: u32,
    },

    #[error("Offset {0:#x} does not fit a 16-bit offset field")]
    OffsetOutOfRange(u32),

    #[error("No live allocation at offset {0:#x}")]
    NotAllocated(u32),

    #[error("Encoded allocation carries error code: {0}")]
    Sentinel(ErrorCode),

    #[error("Allocation at offset {offset:#x} with length {length} overflows the page")]
    PageOverflow { offset: u16, length: u16 },

    #[error("Invalid UTF-16 in region at offset {offset:#x}")]
    InvalidUtf16 { offset: u16 },

    #[error("Invalid memory configuration: {0}")]
    InvalidConfig(String),
}

impl MemoryError {
    /// Translate into the wire-level error vocabulary.
    ///
    /// The marshaller never does this itself; it is offered to callers that
    /// need to push a failure back across the boundary as a sentinel word.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            MemoryError::OutOfMemory { .. } | MemoryError::ZeroSizedAllocation => {
                ErrorCode::OUT_OF_MEMORY
            }
            MemoryError::PageOverflow { .. }
            | MemoryError::OutOfBounds { .. }
            | MemoryError::OffsetOutOfRange(_) => ErrorCode::PAGE_OVERFLOW_ERROR,
            MemoryError::InvalidUtf16 { .. } => ErrorCode::ARGUMENT_DESERIALIZATION_FAILED,
            MemoryError::UnitOutOfRange { .. } => ErrorCode::RESPONSE_SERIALIZATION_FAILED,
            MemoryError::Sentinel(code) => *code,
            MemoryError::EmptyString
            | MemoryError::StringTooLong { .. }
            | MemoryError::NotAllocated(_)
            | MemoryError::InvalidConfig(_) => ErrorCode::FAILURE,
        }
    }
}

/// Convenient Result type
pub type Result<T> = std::result::Result<T, MemoryError>;
