//! Boundary memory
//!
//! Compact references to string data in a linear memory shared between a
//! guest module and its host. A reference is one 32-bit word packing a 16-bit
//! offset (high half) and a 16-bit length (low half); a zero length turns the
//! word into an error sentinel whose high half is an [`ErrorCode`].

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod error;
pub mod memory;

// Re-export commonly used types
pub use crate::config::MemoryConfig;
pub use crate::core::{
    AllocationRef, EncodedAllocation, ErrorCode, OwnedRegion, StringMarshaller,
    check_encoded_allocation, error_code_to_string, high_bits, low_bits, merge_bits,
};
pub use crate::error::{MemoryError, Result};
pub use crate::memory::{Allocator, FirstFitAllocator, LinearMemory};
