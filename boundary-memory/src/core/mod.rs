pub mod allocation;
pub mod codec;
pub mod error_code;
pub mod marshal;
pub mod region;

// Re-export core types
pub use self::allocation::{AllocationRef, EncodedAllocation, check_encoded_allocation};
pub use self::codec::{
    MEMORY_INT_MAX, MemoryBits, MemoryInt, high_bits, low_bits, merge_bits, split_bits,
};
pub use self::error_code::{ErrorCode, error_code_to_string};
pub use self::marshal::StringMarshaller;
pub use self::region::OwnedRegion;
