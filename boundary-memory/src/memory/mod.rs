pub mod allocator;
pub mod linear;

pub use self::allocator::{Allocator, FirstFitAllocator};
pub use self::linear::LinearMemory;
