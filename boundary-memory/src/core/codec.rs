//! Encoded allocation codec
//!
//! A 32-bit word is split into two 16-bit halves.
//! Layout: [offset:16][length:16], offset in the high half.

/// Offsets, lengths and error ordinals
pub type MemoryInt = u16;

/// Two `MemoryInt`s packed high/low; must be exactly twice as wide
pub type MemoryBits = u32;

/// Largest `MemoryInt` widened to `MemoryBits`, for overflow comparisons
pub const MEMORY_INT_MAX: MemoryBits = MemoryInt::MAX as MemoryBits;

const HALF_WIDTH: u32 = MemoryInt::BITS;

/// Bits 16..32 of `word`
#[inline]
pub const fn high_bits(word: MemoryBits) -> MemoryInt {
    (word >> HALF_WIDTH) as MemoryInt
}

/// Bits 0..16 of `word`
#[inline]
pub const fn low_bits(word: MemoryBits) -> MemoryInt {
    word as MemoryInt
}

/// Inverse of the `high_bits`/`low_bits` pair
#[inline]
pub const fn merge_bits(high: MemoryInt, low: MemoryInt) -> MemoryBits {
    ((high as MemoryBits) << HALF_WIDTH) | low as MemoryBits
}

#[inline]
pub const fn split_bits(word: MemoryBits) -> (MemoryInt, MemoryInt) {
    (high_bits(word), low_bits(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_layout() {
        assert_eq!(merge_bits(0x00FF, 0x0010), 0x00FF_0010);
        assert_eq!(high_bits(0x00FF_0010), 0x00FF);
        assert_eq!(low_bits(0x00FF_0010), 0x0010);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(merge_bits(0, 0), 0);
        assert_eq!(merge_bits(u16::MAX, u16::MAX), u32::MAX);
        assert_eq!(merge_bits(1, 0), 0x0001_0000);
        assert_eq!(split_bits(0xDEAD_BEEF), (0xDEAD, 0xBEEF));
    }

    #[test]
    fn test_memory_int_max() {
        assert_eq!(MEMORY_INT_MAX, 65535);
    }
}
