use boundary_memory::{
    AllocationRef, Allocator, EncodedAllocation, ErrorCode, FirstFitAllocator, LinearMemory,
    MemoryConfig, MemoryError, StringMarshaller,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn marshaller() -> StringMarshaller {
    StringMarshaller::with_config(MemoryConfig::default()).unwrap()
}

#[rstest]
#[case::ascii("hello")]
#[case::single("x")]
#[case::latin1("naïve café")]
#[case::nul("a\0b")]
#[case::top_of_range("\u{ff}\u{80}")]
fn round_trip(mut marshaller: StringMarshaller, #[case] input: &str) {
    let word = marshaller.serialize(input).unwrap();
    assert_eq!(word.check(), ErrorCode::SUCCESS);

    let allocation = word.decode().unwrap();
    assert_eq!(allocation.length() as usize, input.chars().count());
    assert_eq!(marshaller.deserialize(allocation).unwrap(), input);
}

#[rstest]
#[case::cjk("漢字")]
#[case::astral("🦀🦀")]
#[case::mixed("é漢")]
fn wide_units_are_rejected(mut marshaller: StringMarshaller, #[case] input: &str) {
    assert!(matches!(
        marshaller.serialize(input),
        Err(MemoryError::UnitOutOfRange { .. })
    ));
    assert_eq!(marshaller.allocator().live_allocations(), 0);
}

#[rstest]
#[case::ascii("hello")]
#[case::single("x")]
#[case::latin1("naïve café")]
#[case::cjk("漢字")]
#[case::astral("🦀🦀")]
#[case::nul("a\0b")]
fn wide_round_trip(mut marshaller: StringMarshaller, #[case] input: &str) {
    let word = marshaller.serialize_utf16(input).unwrap();
    assert_eq!(word.check(), ErrorCode::SUCCESS);

    let allocation = word.decode().unwrap();
    assert_eq!(allocation.length() as usize, input.encode_utf16().count());
    assert_eq!(marshaller.deserialize_utf16(allocation).unwrap(), input);
}

#[rstest]
#[case::ascii(b"hello", "hello")]
#[case::high_bytes(b"\xe9\xff", "\u{e9}\u{ff}")]
fn narrow_round_trip(
    mut marshaller: StringMarshaller,
    #[case] input: &[u8],
    #[case] expected: &str,
) {
    let word = marshaller.serialize_latin1(input).unwrap();
    assert_eq!(marshaller.deserialize_word(word.bits()).unwrap(), expected);
}

#[rstest]
fn narrow_read_of_wide_region_sees_raw_bytes(mut marshaller: StringMarshaller) {
    let word = marshaller.serialize_utf16("ab").unwrap();
    let allocation = word.decode().unwrap();

    // length counts code units, the narrow read covers only the first half
    // of the two-byte slots
    assert_eq!(
        marshaller.deserialize_units(allocation).unwrap(),
        vec![u16::from(b'a'), 0]
    );
}

#[rstest]
fn empty_string_is_rejected(mut marshaller: StringMarshaller) {
    assert_eq!(marshaller.serialize(""), Err(MemoryError::EmptyString));
    assert_eq!(marshaller.serialize_utf16(""), Err(MemoryError::EmptyString));
    assert_eq!(marshaller.serialize_latin1(b""), Err(MemoryError::EmptyString));
    assert_eq!(marshaller.allocator().live_allocations(), 0);
}

#[rstest]
fn too_long_string_is_rejected(mut marshaller: StringMarshaller) {
    let units = vec![0x41u16; 65536];
    assert_eq!(
        marshaller.serialize_utf16_units(&units),
        Err(MemoryError::StringTooLong { length: 65536 })
    );
    assert_eq!(marshaller.allocator().live_allocations(), 0);
}

#[rstest]
fn consecutive_serializations_do_not_overlap(mut marshaller: StringMarshaller) {
    let first = marshaller.serialize_utf16("first").unwrap().decode().unwrap();
    let second = marshaller.serialize_utf16("second").unwrap().decode().unwrap();

    let first_end = first.offset() as u32 + first.byte_len();
    assert!(second.offset() as u32 >= first_end);
    assert_eq!(marshaller.deserialize_utf16(first).unwrap(), "first");
    assert_eq!(marshaller.deserialize_utf16(second).unwrap(), "second");
}

#[rstest]
fn sentinel_words_are_refused(marshaller: StringMarshaller) {
    for code in ErrorCode::ALL {
        let word = EncodedAllocation::from_error(code).bits();
        assert_eq!(
            marshaller.deserialize_word(word),
            Err(MemoryError::Sentinel(code))
        );
    }
}

#[rstest]
fn overflowing_word_is_refused(marshaller: StringMarshaller) {
    let word = boundary_memory::merge_bits(0xFFF0, 0x0100);
    assert_eq!(
        marshaller.deserialize_word(word),
        Err(MemoryError::PageOverflow {
            offset: 0xFFF0,
            length: 0x0100
        })
    );
}

#[test]
fn out_of_memory_is_not_translated() {
    let mut marshaller = StringMarshaller::with_config(MemoryConfig::new(32)).unwrap();
    let err = marshaller.serialize("this will not fit in 24 bytes").unwrap_err();
    assert!(matches!(err, MemoryError::OutOfMemory { .. }));
    assert_eq!(err.error_code(), ErrorCode::OUT_OF_MEMORY);
}

#[test]
fn out_of_bounds_read_is_reported() {
    let marshaller = StringMarshaller::new(LinearMemory::new(16), FirstFitAllocator::default());
    let allocation = AllocationRef::new(12, 8).unwrap();
    assert!(matches!(
        marshaller.deserialize(allocation),
        Err(MemoryError::OutOfBounds { .. })
    ));
}

/// Hands out offsets beyond the 16-bit field
struct HighAllocator {
    released: Vec<u32>,
}

impl Allocator for HighAllocator {
    fn allocate(&mut self, _size: u32) -> boundary_memory::Result<u32> {
        Ok(0x1_0000)
    }

    fn release(&mut self, offset: u32) -> boundary_memory::Result<()> {
        self.released.push(offset);
        Ok(())
    }
}

#[test]
fn unrepresentable_offset_is_released() {
    let allocator = HighAllocator {
        released: Vec::new(),
    };
    let mut marshaller = StringMarshaller::new(LinearMemory::new(64), allocator);
    assert_eq!(
        marshaller.serialize("a"),
        Err(MemoryError::OffsetOutOfRange(0x1_0000))
    );
    let (_, allocator) = marshaller.into_parts();
    assert_eq!(allocator.released, vec![0x1_0000]);
}

/// Hands out offsets beyond the 16-bit field and cannot take them back
struct StuckAllocator;

impl Allocator for StuckAllocator {
    fn allocate(&mut self, _size: u32) -> boundary_memory::Result<u32> {
        Ok(0x2_0000)
    }

    fn release(&mut self, offset: u32) -> boundary_memory::Result<()> {
        Err(MemoryError::NotAllocated(offset))
    }
}

#[test]
fn failed_release_keeps_original_error() {
    let mut marshaller = StringMarshaller::new(LinearMemory::new(64), StuckAllocator);
    assert_eq!(
        marshaller.serialize("a"),
        Err(MemoryError::OffsetOutOfRange(0x2_0000))
    );
    assert_eq!(
        marshaller.serialize_utf16("a"),
        Err(MemoryError::OffsetOutOfRange(0x2_0000))
    );
}

#[test]
fn borrowed_allocator_is_accepted() {
    let mut allocator = FirstFitAllocator::new(MemoryConfig::new(128)).unwrap();
    {
        let mut marshaller = StringMarshaller::new(LinearMemory::new(128), &mut allocator);
        let allocation = marshaller.serialize("borrowed").unwrap().decode().unwrap();
        assert_eq!(marshaller.claim(allocation).read().unwrap(), "borrowed");
    }
    assert_eq!(allocator.live_allocations(), 0);
}

#[rstest]
fn words_survive_storage_in_memory(mut marshaller: StringMarshaller) {
    let word = marshaller.serialize("stored").unwrap();
    marshaller.memory_mut().write_word(0, word).unwrap();
    let read_back = marshaller.memory().read_word(0).unwrap();
    assert_eq!(read_back, word);
    let allocation = read_back.decode().unwrap();
    assert_eq!(marshaller.deserialize(allocation).unwrap(), "stored");
}

proptest! {
    #[test]
    fn any_latin1_string_round_trips(input in "[\\x{1}-\\x{ff}]{1,128}") {
        let mut marshaller = StringMarshaller::with_config(MemoryConfig::default()).unwrap();
        let word = marshaller.serialize(&input).unwrap();
        let allocation = word.decode().unwrap();
        prop_assert_eq!(marshaller.deserialize(allocation).unwrap(), input);
        marshaller.free(allocation.offset() as u32).unwrap();
        prop_assert_eq!(marshaller.allocator().live_allocations(), 0);
    }

    #[test]
    fn any_non_empty_string_round_trips_wide(input in "\\PC{1,64}") {
        let mut marshaller = StringMarshaller::with_config(MemoryConfig::default()).unwrap();
        let word = marshaller.serialize_utf16(&input).unwrap();
        let allocation = word.decode().unwrap();
        prop_assert_eq!(marshaller.deserialize_utf16(allocation).unwrap(), input);
        marshaller.free(allocation.offset() as u32).unwrap();
        prop_assert_eq!(marshaller.allocator().live_allocations(), 0);
    }

    #[test]
    fn any_byte_string_widens(input in prop::collection::vec(any::<u8>(), 1..128)) {
        let mut marshaller = StringMarshaller::with_config(MemoryConfig::default()).unwrap();
        let allocation = marshaller.serialize_latin1(&input).unwrap().decode().unwrap();
        let units = marshaller.deserialize_units(allocation).unwrap();
        let expected: Vec<u16> = input.iter().map(|&b| u16::from(b)).collect();
        prop_assert_eq!(units, expected);
    }
}
