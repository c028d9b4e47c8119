//! Walks one string across the boundary and back, plus an error sentinel.

use boundary_memory::{AllocationRef, EncodedAllocation, ErrorCode, MemoryConfig, StringMarshaller};

fn main() -> anyhow::Result<()> {
    let mut marshaller = StringMarshaller::with_config(MemoryConfig::default())?;

    let word = marshaller.serialize("hello, host")?;
    println!("encoded word: {:#010x} ({word:?})", word.bits());
    println!("check: {}", word.check());

    let allocation = AllocationRef::try_from(word)?;
    let region = marshaller.claim(allocation);
    println!("read back: {:?}", region.read()?);
    drop(region);
    println!(
        "live allocations after drop: {}",
        marshaller.allocator().live_allocations()
    );

    let sentinel = EncodedAllocation::from_error(ErrorCode::CALLBACK_FAILED);
    println!("sentinel word: {:#010x} -> {}", sentinel.bits(), sentinel.check());
    if let Err(err) = marshaller.deserialize_word(sentinel.bits()) {
        println!("refused: {err}");
    }

    Ok(())
}
