//! Scoped ownership of a marshalled region

use tracing::warn;

use crate::core::allocation::AllocationRef;
use crate::core::marshal::StringMarshaller;
use crate::error::Result;
use crate::memory::Allocator;

/// A region owned by the current scope, released on drop
pub struct OwnedRegion<'m, A: Allocator> {
    marshaller: &'m mut StringMarshaller<A>,
    allocation: AllocationRef,
    armed: bool,
}

impl<'m, A: Allocator> OwnedRegion<'m, A> {
    pub(crate) fn new(marshaller: &'m mut StringMarshaller<A>, allocation: AllocationRef) -> Self {
        Self {
            marshaller,
            allocation,
            armed: true,
        }
    }

    pub fn allocation(&self) -> AllocationRef {
        self.allocation
    }

    /// Narrow read, see [`StringMarshaller::deserialize`]
    pub fn read(&self) -> Result<String> {
        self.marshaller.deserialize(self.allocation)
    }

    /// Wide read, see [`StringMarshaller::deserialize_utf16`]
    pub fn read_utf16(&self) -> Result<String> {
        self.marshaller.deserialize_utf16(self.allocation)
    }

    /// Release now and report the allocator's verdict
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        self.marshaller.free(self.allocation.offset() as u32)
    }

    /// Give up ownership without releasing
    pub fn into_raw(mut self) -> AllocationRef {
        self.armed = false;
        self.allocation
    }
}

impl<A: Allocator> Drop for OwnedRegion<'_, A> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let offset = self.allocation.offset() as u32;
        if let Err(err) = self.marshaller.free(offset) {
            warn!(offset, %err, "failed to release owned region");
        }
    }
}

impl<A: Allocator> std::fmt::Debug for OwnedRegion<'_, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedRegion")
            .field("allocation", &self.allocation)
            .field("armed", &self.armed)
            .finish()
    }
}
