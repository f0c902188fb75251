/// Typed generational handles.
///
/// A `Ref<R>` packs a slot index (low 32 bits) and the slot generation
/// observed at allocation time (high 32 bits) into one `u64`. The record type
/// `R` is phantom: it keeps handles of different resource kinds apart without
/// constraining what the handle itself can do.
///
/// `u64::MAX` is reserved as the invalid sentinel. Tables never hold more
/// than `u32::MAX` slots, so index `u32::MAX` is never issued and the
/// sentinel cannot collide with a live handle.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

const INDEX_BITS: u32 = 32;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Handle to a record stored in a [`RefArray`](crate::pool::RefArray)
pub struct Ref<R> {
    raw: u64,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Ref<R> {
    /// Handle that never refers to a resource
    pub const INVALID: Self = Self::from_raw(u64::MAX);

    /// Pack an index and a generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self::from_raw(((generation as u64) << INDEX_BITS) | index as u64)
    }

    /// Rebuild a handle from its packed representation
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// Packed representation (stable, suitable for GPU/FFI tables)
    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.raw
    }

    /// Slot index
    #[inline]
    pub const fn index(self) -> u32 {
        (self.raw & INDEX_MASK) as u32
    }

    /// Slot generation at allocation time
    #[inline]
    pub const fn generation(self) -> u32 {
        (self.raw >> INDEX_BITS) as u32
    }

    /// Whether this is anything other than the invalid sentinel.
    ///
    /// A handle that is not the sentinel may still be stale; only the owning
    /// table can tell.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.raw != u64::MAX
    }

    /// Reinterpret the handle for another record type
    #[inline]
    pub const fn cast<U>(self) -> Ref<U> {
        Ref::from_raw(self.raw)
    }
}

// Manual impls: deriving would add `R: Trait` bounds

impl<R> Clone for Ref<R> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Ref<R> {}

impl<R> PartialEq for Ref<R> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<R> Eq for Ref<R> {}

impl<R> Hash for Ref<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<R> Default for Ref<R> {
    fn default() -> Self {
        Self::INVALID
    }
}

impl<R> fmt::Debug for Ref<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.debug_struct("Ref")
                .field("index", &self.index())
                .field("generation", &self.generation())
                .finish()
        } else {
            f.write_str("Ref(INVALID)")
        }
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
