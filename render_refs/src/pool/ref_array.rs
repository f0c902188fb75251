//! Fixed-capacity slot table with generation-checked handles.
//!
//! A `RefArray<R>` owns `capacity` slots, each holding an `R` inline. Slots
//! are handed out through [`Ref<R>`] handles carrying the slot generation at
//! allocation time; freeing a slot bumps its generation so every handle issued
//! before the free is rejected from then on, even after the slot is reused.
//!
//! The free-list is a stack (LIFO): the most recently freed slot is reused
//! first. It is seeded so that fresh slots come out in ascending index order.
//!
//! Generations never wrap. A slot freed at generation `u32::MAX` is retired:
//! it stays free forever and is not pushed back on the free-list, so no
//! handle can ever match it again.
//!
//! # Example
//!
//! ```
//! use render_refs::refs::RefArray;
//!
//! let mut table: RefArray<u32> = RefArray::new(2)?;
//! let a = table.allocate()?;               // index 0, generation 0
//! *table.get_mut(a)? = 7;
//! table.free(a)?;                          // slot 0 -> generation 1
//! assert!(table.get(a).is_err());          // stale
//! let b = table.allocate()?;               // index 0, generation 1
//! assert_eq!((b.index(), b.generation()), (0, 1));
//! # Ok::<(), render_refs::refs::RefsError>(())
//! ```

use crate::error::{RefsError, RefsResult};
use super::handle::Ref;

/// Largest number of slots a table can hold
pub const MAX_CAPACITY: usize = u32::MAX as usize;

/// One entry of the table
#[derive(Debug)]
struct Slot<R> {
    occupied: bool,
    generation: u32,
    record: R,
}

/// Fixed-capacity, generation-checked slot table
#[derive(Debug)]
pub struct RefArray<R> {
    slots: Vec<Slot<R>>,
    /// Stack of free slot indices; the top is the next one handed out
    free_list: Vec<u32>,
    live: u32,
    /// Slots that ran out of generations
    retired: u32,
}

impl<R: Default> RefArray<R> {
    /// Create a table of `capacity` free slots, all at generation 0
    ///
    /// # Errors
    ///
    /// - `RefsError::InvalidCapacity` if `capacity` is 0 or above [`MAX_CAPACITY`]
    /// - `RefsError::OutOfMemory` if the slot storage cannot be reserved
    pub fn new(capacity: usize) -> RefsResult<Self> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(RefsError::InvalidCapacity(capacity));
        }

        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity).map_err(|_| RefsError::OutOfMemory)?;
        let mut free_list = Vec::new();
        free_list.try_reserve_exact(capacity).map_err(|_| RefsError::OutOfMemory)?;

        slots.extend((0..capacity).map(|_| Slot {
            occupied: false,
            generation: 0,
            record: R::default(),
        }));
        // Highest index at the bottom so index 0 is popped first
        free_list.extend((0..capacity as u32).rev());

        Ok(Self {
            slots,
            free_list,
            live: 0,
            retired: 0,
        })
    }

    /// Reserve a free slot and return a handle to it
    ///
    /// The slot's record is `R::default()`. The generation is left as is; it
    /// only changes on free.
    ///
    /// # Errors
    ///
    /// `RefsError::PoolExhausted` if no slot is free. The table is left unchanged.
    pub fn allocate(&mut self) -> RefsResult<Ref<R>> {
        let index = match self.free_list.pop() {
            Some(index) => index,
            None => return Err(RefsError::PoolExhausted { capacity: self.capacity() }),
        };

        let slot = &mut self.slots[index as usize];
        debug_assert!(!slot.occupied, "free-list held occupied slot {}", index);
        slot.occupied = true;
        self.live += 1;

        Ok(Ref::new(index, slot.generation))
    }

    /// Release a live slot
    ///
    /// Marks the slot free, drops its record (a fresh `R::default()` takes its
    /// place), bumps its generation and pushes its index on the free-list. A
    /// slot already at generation `u32::MAX` is retired instead of recycled.
    ///
    /// # Errors
    ///
    /// `RefsError::StaleOrInvalidHandle` if the handle is not live (including a
    /// second free of the same handle). The free-list is not touched.
    pub fn free(&mut self, handle: Ref<R>) -> RefsResult<()> {
        let slot = self.slot_mut(handle)?;
        slot.occupied = false;
        slot.record = R::default();
        let next_generation = slot.generation.checked_add(1);
        if let Some(generation) = next_generation {
            slot.generation = generation;
        }

        self.live -= 1;
        match next_generation {
            Some(_) => self.free_list.push(handle.index()),
            None => self.retired += 1,
        }
        Ok(())
    }
}

impl<R> RefArray<R> {
    fn slot(&self, handle: Ref<R>) -> RefsResult<&Slot<R>> {
        match self.slots.get(handle.index() as usize) {
            Some(slot) if slot.occupied && slot.generation == handle.generation() => Ok(slot),
            _ => Err(stale(handle)),
        }
    }

    fn slot_mut(&mut self, handle: Ref<R>) -> RefsResult<&mut Slot<R>> {
        match self.slots.get_mut(handle.index() as usize) {
            Some(slot) if slot.occupied && slot.generation == handle.generation() => Ok(slot),
            _ => Err(stale(handle)),
        }
    }

    /// Borrow the record behind a live handle
    ///
    /// # Errors
    ///
    /// `RefsError::StaleOrInvalidHandle` if the index is out of range, the slot is
    /// free, or the generation does not match.
    pub fn get(&self, handle: Ref<R>) -> RefsResult<&R> {
        self.slot(handle).map(|slot| &slot.record)
    }

    /// Mutably borrow the record behind a live handle
    ///
    /// # Errors
    ///
    /// Same as [`get`](Self::get).
    pub fn get_mut(&mut self, handle: Ref<R>) -> RefsResult<&mut R> {
        self.slot_mut(handle).map(|slot| &mut slot.record)
    }

    /// Release the table storage
    ///
    /// No per-slot teardown happens here. Returns the number of slots that were
    /// still occupied, which callers should treat as leaked resources.
    pub fn destroy(self) -> usize {
        self.live as usize
    }

    /// Whether `handle` refers to a live slot
    pub fn is_valid(&self, handle: Ref<R>) -> bool {
        self.slot(handle).is_ok()
    }

    /// Fixed number of slots
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Number of occupied slots
    pub fn len(&self) -> u32 {
        self.live
    }

    /// Whether no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Whether no slot can be handed out
    pub fn is_full(&self) -> bool {
        self.free_list.is_empty()
    }

    /// Number of free slots that can still be handed out
    pub fn free_count(&self) -> u32 {
        self.free_list.len() as u32
    }

    /// Number of slots retired after exhausting their generations
    pub fn retired_count(&self) -> u32 {
        self.retired
    }

    /// Free slot indices in pop order (next handed out first)
    pub fn free_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.free_list.iter().rev().copied()
    }

    /// Iterate over live slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (Ref<R>, &R)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.occupied)
            .map(|(index, slot)| (Ref::new(index as u32, slot.generation), &slot.record))
    }

    /// Handles of all live slots in index order
    pub fn handles(&self) -> Vec<Ref<R>> {
        self.iter().map(|(handle, _)| handle).collect()
    }
}

fn stale<R>(handle: Ref<R>) -> RefsError {
    RefsError::StaleOrInvalidHandle {
        index: handle.index(),
        generation: handle.generation(),
    }
}

#[cfg(test)]
#[path = "ref_array_tests.rs"]
mod tests;
