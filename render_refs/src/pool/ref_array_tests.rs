use super::*;
use std::collections::HashSet;

#[derive(Debug, Default, Clone, PartialEq)]
struct Record {
    value: u32,
}

fn table(capacity: usize) -> RefArray<Record> {
    RefArray::new(capacity).unwrap()
}

/// Free-list holds no duplicates and no occupied index; every slot is
/// either live, free or retired
fn assert_free_list_consistent(table: &RefArray<Record>) {
    let free: Vec<u32> = table.free_indices().collect();
    let unique: HashSet<u32> = free.iter().copied().collect();
    assert_eq!(free.len(), unique.len(), "duplicate free-list entry: {:?}", free);

    let live: HashSet<u32> = table.handles().iter().map(|h| h.index()).collect();
    assert!(unique.is_disjoint(&live), "free-list holds a live slot");
    assert_eq!(
        free.len() + live.len() + table.retired_count() as usize,
        table.capacity() as usize
    );
}

// ============================================================================
// Creation tests
// ============================================================================

#[test]
fn test_new_is_empty() {
    let table = table(4);
    assert_eq!(table.capacity(), 4);
    assert_eq!(table.len(), 0);
    assert_eq!(table.free_count(), 4);
    assert!(table.is_empty());
    assert!(!table.is_full());
    assert_eq!(table.free_indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn test_zero_capacity_rejected() {
    let result = RefArray::<Record>::new(0);
    assert_eq!(result.unwrap_err(), RefsError::InvalidCapacity(0));
}

#[test]
fn test_oversized_capacity_rejected() {
    if let Some(too_big) = MAX_CAPACITY.checked_add(1) {
        let result = RefArray::<Record>::new(too_big);
        assert_eq!(result.unwrap_err(), RefsError::InvalidCapacity(too_big));
    }
}

// ============================================================================
// Allocation tests
// ============================================================================

#[test]
fn test_sequential_allocate() {
    let mut table = table(3);
    for expected in 0..3 {
        let handle = table.allocate().unwrap();
        assert_eq!(handle.index(), expected);
        assert_eq!(handle.generation(), 0);
    }
    assert!(table.is_full());
}

#[test]
fn test_allocate_yields_default_record() {
    let mut table = table(1);
    let a = table.allocate().unwrap();
    table.get_mut(a).unwrap().value = 42;
    table.free(a).unwrap();

    let b = table.allocate().unwrap();
    assert_eq!(table.get(b).unwrap(), &Record::default());
}

#[test]
fn test_exhaustion_leaves_state_unchanged() {
    let mut table = table(2);
    let a = table.allocate().unwrap();
    let b = table.allocate().unwrap();

    assert_eq!(table.allocate(), Err(RefsError::PoolExhausted { capacity: 2 }));
    assert_eq!(table.len(), 2);
    assert_eq!(table.free_count(), 0);
    assert!(table.is_valid(a));
    assert!(table.is_valid(b));
    assert_free_list_consistent(&table);
}

// ============================================================================
// Get / validation tests
// ============================================================================

#[test]
fn test_get_live_handle() {
    let mut table = table(2);
    let a = table.allocate().unwrap();
    table.get_mut(a).unwrap().value = 7;
    assert_eq!(table.get(a).unwrap().value, 7);
}

#[test]
fn test_get_rejects_invalid_sentinel() {
    let table = table(2);
    assert_eq!(
        table.get(Ref::INVALID),
        Err(RefsError::StaleOrInvalidHandle { index: u32::MAX, generation: u32::MAX })
    );
}

#[test]
fn test_get_rejects_out_of_range_index() {
    let table = table(2);
    assert!(table.get(Ref::new(2, 0)).is_err());
}

#[test]
fn test_get_rejects_free_slot() {
    let table = table(2);
    // Slot 0 at generation 0 exists but was never allocated
    assert!(table.get(Ref::new(0, 0)).is_err());
}

#[test]
fn test_get_rejects_wrong_generation() {
    let mut table = table(2);
    let a = table.allocate().unwrap();
    assert!(table.get(Ref::new(a.index(), a.generation() + 1)).is_err());
}

// ============================================================================
// Free and recycle tests
// ============================================================================

#[test]
fn test_free_bumps_generation() {
    let mut table = table(2);
    let a = table.allocate().unwrap();
    table.free(a).unwrap();

    let b = table.allocate().unwrap();
    assert_eq!(b.index(), a.index());
    assert_eq!(b.generation(), a.generation() + 1);
    assert_ne!(a, b);
}

#[test]
fn test_stale_handle_after_reuse() {
    let mut table = table(1);
    let a = table.allocate().unwrap();
    table.get_mut(a).unwrap().value = 1;
    table.free(a).unwrap();

    let b = table.allocate().unwrap();
    table.get_mut(b).unwrap().value = 2;

    assert!(table.get(a).is_err());
    assert!(table.get_mut(a).is_err());
    assert_eq!(table.get(b).unwrap().value, 2);
}

#[test]
fn test_double_free_rejected() {
    let mut table = table(3);
    let a = table.allocate().unwrap();
    let _b = table.allocate().unwrap();

    table.free(a).unwrap();
    assert_eq!(
        table.free(a),
        Err(RefsError::StaleOrInvalidHandle { index: a.index(), generation: a.generation() })
    );
    assert_eq!(table.len(), 1);
    assert_eq!(table.free_count(), 2);
    assert_free_list_consistent(&table);
}

#[test]
fn test_free_foreign_handle_rejected() {
    let mut table = table(2);
    let _a = table.allocate().unwrap();
    assert!(table.free(Ref::new(1, 0)).is_err());
    assert!(table.free(Ref::new(9, 0)).is_err());
    assert!(table.free(Ref::INVALID).is_err());
    assert_free_list_consistent(&table);
}

#[test]
fn test_free_list_is_lifo() {
    // Free list is a stack: last freed = first recycled
    let mut table = table(4);
    let a = table.allocate().unwrap(); // 0
    let _b = table.allocate().unwrap(); // 1
    let c = table.allocate().unwrap(); // 2
    table.free(a).unwrap();
    table.free(c).unwrap();

    assert_eq!(table.allocate().unwrap().index(), 2);
    assert_eq!(table.allocate().unwrap().index(), 0);
    // Recycled slots exhausted, next is the lowest never-used index
    assert_eq!(table.allocate().unwrap().index(), 3);
}

#[test]
fn test_last_generation_is_still_recycled() {
    let mut table = table(1);
    table.slots[0].generation = u32::MAX - 1;

    let a = table.allocate().unwrap();
    table.free(a).unwrap();

    let b = table.allocate().unwrap();
    assert_eq!((b.index(), b.generation()), (0, u32::MAX));
    assert!(b.is_valid());
    assert!(table.get(a).is_err());
    assert_eq!(table.retired_count(), 0);
}

#[test]
fn test_slot_retired_instead_of_wrapping() {
    let mut table = table(2);
    table.slots[0].generation = u32::MAX;

    let old = table.allocate().unwrap();
    assert_eq!((old.index(), old.generation()), (0, u32::MAX));
    table.free(old).unwrap();

    // Slot 0 is never handed out again, so no generation-0 handle can alias it
    assert_eq!(table.retired_count(), 1);
    assert_eq!(table.free_count(), 1);
    assert!(table.get(old).is_err());
    assert!(table.get(Ref::new(0, 0)).is_err());
    assert_free_list_consistent(&table);

    let next = table.allocate().unwrap();
    assert_eq!(next.index(), 1);
    assert!(table.is_full());
    assert_eq!(table.allocate(), Err(RefsError::PoolExhausted { capacity: 2 }));
    assert_eq!(table.free(old), Err(RefsError::StaleOrInvalidHandle { index: 0, generation: u32::MAX }));
}

// ============================================================================
// Iteration
// ============================================================================

#[test]
fn test_iter_visits_live_slots_in_index_order() {
    let mut table = table(4);
    let handles: Vec<_> = (0..4).map(|_| table.allocate().unwrap()).collect();
    for (i, handle) in handles.iter().enumerate() {
        table.get_mut(*handle).unwrap().value = i as u32 * 10;
    }
    table.free(handles[1]).unwrap();

    let seen: Vec<(u32, u32)> = table.iter().map(|(h, r)| (h.index(), r.value)).collect();
    assert_eq!(seen, vec![(0, 0), (2, 20), (3, 30)]);
    assert_eq!(table.handles(), vec![handles[0], handles[2], handles[3]]);
}

#[test]
fn test_destroy_reports_live_slots() {
    let mut table = table(3);
    let a = table.allocate().unwrap();
    let _b = table.allocate().unwrap();
    table.free(a).unwrap();
    assert_eq!(table.destroy(), 1);
}

// ============================================================================
// Stress / pattern tests
// ============================================================================

#[test]
fn test_churn_keeps_invariants() {
    let mut table = table(32);
    let mut live: Vec<Ref<Record>> = Vec::new();
    let mut dead: Vec<Ref<Record>> = Vec::new();

    // Deterministic pseudo-random allocate/free sequence
    let mut seed: u32 = 0x1234_5678;
    for step in 0..2000u32 {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        let allocate = (seed >> 16) % 3 != 0;

        if allocate && !table.is_full() {
            let handle = table.allocate().unwrap();
            table.get_mut(handle).unwrap().value = step;
            live.push(handle);
        } else if !live.is_empty() {
            let victim = live.swap_remove((seed as usize >> 8) % live.len());
            table.free(victim).unwrap();
            dead.push(victim);
        }

        assert_eq!(table.len() as usize, live.len());
    }

    for handle in &live {
        assert!(table.get(*handle).is_ok());
    }
    for handle in &dead {
        assert!(table.get(*handle).is_err());
    }
    assert_free_list_consistent(&table);
}

#[test]
fn test_live_handles_are_unique() {
    let mut table = table(50);
    let mut seen = HashSet::new();
    for _ in 0..50 {
        seen.insert(table.allocate().unwrap());
    }
    let to_free: Vec<_> = seen.iter().copied().take(10).collect();
    for handle in to_free {
        table.free(handle).unwrap();
        seen.remove(&handle);
    }
    for _ in 0..10 {
        let handle = table.allocate().unwrap();
        assert!(seen.insert(handle), "duplicate handle: {:?}", handle);
    }
    assert_eq!(seen.len(), 50);
}
