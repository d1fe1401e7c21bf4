//! Slot Table - Storage behind the live set
//!
//! Objects live in a vector of entries indexed by `Handle::index`. Released
//! entries go on a free list and have their generation bumped, so the next
//! object placed there gets a handle that differs from every earlier one.
//! An entry whose generation is exhausted is retired instead of reused.

use crate::object::{Handle, Object};

/// One live object plus its collector-owned metadata
pub(crate) struct Slot {
    pub object: Box<dyn Object>,
    /// Bytes charged to accounting at allocation time
    pub size: usize,
    /// Mark bit, only touched by the collector
    pub marked: bool,
}

impl Slot {
    pub fn new(object: Box<dyn Object>, size: usize) -> Self {
        Self {
            object,
            size,
            marked: false,
        }
    }
}

struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

/// Generation-checked slot storage with a free list
pub(crate) struct SlotTable {
    entries: Vec<Entry>,
    free: Vec<u32>,
    live: usize,
    retired: usize,
}

impl SlotTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
            retired: 0,
        }
    }

    /// Store a slot and return its handle
    ///
    /// Returns `None` when the table cannot grow; the slot is dropped.
    pub fn insert(&mut self, slot: Slot) -> Option<Handle> {
        if let Some(index) = self.free.pop() {
            let entry = &mut self.entries[index as usize];
            debug_assert!(entry.slot.is_none(), "free list entry still occupied");
            entry.slot = Some(slot);
            self.live += 1;
            return Some(Handle::new(index, entry.generation));
        }

        let index = u32::try_from(self.entries.len()).ok()?;
        self.entries.try_reserve(1).ok()?;
        self.entries.push(Entry {
            generation: 0,
            slot: Some(slot),
        });
        self.live += 1;
        Some(Handle::new(index, 0))
    }

    /// Take the slot out of the table, invalidating `handle`
    pub fn remove(&mut self, handle: Handle) -> Option<Slot> {
        let entry = self.entries.get_mut(handle.index() as usize)?;
        if entry.generation != handle.generation() {
            return None;
        }

        let slot = entry.slot.take()?;
        self.live -= 1;
        match entry.generation.checked_add(1) {
            Some(next) => {
                entry.generation = next;
                self.free.push(handle.index());
            },
            // Retired: a wrapped generation would revive old handles
            None => self.retired += 1,
        }
        Some(slot)
    }

    #[inline]
    pub fn get(&self, handle: Handle) -> Option<&Slot> {
        self.entries
            .get(handle.index() as usize)
            .filter(|entry| entry.generation == handle.generation())
            .and_then(|entry| entry.slot.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        self.entries
            .get_mut(handle.index() as usize)
            .filter(|entry| entry.generation == handle.generation())
            .and_then(|entry| entry.slot.as_mut())
    }

    /// Live slots in index order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &Slot)> + '_ {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .slot
                .as_ref()
                .map(|slot| (Handle::new(index as u32, entry.generation), slot))
        })
    }

    /// Number of live slots
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Total entries, live or free
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Entries whose generation ran out; never handed out again
    pub fn retired_slots(&self) -> usize {
        self.retired
    }
}
