// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays entry storage with allocation and bookkeeping fields.

use alloc::vec::Vec;

use crate::interval::{LifetimeInterval, LifetimeState};

use super::id::{EntryId, INVALID, SequenceId};

/// Struct-of-arrays storage for all tracked entries.
///
/// Entries are addressed by [`EntryId`] handles. Internally, each entry
/// occupies a slot in parallel arrays. Removed entries are recycled via a
/// free list, and generation counters prevent stale handle access.
///
/// The store holds only the entry records; which partition holds an entry is
/// the manager's business. The `queued` and `active_slot` arrays are the
/// bookkeeping the partitions need for O(1) membership updates.
#[derive(Debug)]
pub(crate) struct EntryStore {
    // -- Bounds (set by callers via the manager) --
    pub(crate) start: Vec<f64>,
    pub(crate) end: Vec<f64>,

    // -- Classification bookkeeping (written by sweeps) --
    pub(crate) state: Vec<LifetimeState>,
    /// Registration-order tie-break identity; `SequenceId::NONE` when free.
    pub(crate) sequence: Vec<SequenceId>,
    /// Whether the entry sits in the pending partition awaiting
    /// re-evaluation.
    pub(crate) queued: Vec<bool>,
    /// Position in the manager's active list, or [`INVALID`].
    pub(crate) active_slot: Vec<u32>,

    // -- Allocation --
    generation: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
    live: u32,
    next_sequence: u64,
}

impl EntryStore {
    /// Creates an empty store.
    pub(crate) const fn new() -> Self {
        Self {
            start: Vec::new(),
            end: Vec::new(),
            state: Vec::new(),
            sequence: Vec::new(),
            queued: Vec::new(),
            active_slot: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            live: 0,
            next_sequence: 0,
        }
    }

    /// Allocates a slot for a new entry and returns its handle.
    ///
    /// The entry starts in state [`LifetimeState::New`] with `queued` set,
    /// matching its placement in the pending partition.
    pub(crate) fn insert(&mut self, interval: LifetimeInterval) -> EntryId {
        self.next_sequence += 1;
        let sequence = SequenceId(self.next_sequence);

        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.start[idx as usize] = interval.start();
            self.end[idx as usize] = interval.end();
            self.state[idx as usize] = LifetimeState::New;
            self.sequence[idx as usize] = sequence;
            self.queued[idx as usize] = true;
            self.active_slot[idx as usize] = INVALID;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.start.push(interval.start());
            self.end.push(interval.end());
            self.state.push(LifetimeState::New);
            self.sequence.push(sequence);
            self.queued.push(true);
            self.active_slot.push(INVALID);
            self.generation.push(0);
            idx
        };

        self.live += 1;

        EntryId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Releases an entry's slot for reuse and clears its identity.
    ///
    /// The handle must be live; callers check with [`is_alive`](Self::is_alive)
    /// first.
    pub(crate) fn release(&mut self, id: EntryId) {
        self.validate(id);
        let idx = id.idx;

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.sequence[idx as usize] = SequenceId::NONE;
        self.queued[idx as usize] = false;
        self.active_slot[idx as usize] = INVALID;

        self.free_list.push(idx);
        self.live -= 1;
    }

    /// Releases every live entry at once, without touching partitions.
    pub(crate) fn clear(&mut self) {
        for idx in 0..self.len {
            if self.sequence[idx as usize] != SequenceId::NONE {
                self.generation[idx as usize] += 1;
                self.sequence[idx as usize] = SequenceId::NONE;
                self.queued[idx as usize] = false;
                self.active_slot[idx as usize] = INVALID;
                self.free_list.push(idx);
            }
        }
        self.live = 0;
    }

    /// Returns whether the given handle refers to a live entry.
    #[must_use]
    pub(crate) fn is_alive(&self, id: EntryId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live entries.
    #[must_use]
    pub(crate) const fn live(&self) -> u32 {
        self.live
    }

    /// Returns the interval stored at a live slot.
    #[must_use]
    pub(crate) fn interval_at(&self, idx: u32) -> LifetimeInterval {
        LifetimeInterval::new(self.start[idx as usize], self.end[idx as usize])
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: EntryId) {
        assert!(
            self.is_alive(id),
            "stale EntryId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
