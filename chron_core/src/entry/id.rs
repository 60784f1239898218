// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry identity types.

use core::fmt;

/// Sentinel value indicating "no entry" or "no slot" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to an entry in a [`LifetimeManager`](crate::manager::LifetimeManager).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an entry is removed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter — must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl EntryId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({}@gen{})", self.idx, self.generation)
    }
}

/// The registration-order identity of a tracked entry.
///
/// Assigned strictly increasingly when an entry is registered and never
/// reused, unlike slot indices. Its only job is to break ties between
/// entries sharing a boundary position, so that sweep processing order is
/// deterministic across runs.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceId(pub(crate) u64);

impl SequenceId {
    /// The identity of an entry that is not currently registered.
    pub(crate) const NONE: Self = Self(0);
}

impl fmt::Debug for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequenceId({})", self.0)
    }
}
