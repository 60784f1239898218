// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The membership index: partitions, sweeps, and the event queue.
//!
//! [`LifetimeManager`] tracks every registered entry in exactly one of four
//! partitions:
//!
//! - **pending** — newly added entries and entries whose bounds changed
//!   since the last sweep, in insertion order;
//! - **future** — entries ahead of the window, ordered by
//!   `(start, sequence)`;
//! - **active** — entries overlapping the window, unordered;
//! - **past** — entries behind the window, ordered by `(end, sequence)`.
//!
//! [`update`](LifetimeManager::update) performs one sweep. Because the
//! future partition is ordered by start and the past partition by end, the
//! only entries that can change classification when the window moves sit at
//! a sorted extremity, so each sweep visits the handful of entries actually
//! crossing a boundary rather than rescanning the whole set.
//!
//! Activation callbacks fire inline with relocation; boundary crossings are
//! queued and drained FIFO after the partitions settle, so crossing
//! consumers can freely retarget entries' bounds. A bounds change made from
//! inside a callback relocates the entry to the pending partition and
//! defers its full re-evaluation to the next sweep.

use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::mem;

use crate::entry::{EntryId, EntryStore, INVALID, SequenceId};
use crate::events::{BoundaryCrossing, crossings};
use crate::interval::{LifetimeInterval, LifetimeState, SweepWindow};
use crate::listener::{LifetimeListener, NoopListener};

/// Sort key for the future and past partitions.
///
/// `position` is the entry's start (future partition) or end (past
/// partition). Sequences are unique, so the ordering is total and the
/// carried `entry` handle never participates in comparisons.
#[derive(Clone, Copy, Debug)]
struct BoundaryKey {
    position: f64,
    sequence: SequenceId,
    entry: EntryId,
}

impl Ord for BoundaryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.position
            .total_cmp(&other.position)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for BoundaryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BoundaryKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BoundaryKey {}

fn start_key(entries: &EntryStore, id: EntryId) -> BoundaryKey {
    let idx = id.idx as usize;
    BoundaryKey {
        position: entries.start[idx],
        sequence: entries.sequence[idx],
        entry: id,
    }
}

fn end_key(entries: &EntryStore, id: EntryId) -> BoundaryKey {
    let idx = id.idx as usize;
    BoundaryKey {
        position: entries.end[idx],
        sequence: entries.sequence[idx],
        entry: id,
    }
}

/// Writes new bounds onto an entry, relocating it to the pending partition
/// first if it currently rests in a sorted partition.
///
/// The removal is keyed by the entry's old bounds, so it must happen before
/// the write; a sorted partition must never hold an entry whose key fields
/// have moved under it.
fn write_bounds(
    entries: &mut EntryStore,
    pending: &mut Vec<EntryId>,
    future: &mut BTreeSet<BoundaryKey>,
    past: &mut BTreeSet<BoundaryKey>,
    id: EntryId,
    start: f64,
    end: f64,
) {
    entries.validate(id);
    let idx = id.idx as usize;
    let interval = LifetimeInterval::new(start, end);
    if interval.start() == entries.start[idx] && interval.end() == entries.end[idx] {
        return;
    }

    let state = entries.state[idx];
    if !entries.queued[idx] {
        match state {
            LifetimeState::Future => {
                let removed = future.remove(&start_key(entries, id));
                debug_assert!(removed, "future partition lost an entry");
                entries.queued[idx] = true;
                pending.push(id);
            }
            LifetimeState::Past => {
                let removed = past.remove(&end_key(entries, id));
                debug_assert!(removed, "past partition lost an entry");
                entries.queued[idx] = true;
                pending.push(id);
            }
            // Pending entries are already queued; active entries are
            // rescanned every sweep anyway.
            LifetimeState::New | LifetimeState::Current => {}
        }
    }

    entries.start[idx] = interval.start();
    entries.end[idx] = interval.end();
}

/// Counters describing the most recent sweep.
///
/// `considered` counts classification checks (the work a sweep performed);
/// `relocated` counts entries whose classification actually changed. Both
/// stay small on every sweep when the sorted partitions are doing their
/// job, no matter how many entries are tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Monotonic sweep counter, starting at 1 for the first update.
    pub sweep_index: u64,
    /// Entries whose classification was checked this sweep.
    pub considered: u32,
    /// Entries that changed classification this sweep.
    pub relocated: u32,
    /// Entries that entered the active partition.
    pub activated: u32,
    /// Entries that left the active partition.
    pub deactivated: u32,
    /// Boundary crossings queued this sweep.
    pub crossings: u32,
    /// Size of the active partition after the sweep.
    pub active_len: u32,
}

impl SweepStats {
    /// Returns whether the sweep changed active-partition membership.
    #[must_use]
    pub const fn membership_changed(&self) -> bool {
        self.activated > 0 || self.deactivated > 0
    }
}

/// The mutation surface handed to listener callbacks.
///
/// Callbacks run while a sweep (or a synchronous removal) is in progress,
/// so they get this narrow view instead of the manager itself: bounds may
/// be retargeted on any live entry — including the entry the callback is
/// about — and the affected entry is simply re-evaluated from scratch on
/// the next sweep. Registration and removal are not available mid-callback.
#[derive(Debug)]
pub struct SweepContext<'a> {
    entries: &'a mut EntryStore,
    pending: &'a mut Vec<EntryId>,
    future: &'a mut BTreeSet<BoundaryKey>,
    past: &'a mut BTreeSet<BoundaryKey>,
}

impl SweepContext<'_> {
    /// Writes new bounds onto an entry, clamping `end` up to `start`.
    ///
    /// If the entry rests in a sorted partition it is relocated to the
    /// pending partition for re-evaluation on the next sweep. Writing
    /// identical bounds is a complete no-op.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_bounds(&mut self, id: EntryId, start: f64, end: f64) {
        write_bounds(
            self.entries,
            self.pending,
            self.future,
            self.past,
            id,
            start,
            end,
        );
    }

    /// Returns the interval of a live entry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn interval(&self, id: EntryId) -> LifetimeInterval {
        self.entries.validate(id);
        self.entries.interval_at(id.idx)
    }

    /// Returns the classification of a live entry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn state(&self, id: EntryId) -> LifetimeState {
        self.entries.validate(id);
        self.entries.state[id.idx as usize]
    }

    /// Returns whether the given handle refers to a live entry.
    #[must_use]
    pub fn is_alive(&self, id: EntryId) -> bool {
        self.entries.is_alive(id)
    }
}

/// Tracks which entries overlap a moving time window and notifies a
/// listener when membership changes.
///
/// Strictly single-threaded and frame-synchronous: the owning subsystem
/// calls [`update`](Self::update) once per frame with the current window,
/// and may register, remove, or retarget entries freely between updates.
pub struct LifetimeManager<L = NoopListener> {
    entries: EntryStore,
    pending: Vec<EntryId>,
    future: BTreeSet<BoundaryKey>,
    past: BTreeSet<BoundaryKey>,
    active: Vec<EntryId>,
    queue: VecDeque<BoundaryCrossing>,
    listener: L,
    stats: SweepStats,
}

impl<L> fmt::Debug for LifetimeManager<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeManager")
            .field("live", &self.entries.live())
            .field("pending", &self.pending.len())
            .field("future", &self.future.len())
            .field("active", &self.active.len())
            .field("past", &self.past.len())
            .finish_non_exhaustive()
    }
}

impl<L: LifetimeListener + Default> Default for LifetimeManager<L> {
    fn default() -> Self {
        Self::new(L::default())
    }
}

impl<L: LifetimeListener> LifetimeManager<L> {
    /// Creates an empty manager that reports to `listener`.
    #[must_use]
    pub fn new(listener: L) -> Self {
        Self {
            entries: EntryStore::new(),
            pending: Vec::new(),
            future: BTreeSet::new(),
            past: BTreeSet::new(),
            active: Vec::new(),
            queue: VecDeque::new(),
            listener,
            stats: SweepStats::default(),
        }
    }

    // -- Registration API --

    /// Registers a new entry and returns its handle.
    ///
    /// The entry starts in state [`LifetimeState::New`] in the pending
    /// partition; it is classified by the next sweep.
    pub fn add(&mut self, interval: LifetimeInterval) -> EntryId {
        let id = self.entries.insert(interval);
        self.pending.push(id);
        id
    }

    /// Unregisters an entry, returning whether it was tracked.
    ///
    /// A currently active entry receives
    /// [`on_become_inactive`](LifetimeListener::on_become_inactive)
    /// synchronously before the removal completes, so the consumer can
    /// release state tied to it without waiting for a sweep. Stale handles
    /// are a no-op reported as `false`.
    pub fn remove(&mut self, id: EntryId) -> bool {
        if !self.entries.is_alive(id) {
            return false;
        }
        let idx = id.idx as usize;
        let state = self.entries.state[idx];
        let queued = self.entries.queued[idx];
        match state {
            LifetimeState::Current => {
                self.detach_active(id);
                let (listener, mut ctx) = self.parts();
                listener.on_become_inactive(id, &mut ctx);
            }
            LifetimeState::Future if !queued => {
                let removed = self.future.remove(&start_key(&self.entries, id));
                debug_assert!(removed, "future partition lost an entry");
            }
            LifetimeState::Past if !queued => {
                let removed = self.past.remove(&end_key(&self.entries, id));
                debug_assert!(removed, "past partition lost an entry");
            }
            // New and rescheduled entries sit in the pending list; the
            // stale handle left behind there is skipped by the next sweep.
            _ => {}
        }
        self.entries.release(id);
        true
    }

    /// Removes every entry without firing callbacks.
    ///
    /// Bulk teardown: all outstanding handles become stale.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
        self.future.clear();
        self.past.clear();
        self.active.clear();
        self.queue.clear();
    }

    /// Writes new bounds onto an entry, clamping `end` up to `start`.
    ///
    /// If the entry rests in a sorted partition it is relocated to the
    /// pending partition, so it is re-evaluated from scratch on the next
    /// sweep rather than going stale in a sort order keyed by its old
    /// bounds. Writing identical bounds is a complete no-op.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_bounds(&mut self, id: EntryId, start: f64, end: f64) {
        write_bounds(
            &mut self.entries,
            &mut self.pending,
            &mut self.future,
            &mut self.past,
            id,
            start,
            end,
        );
    }

    // -- Driving API --

    /// Sweeps against the single-instant window at `time`.
    pub fn update_at(&mut self, time: f64) -> bool {
        self.update(time, time)
    }

    /// Performs one sweep against `[window_start, window_end]`, returning
    /// whether active-partition membership changed.
    ///
    /// An inverted window is silently normalized. Activation callbacks fire
    /// during the sweep; queued boundary crossings are drained FIFO before
    /// this returns, so the queue is empty between sweeps.
    pub fn update(&mut self, window_start: f64, window_end: f64) -> bool {
        let window = SweepWindow::new(window_start, window_end);
        self.stats = SweepStats {
            sweep_index: self.stats.sweep_index + 1,
            ..SweepStats::default()
        };

        // Newly added entries and entries whose bounds changed since the
        // last sweep. Re-entrant bounds changes during this drain land in
        // the fresh pending list and are picked up next sweep.
        let pending = mem::take(&mut self.pending);
        for id in pending {
            if !self.entries.is_alive(id) || !self.entries.queued[id.idx as usize] {
                continue;
            }
            self.entries.queued[id.idx as usize] = false;
            self.stats.considered += 1;
            self.relocate(window, id, true);
        }

        // Entries leaving the future as time advances. The partition is
        // ordered by (start, sequence), so the scan stops at the first
        // entry still ahead of the window.
        while let Some(&key) = self.future.first() {
            self.stats.considered += 1;
            debug_assert!(
                self.entries.state[key.entry.idx as usize] == LifetimeState::Future,
                "future partition holds a non-future entry"
            );
            if window.classify(self.entries.interval_at(key.entry.idx)) == LifetimeState::Future {
                break;
            }
            self.future.pop_first();
            self.relocate(window, key.entry, false);
        }

        // Entries leaving the past as time rewinds, symmetrically from the
        // maximum end position.
        while let Some(&key) = self.past.last() {
            self.stats.considered += 1;
            debug_assert!(
                self.entries.state[key.entry.idx as usize] == LifetimeState::Past,
                "past partition holds a non-past entry"
            );
            if window.classify(self.entries.interval_at(key.entry.idx)) == LifetimeState::Past {
                break;
            }
            self.past.pop_last();
            self.relocate(window, key.entry, false);
        }

        // Entries leaving the active partition in either direction.
        let mut i = 0;
        while i < self.active.len() {
            let id = self.active[i];
            self.stats.considered += 1;
            self.relocate(window, id, false);
            // Deactivation swap-removes the entry; only advance when the
            // slot still holds the same entry.
            if i < self.active.len() && self.active[i] == id {
                i += 1;
            }
        }

        // Deferred drain: crossing consumers may retarget bounds freely
        // here without reordering or duplicating earlier notifications.
        while let Some(crossing) = self.queue.pop_front() {
            let (listener, mut ctx) = self.parts();
            listener.on_boundary_crossed(crossing, &mut ctx);
        }

        #[expect(
            clippy::cast_possible_truncation,
            reason = "active length is bounded by the u32 slot space"
        )]
        {
            self.stats.active_len = self.active.len() as u32;
        }
        self.stats.membership_changed()
    }

    // -- Read accessors --

    /// Returns whether the given handle refers to a live entry.
    #[must_use]
    pub fn is_alive(&self, id: EntryId) -> bool {
        self.entries.is_alive(id)
    }

    /// Returns the classification of a live entry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn state(&self, id: EntryId) -> LifetimeState {
        self.entries.validate(id);
        self.entries.state[id.idx as usize]
    }

    /// Returns the interval of a live entry.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn interval(&self, id: EntryId) -> LifetimeInterval {
        self.entries.validate(id);
        self.entries.interval_at(id.idx)
    }

    /// Returns the entries currently classified active, in no particular
    /// order.
    #[must_use]
    pub fn active_entries(&self) -> &[EntryId] {
        &self.active
    }

    /// Returns the number of tracked entries.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.entries.live()
    }

    /// Returns whether no entries are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.live() == 0
    }

    /// Returns counters describing the most recent sweep.
    #[must_use]
    pub const fn last_sweep(&self) -> SweepStats {
        self.stats
    }

    /// Returns a reference to the listener.
    #[must_use]
    pub const fn listener(&self) -> &L {
        &self.listener
    }

    /// Returns a mutable reference to the listener.
    #[must_use]
    pub const fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    // -- Internal helpers --

    /// Classifies one entry against `window` and moves it to the matching
    /// partition, firing activation callbacks and queueing boundary
    /// crossings as implied by the transition.
    ///
    /// The entry must not be held by any partition on entry (its previous
    /// holder has already let go); `from_pending` distinguishes the pending
    /// drain, where an unchanged classification means re-inserting into the
    /// sorted partition the entry left when its bounds changed.
    fn relocate(&mut self, window: SweepWindow, id: EntryId, from_pending: bool) {
        let idx = id.idx as usize;
        let old = self.entries.state[idx];
        let new = window.classify(self.entries.interval_at(id.idx));

        debug_assert!(
            (old == LifetimeState::Current) == (self.entries.active_slot[idx] != INVALID),
            "active partition out of sync with entry state"
        );

        if new == old {
            if from_pending {
                self.insert_sorted(id, new);
            } else {
                debug_assert!(
                    new == LifetimeState::Current,
                    "steady-state relocation outside the active scan"
                );
            }
            return;
        }

        self.stats.relocated += 1;
        self.entries.state[idx] = new;

        let activated = if new == LifetimeState::Current {
            self.attach_active(id);
            Some(true)
        } else if old == LifetimeState::Current {
            self.detach_active(id);
            self.insert_sorted(id, new);
            Some(false)
        } else {
            self.insert_sorted(id, new);
            None
        };

        for &(kind, direction) in crossings(old, new) {
            self.queue.push_back(BoundaryCrossing {
                entry: id,
                kind,
                direction,
            });
            self.stats.crossings += 1;
        }

        match activated {
            Some(true) => {
                self.stats.activated += 1;
                let (listener, mut ctx) = self.parts();
                listener.on_become_active(id, &mut ctx);
            }
            Some(false) => {
                self.stats.deactivated += 1;
                let (listener, mut ctx) = self.parts();
                listener.on_become_inactive(id, &mut ctx);
            }
            None => {}
        }
    }

    /// Inserts an entry into the sorted partition matching `state`, keyed
    /// by its current bounds. No-op for the unsorted states.
    fn insert_sorted(&mut self, id: EntryId, state: LifetimeState) {
        match state {
            LifetimeState::Future => {
                self.future.insert(start_key(&self.entries, id));
            }
            LifetimeState::Past => {
                self.past.insert(end_key(&self.entries, id));
            }
            LifetimeState::New | LifetimeState::Current => {}
        }
    }

    fn attach_active(&mut self, id: EntryId) {
        let idx = id.idx as usize;
        debug_assert!(
            self.entries.active_slot[idx] == INVALID,
            "entry already active"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "active length is bounded by the u32 slot space"
        )]
        let slot = self.active.len() as u32;
        self.entries.active_slot[idx] = slot;
        self.active.push(id);
    }

    fn detach_active(&mut self, id: EntryId) {
        let idx = id.idx as usize;
        let slot = self.entries.active_slot[idx];
        debug_assert!(slot != INVALID, "entry not active");
        self.active.swap_remove(slot as usize);
        if (slot as usize) < self.active.len() {
            let moved = self.active[slot as usize];
            self.entries.active_slot[moved.idx as usize] = slot;
        }
        self.entries.active_slot[idx] = INVALID;
    }

    /// Splits the manager into the listener and the mutation surface its
    /// callbacks receive.
    fn parts(&mut self) -> (&mut L, SweepContext<'_>) {
        (
            &mut self.listener,
            SweepContext {
                entries: &mut self.entries,
                pending: &mut self.pending,
                future: &mut self.future,
                past: &mut self.past,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::events::{BoundaryKind, CrossingDirection};

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Note {
        Active(EntryId),
        Inactive(EntryId),
        Crossed(EntryId, BoundaryKind, CrossingDirection),
    }

    #[derive(Default)]
    struct Recorder {
        notes: Vec<Note>,
    }

    impl LifetimeListener for Recorder {
        fn on_become_active(&mut self, entry: EntryId, _ctx: &mut SweepContext<'_>) {
            self.notes.push(Note::Active(entry));
        }

        fn on_become_inactive(&mut self, entry: EntryId, _ctx: &mut SweepContext<'_>) {
            self.notes.push(Note::Inactive(entry));
        }

        fn on_boundary_crossed(&mut self, crossing: BoundaryCrossing, _ctx: &mut SweepContext<'_>) {
            self.notes.push(Note::Crossed(
                crossing.entry,
                crossing.kind,
                crossing.direction,
            ));
        }
    }

    fn recording_manager() -> LifetimeManager<Recorder> {
        LifetimeManager::new(Recorder::default())
    }

    fn take_notes(manager: &mut LifetimeManager<Recorder>) -> Vec<Note> {
        mem::take(&mut manager.listener_mut().notes)
    }

    #[test]
    fn added_entry_is_new_until_the_first_sweep() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(0.0, 10.0));
        assert_eq!(m.state(id), LifetimeState::New);
        assert_eq!(m.len(), 1);
        m.update_at(5.0);
        assert_eq!(m.state(id), LifetimeState::Current);
    }

    #[test]
    fn monotonic_advance_fires_one_forward_pair_per_entry() {
        let mut m = recording_manager();
        let a = m.add(LifetimeInterval::new(0.0, 10.0));
        let b = m.add(LifetimeInterval::new(10.0, 20.0));
        let c = m.add(LifetimeInterval::new(5.0, 15.0));

        for t in 0..=25 {
            m.update_at(f64::from(t));
        }

        for id in [a, b, c] {
            assert_eq!(m.state(id), LifetimeState::Past, "{id:?}");
        }

        let notes = take_notes(&mut m);
        for id in [a, b, c] {
            let starts = notes
                .iter()
                .filter(|n| {
                    **n == Note::Crossed(id, BoundaryKind::Start, CrossingDirection::Forward)
                })
                .count();
            let ends = notes
                .iter()
                .filter(|n| {
                    **n == Note::Crossed(id, BoundaryKind::End, CrossingDirection::Forward)
                })
                .count();
            assert_eq!(starts, 1, "{id:?} start crossings");
            assert_eq!(ends, 1, "{id:?} end crossings");

            // Each entry visibly passes through the active set on the way.
            let became_active = notes.iter().position(|n| *n == Note::Active(id));
            let became_inactive = notes.iter().position(|n| *n == Note::Inactive(id));
            assert!(
                became_active.unwrap() < became_inactive.unwrap(),
                "{id:?} must activate before it deactivates"
            );
        }
    }

    #[test]
    fn backward_replay_mirrors_the_forward_events() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(5.0, 15.0));

        for t in 0..=25 {
            m.update_at(f64::from(t));
        }
        take_notes(&mut m);

        for t in (0..=25).rev() {
            m.update_at(f64::from(t));
        }
        assert_eq!(m.state(id), LifetimeState::Future);

        let notes = take_notes(&mut m);
        let crossings: Vec<_> = notes
            .iter()
            .filter(|n| matches!(n, Note::Crossed(..)))
            .copied()
            .collect();
        assert_eq!(
            crossings,
            [
                Note::Crossed(id, BoundaryKind::End, CrossingDirection::Backward),
                Note::Crossed(id, BoundaryKind::Start, CrossingDirection::Backward),
            ],
            "rewind must cross end first, then start"
        );
    }

    #[test]
    fn large_step_skip_fires_both_crossings_in_one_update() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(10.0, 20.0));
        m.update_at(0.0);
        assert_eq!(m.state(id), LifetimeState::Future);
        take_notes(&mut m);

        let changed = m.update_at(100.0);
        assert!(!changed, "skipped entry never changes active membership");
        assert_eq!(m.state(id), LifetimeState::Past);
        assert_eq!(
            take_notes(&mut m),
            [
                Note::Crossed(id, BoundaryKind::Start, CrossingDirection::Forward),
                Note::Crossed(id, BoundaryKind::End, CrossingDirection::Forward),
            ],
            "skip fires both edges forward, start first, with no activation"
        );
    }

    #[test]
    fn repeated_update_with_unchanged_window_is_idle() {
        let mut m = recording_manager();
        m.add(LifetimeInterval::new(0.0, 10.0));
        m.add(LifetimeInterval::new(20.0, 30.0));

        assert!(m.update_at(5.0));
        take_notes(&mut m);

        assert!(!m.update_at(5.0));
        assert!(take_notes(&mut m).is_empty(), "idle sweep fires nothing");
        assert_eq!(m.last_sweep().relocated, 0);
    }

    #[test]
    fn bounds_change_takes_effect_on_the_next_sweep_only() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(20.0, 30.0));
        m.update_at(5.0);
        assert_eq!(m.state(id), LifetimeState::Future);
        take_notes(&mut m);

        m.set_bounds(id, 0.0, 30.0);
        assert_eq!(
            m.state(id),
            LifetimeState::Future,
            "reclassification waits for the next sweep"
        );
        assert!(take_notes(&mut m).is_empty());

        assert!(m.update_at(5.0));
        assert_eq!(m.state(id), LifetimeState::Current);
        assert_eq!(
            take_notes(&mut m),
            [
                Note::Active(id),
                Note::Crossed(id, BoundaryKind::Start, CrossingDirection::Forward),
            ]
        );
    }

    #[test]
    fn identical_starts_process_in_registration_order() {
        let mut m = recording_manager();
        let a = m.add(LifetimeInterval::new(5.0, 10.0));
        let b = m.add(LifetimeInterval::new(5.0, 10.0));
        m.update_at(0.0);
        take_notes(&mut m);

        m.update_at(6.0);
        assert_eq!(
            take_notes(&mut m),
            [
                Note::Active(a),
                Note::Active(b),
                Note::Crossed(a, BoundaryKind::Start, CrossingDirection::Forward),
                Note::Crossed(b, BoundaryKind::Start, CrossingDirection::Forward),
            ],
            "sequence tie-break keeps registration order"
        );
    }

    #[test]
    fn removing_an_active_entry_notifies_immediately() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(0.0, 10.0));
        m.update_at(5.0);
        take_notes(&mut m);

        assert!(m.remove(id));
        assert_eq!(
            take_notes(&mut m),
            [Note::Inactive(id)],
            "deactivation fires synchronously, not via the queue"
        );
        assert!(!m.is_alive(id));
        assert!(m.active_entries().is_empty());
        assert!(!m.remove(id), "second removal is a reported no-op");
    }

    #[test]
    fn removing_sorted_and_pending_entries_is_silent() {
        let mut m = recording_manager();
        let future = m.add(LifetimeInterval::new(20.0, 30.0));
        let past = m.add(LifetimeInterval::new(-10.0, -5.0));
        let fresh = m.add(LifetimeInterval::new(0.0, 1.0));
        m.update_at(0.0);
        take_notes(&mut m);

        assert!(m.remove(future));
        assert!(m.remove(past));
        m.remove(fresh);
        let pending = m.add(LifetimeInterval::new(50.0, 60.0));
        assert!(m.remove(pending), "removal straight from pending");

        assert!(take_notes(&mut m).is_empty());
        assert!(m.is_empty());

        // The sweep after the removals has nothing left to visit.
        assert!(!m.update_at(0.0));
        assert_eq!(m.last_sweep().considered, 0);
    }

    #[test]
    fn clear_is_silent_and_invalidates_handles() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(0.0, 10.0));
        m.update_at(5.0);
        take_notes(&mut m);

        m.clear();
        assert!(take_notes(&mut m).is_empty(), "teardown fires no callbacks");
        assert!(m.is_empty());
        assert!(!m.is_alive(id));
        assert!(m.active_entries().is_empty());
    }

    #[test]
    fn entry_registered_outside_the_window_fires_no_synthetic_crossings() {
        let mut m = recording_manager();
        let behind = m.add(LifetimeInterval::new(0.0, 5.0));
        let ahead = m.add(LifetimeInterval::new(20.0, 25.0));

        let changed = m.update_at(10.0);
        assert!(!changed);
        assert_eq!(m.state(behind), LifetimeState::Past);
        assert_eq!(m.state(ahead), LifetimeState::Future);
        assert!(take_notes(&mut m).is_empty());
    }

    #[test]
    fn inverted_window_is_normalized() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(15.0, 25.0));
        // (20, 10) behaves as the instant window at 20.
        assert!(m.update(20.0, 10.0));
        assert_eq!(m.state(id), LifetimeState::Current);
    }

    #[test]
    fn set_bounds_clamps_negative_intervals() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(0.0, 10.0));
        m.set_bounds(id, 10.0, 5.0);
        let interval = m.interval(id);
        assert_eq!(interval.start(), 10.0);
        assert_eq!(interval.end(), 10.0);
    }

    #[test]
    fn unchanged_bounds_write_does_not_reschedule() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(20.0, 30.0));
        m.update_at(0.0);

        m.set_bounds(id, 20.0, 30.0);
        m.update_at(0.0);
        assert_eq!(
            m.last_sweep().considered,
            1,
            "only the future minimum check runs; no pending work was queued"
        );
    }

    #[test]
    fn idle_sweeps_touch_only_the_sorted_extremities() {
        let mut m = recording_manager();
        for i in 0..100 {
            let t = f64::from(i) * 10.0;
            m.add(LifetimeInterval::new(t, t + 10.0));
        }
        m.update_at(500.0);

        m.update_at(500.0);
        let stats = m.last_sweep();
        assert_eq!(stats.relocated, 0);
        assert!(
            stats.considered <= 3,
            "idle sweep over 100 entries considered {} (one active, one future \
             minimum, one past maximum at most)",
            stats.considered
        );
    }

    #[test]
    fn update_reports_membership_changes_only() {
        let mut m = recording_manager();
        let id = m.add(LifetimeInterval::new(10.0, 20.0));
        assert!(
            !m.update_at(0.0),
            "classifying a new entry as future changes no membership"
        );
        assert!(m.update_at(15.0), "activation");
        assert!(!m.update_at(16.0), "still active");
        assert!(m.update_at(25.0), "deactivation");
        assert_eq!(m.state(id), LifetimeState::Past);
    }

    // -- Re-entrancy --

    /// Retargets each entry to a fixed later interval the moment its end
    /// boundary is crossed forward.
    struct Respawner {
        target: (f64, f64),
        crossings_seen: u32,
    }

    impl LifetimeListener for Respawner {
        fn on_boundary_crossed(&mut self, crossing: BoundaryCrossing, ctx: &mut SweepContext<'_>) {
            self.crossings_seen += 1;
            if crossing.kind == BoundaryKind::End
                && crossing.direction == CrossingDirection::Forward
            {
                ctx.set_bounds(crossing.entry, self.target.0, self.target.1);
            }
        }
    }

    #[test]
    fn bounds_change_from_a_crossing_callback_defers_to_the_next_sweep() {
        let mut m = LifetimeManager::new(Respawner {
            target: (100.0, 110.0),
            crossings_seen: 0,
        });
        let id = m.add(LifetimeInterval::new(0.0, 10.0));
        m.update_at(5.0);

        // Crossing the end retargets the entry from inside the callback.
        m.update_at(50.0);
        assert_eq!(m.state(id), LifetimeState::Past, "still past this sweep");
        assert_eq!(m.interval(id).start(), 100.0);

        // The next sweep re-evaluates it from the pending partition.
        m.update_at(50.0);
        assert_eq!(m.state(id), LifetimeState::Future);

        // And playing into the new interval activates it again.
        assert!(m.update_at(105.0));
        assert_eq!(m.state(id), LifetimeState::Current);
    }

    /// Pushes an entry's start further out every time it would activate.
    struct Deferrer;

    impl LifetimeListener for Deferrer {
        fn on_become_active(&mut self, entry: EntryId, ctx: &mut SweepContext<'_>) {
            let interval = ctx.interval(entry);
            ctx.set_bounds(entry, interval.start() + 100.0, interval.end() + 100.0);
        }
    }

    #[test]
    fn bounds_change_from_an_activation_callback_is_safe() {
        let mut m = LifetimeManager::new(Deferrer);
        let id = m.add(LifetimeInterval::new(0.0, 10.0));

        // Activation immediately rewrites the bounds; the active rescan
        // later in the same sweep sees the new interval and deactivates
        // the entry again.
        assert!(m.update_at(5.0));
        assert_eq!(m.state(id), LifetimeState::Future);
        assert_eq!(m.interval(id).start(), 100.0);

        // Steady afterwards.
        assert!(!m.update_at(5.0));
        assert_eq!(m.state(id), LifetimeState::Future);
    }
}
