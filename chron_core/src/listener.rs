// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer contract for membership changes.
//!
//! A [`LifetimeManager`](crate::manager::LifetimeManager) owns exactly one
//! listener, supplied at construction. There is no multicast or global
//! dispatch; a consumer that needs fan-out composes it inside its listener.
//!
//! The two activation callbacks fire synchronously while the sweep is
//! relocating entries, so the consumer can attach or detach the heavyweight
//! resource tied to an entry the moment its membership changes. Boundary
//! crossings are delivered later, in FIFO order, after the partitions have
//! settled — that drain phase is where consumers are free to retarget
//! entries' bounds (including the entry the event is about) without
//! disturbing the sweep. See
//! [`SweepContext`](crate::manager::SweepContext) for what a callback may
//! touch.

use crate::entry::EntryId;
use crate::events::BoundaryCrossing;
use crate::manager::SweepContext;

/// Receives membership transitions from a lifetime manager.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait LifetimeListener {
    /// Called when an entry enters the active set.
    fn on_become_active(&mut self, entry: EntryId, ctx: &mut SweepContext<'_>) {
        _ = (entry, ctx);
    }

    /// Called when an entry leaves the active set.
    ///
    /// Also fired synchronously by
    /// [`remove`](crate::manager::LifetimeManager::remove) when the entry
    /// being removed is currently active, before the removal completes.
    fn on_become_inactive(&mut self, entry: EntryId, ctx: &mut SweepContext<'_>) {
        _ = (entry, ctx);
    }

    /// Called for each boundary crossing, after the sweep's relocations are
    /// complete, in the order the crossings were observed.
    fn on_boundary_crossed(&mut self, crossing: BoundaryCrossing, ctx: &mut SweepContext<'_>) {
        _ = (crossing, ctx);
    }
}

/// A [`LifetimeListener`] that ignores all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl LifetimeListener for NoopListener {}
