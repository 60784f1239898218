// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary-crossing events.
//!
//! When a sweep moves an entry between classifications, the window has
//! conceptually passed over one or both of the entry's interval boundaries.
//! [`crossings`] maps each transition to the boundary crossings it implies,
//! in time-consistent order, so that even a transition that skips the entire
//! active span in one step (a large seek) reports both edges rather than
//! silently dropping the interior state.
//!
//! Crossings are queued during the sweep and delivered FIFO after the
//! partitions have settled; see
//! [`LifetimeManager::update`](crate::manager::LifetimeManager::update).

use crate::entry::EntryId;
use crate::interval::LifetimeState;

/// Which edge of an entry's interval was crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryKind {
    /// The interval's `start` position.
    Start,
    /// The interval's `end` position.
    End,
}

/// The direction the window was moving when it crossed a boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrossingDirection {
    /// Time increasing.
    Forward,
    /// Time decreasing.
    Backward,
}

/// One boundary crossing observed for one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryCrossing {
    /// The entry whose boundary was crossed.
    pub entry: EntryId,
    /// Which edge was crossed.
    pub kind: BoundaryKind,
    /// Which way time was moving.
    pub direction: CrossingDirection,
}

/// Returns the boundary crossings implied by a classification transition,
/// in the order they conceptually occurred.
///
/// Transitions out of [`LifetimeState::New`] return nothing: there is no
/// previously observed state for the window to have crossed a boundary
/// from. Identity transitions likewise return nothing.
#[must_use]
pub const fn crossings(
    old: LifetimeState,
    new: LifetimeState,
) -> &'static [(BoundaryKind, CrossingDirection)] {
    use BoundaryKind::{End, Start};
    use CrossingDirection::{Backward, Forward};
    use LifetimeState::{Current, Future, New, Past};

    match (old, new) {
        (Future, Current) => &[(Start, Forward)],
        (Future, Past) => &[(Start, Forward), (End, Forward)],
        (Current, Past) => &[(End, Forward)],
        (Current, Future) => &[(Start, Backward)],
        (Past, Current) => &[(End, Backward)],
        (Past, Future) => &[(End, Backward), (Start, Backward)],
        (New, _) | (_, New) => &[],
        (Future, Future) | (Current, Current) | (Past, Past) => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BoundaryKind::{End, Start};
    use CrossingDirection::{Backward, Forward};
    use LifetimeState::{Current, Future, New, Past};

    #[test]
    fn forward_transitions() {
        assert_eq!(crossings(Future, Current), &[(Start, Forward)]);
        assert_eq!(crossings(Current, Past), &[(End, Forward)]);
        assert_eq!(
            crossings(Future, Past),
            &[(Start, Forward), (End, Forward)],
            "a skipped interval still reports both edges, start first"
        );
    }

    #[test]
    fn backward_transitions_mirror_forward_ones() {
        assert_eq!(crossings(Current, Future), &[(Start, Backward)]);
        assert_eq!(crossings(Past, Current), &[(End, Backward)]);
        assert_eq!(
            crossings(Past, Future),
            &[(End, Backward), (Start, Backward)],
            "a skipped interval reports both edges, end first when rewinding"
        );
    }

    #[test]
    fn new_transitions_are_silent() {
        for to in [Future, Current, Past] {
            assert!(crossings(New, to).is_empty(), "New -> {to:?}");
        }
    }

    #[test]
    fn identity_transitions_are_silent() {
        for s in [New, Future, Current, Past] {
            assert!(crossings(s, s).is_empty(), "{s:?} -> {s:?}");
        }
    }
}
