// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry records and identity.
//!
//! An *entry* is one tracked time-bounded object. Each entry has:
//!
//! - An identity ([`EntryId`]) — a generational handle that becomes stale
//!   when the entry is removed, preventing use-after-free bugs at the API
//!   level, plus a [`SequenceId`] assigned in registration order and used
//!   only as a deterministic tie-break between entries sharing a boundary
//!   position.
//! - A half-open interval `[start, end)` set by the owner (see
//!   [`LifetimeInterval`](crate::interval::LifetimeInterval)).
//! - Classification bookkeeping written exclusively by the manager's sweeps.
//!
//! Entries are stored in struct-of-arrays layout inside the manager; owners
//! hold only handles, never references, so the index and its entries cannot
//! form ownership cycles.

mod id;
mod store;

pub use id::{EntryId, INVALID, SequenceId};
pub(crate) use store::EntryStore;
