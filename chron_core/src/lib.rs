// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timeline lifetime tracking engine for frame-synchronized scenes.
//!
//! `chron_core` decides, once per frame, which members of a large dynamic
//! set of time-bounded entries overlap the current timeline window, and
//! notifies a listener when membership changes. It supports non-monotonic
//! time (seeking in both directions), bounds mutation while tracked
//! (including from inside the change callbacks), and a replayable
//! boundary-crossing event order. It is `no_std` compatible (with `alloc`)
//! and uses array-based struct-of-arrays storage with index handles.
//!
//! # Architecture
//!
//! The crate is organized around one sweep per frame over a moving window:
//!
//! ```text
//!   Driver (per-frame window)
//!       │
//!       ▼
//!   LifetimeManager::update ──► relocations across partitions
//!       │                               │
//!       │            pending ─► future ─► active ─► past
//!       │                               │
//!       ├── on_become_active / on_become_inactive   (inline, per relocation)
//!       ▼
//!   event queue drain ──► on_boundary_crossed       (FIFO, post-sweep)
//! ```
//!
//! **[`entry`]** — Entry records and generational identity. Owners hold
//! [`EntryId`](entry::EntryId) handles; the engine owns the storage.
//!
//! **[`interval`]** — Half-open intervals, sweep windows, and the pure
//! classification predicate assigning each entry a
//! [`LifetimeState`](interval::LifetimeState).
//!
//! **[`events`]** — Boundary-crossing vocabulary and the transition table
//! mapping classification changes to crossings, so that seeking over an
//! entire interval in one step still reports both edges in order.
//!
//! **[`listener`]** — The [`LifetimeListener`](listener::LifetimeListener)
//! trait consumers implement; one listener per manager, no global dispatch.
//!
//! **[`manager`]** — The membership index: four partitions (pending,
//! start-ordered future, active, end-ordered past), the sweep algorithm,
//! and the deferred crossing queue.
//!
//! **[`trace`]** — [`SweepSink`](trace::SweepSink) trait and event types
//! for sweep-loop instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-entry
//!   transition and crossing events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod entry;
pub mod events;
pub mod interval;
pub mod listener;
pub mod manager;
pub mod trace;
