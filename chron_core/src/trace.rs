// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the sweep loop.
//!
//! This module provides a [`SweepSink`] trait with per-event methods that
//! sweep-loop instrumentation calls around each update. All method bodies
//! default to no-ops, so implementing only the events you care about is
//! fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn SweepSink`. When the `trace`
//! feature is **off**, every `Tracer` method compiles to nothing (zero
//! overhead). When **on**, each method performs a single `Option` branch
//! before dispatching.
//!
//! The manager itself does not hold a tracer: the driving loop owns one and
//! feeds it from [`SweepStats`](crate::manager::SweepStats) and from its own
//! listener's records, mirroring how the rest of the frame loop is wired.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates per-entry transition and
//!   crossing events plus the corresponding `SweepSink` methods.

#[cfg(feature = "trace-rich")]
use crate::entry::EntryId;
#[cfg(feature = "trace-rich")]
use crate::events::{BoundaryKind, CrossingDirection};
#[cfg(feature = "trace-rich")]
use crate::interval::LifetimeState;
use crate::manager::SweepStats;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted before a sweep runs.
#[derive(Clone, Copy, Debug)]
pub struct SweepBeginEvent {
    /// Monotonic sweep counter.
    pub sweep_index: u64,
    /// Lower bound of the window about to be swept.
    pub window_start: f64,
    /// Upper bound of the window about to be swept.
    pub window_end: f64,
}

/// Per-sweep summary emitted after a sweep completes.
#[derive(Clone, Copy, Debug)]
pub struct SweepSummary {
    /// Monotonic sweep counter.
    pub sweep_index: u64,
    /// Lower bound of the swept window.
    pub window_start: f64,
    /// Upper bound of the swept window.
    pub window_end: f64,
    /// Entries whose classification was checked.
    pub considered: u32,
    /// Entries that changed classification.
    pub relocated: u32,
    /// Entries that entered the active partition.
    pub activated: u32,
    /// Entries that left the active partition.
    pub deactivated: u32,
    /// Boundary crossings delivered.
    pub crossings: u32,
    /// Size of the active partition after the sweep.
    pub active_len: u32,
    /// Whether active membership changed.
    pub membership_changed: bool,
}

impl SweepSummary {
    /// Builds a summary from the manager's post-sweep counters and the
    /// window that was swept.
    #[must_use]
    pub const fn new(window_start: f64, window_end: f64, stats: &SweepStats) -> Self {
        Self {
            sweep_index: stats.sweep_index,
            window_start,
            window_end,
            considered: stats.considered,
            relocated: stats.relocated,
            activated: stats.activated,
            deactivated: stats.deactivated,
            crossings: stats.crossings,
            active_len: stats.active_len,
            membership_changed: stats.membership_changed(),
        }
    }
}

/// A single classification change (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct EntryTransitionEvent {
    /// Monotonic sweep counter.
    pub sweep_index: u64,
    /// The relocated entry.
    pub entry: EntryId,
    /// Classification before the sweep.
    pub old: LifetimeState,
    /// Classification after the sweep.
    pub new: LifetimeState,
}

/// A single delivered boundary crossing (requires `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct CrossingEvent {
    /// Monotonic sweep counter.
    pub sweep_index: u64,
    /// The entry whose boundary was crossed.
    pub entry: EntryId,
    /// Which edge was crossed.
    pub kind: BoundaryKind,
    /// Which way time was moving.
    pub direction: CrossingDirection,
}

// ---------------------------------------------------------------------------
// SweepSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the sweep loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait SweepSink {
    /// Called before a sweep runs.
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        _ = e;
    }

    /// Called with a per-sweep summary after a sweep completes.
    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        _ = s;
    }

    /// Called per classification change (requires the `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_entry_transition(&mut self, e: &EntryTransitionEvent) {
        _ = e;
    }

    /// Called per delivered crossing (requires the `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_crossing(&mut self, e: &CrossingEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`SweepSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl SweepSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`SweepSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
/// When **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn SweepSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn SweepSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn SweepSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SweepBeginEvent`].
    #[inline]
    pub fn sweep_begin(&mut self, e: &SweepBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sweep_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SweepSummary`].
    #[inline]
    pub fn sweep_summary(&mut self, s: &SweepSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_sweep_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits an [`EntryTransitionEvent`] (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn entry_transition(&mut self, e: &EntryTransitionEvent) {
        if let Some(s) = &mut self.sink {
            s.on_entry_transition(e);
        }
    }

    /// Emits a [`CrossingEvent`] (requires `trace-rich`).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn crossing(&mut self, e: &CrossingEvent) {
        if let Some(s) = &mut self.sink {
            s.on_crossing(e);
        }
    }
}
