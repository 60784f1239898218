// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`SweepSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Timeline positions are printed as-is; they are already in the caller's
//! time units.

use std::io::Write;

use chron_core::trace::{
    CrossingEvent, EntryTransitionEvent, SweepBeginEvent, SweepSink, SweepSummary,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> SweepSink for PrettyPrintSink<W> {
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[sweep] index={} window=({}..{})",
            e.sweep_index, e.window_start, e.window_end,
        );
    }

    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        let changed = if s.membership_changed { "CHANGED" } else { "steady" };
        let _ = writeln!(
            self.writer,
            "[summary] index={} considered={} relocated={} activated={} \
             deactivated={} crossings={} active={} membership={changed}",
            s.sweep_index,
            s.considered,
            s.relocated,
            s.activated,
            s.deactivated,
            s.crossings,
            s.active_len,
        );
    }

    fn on_entry_transition(&mut self, e: &EntryTransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] sweep={} entry={:?} {:?} -> {:?}",
            e.sweep_index, e.entry, e.old, e.new,
        );
    }

    fn on_crossing(&mut self, e: &CrossingEvent) {
        let _ = writeln!(
            self.writer,
            "[crossing] sweep={} entry={:?} {:?} {:?}",
            e.sweep_index, e.entry, e.kind, e.direction,
        );
    }
}
