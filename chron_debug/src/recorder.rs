// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`SweepSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Entry handles are recorded as raw `(index, generation)` pairs; a decoded
//! recording describes entries, it does not resurrect handles into a live
//! manager.

use chron_core::events::{BoundaryKind, CrossingDirection};
use chron_core::interval::LifetimeState;
use chron_core::trace::{
    CrossingEvent, EntryTransitionEvent, SweepBeginEvent, SweepSink, SweepSummary,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SWEEP_BEGIN: u8 = 1;
const TAG_SWEEP_SUMMARY: u8 = 2;
const TAG_ENTRY_TRANSITION: u8 = 3;
const TAG_CROSSING: u8 = 4;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`SweepSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_bits().to_le_bytes());
    }

    fn write_state(&mut self, s: LifetimeState) {
        self.write_u8(match s {
            LifetimeState::New => 0,
            LifetimeState::Future => 1,
            LifetimeState::Current => 2,
            LifetimeState::Past => 3,
        });
    }

    fn write_kind(&mut self, k: BoundaryKind) {
        self.write_u8(match k {
            BoundaryKind::Start => 0,
            BoundaryKind::End => 1,
        });
    }

    fn write_direction(&mut self, d: CrossingDirection) {
        self.write_u8(match d {
            CrossingDirection::Forward => 0,
            CrossingDirection::Backward => 1,
        });
    }
}

impl SweepSink for RecorderSink {
    fn on_sweep_begin(&mut self, e: &SweepBeginEvent) {
        self.write_u8(TAG_SWEEP_BEGIN);
        self.write_u64(e.sweep_index);
        self.write_f64(e.window_start);
        self.write_f64(e.window_end);
    }

    fn on_sweep_summary(&mut self, s: &SweepSummary) {
        self.write_u8(TAG_SWEEP_SUMMARY);
        self.write_u64(s.sweep_index);
        self.write_f64(s.window_start);
        self.write_f64(s.window_end);
        self.write_u32(s.considered);
        self.write_u32(s.relocated);
        self.write_u32(s.activated);
        self.write_u32(s.deactivated);
        self.write_u32(s.crossings);
        self.write_u32(s.active_len);
        self.write_u8(u8::from(s.membership_changed));
    }

    fn on_entry_transition(&mut self, e: &EntryTransitionEvent) {
        self.write_u8(TAG_ENTRY_TRANSITION);
        self.write_u64(e.sweep_index);
        self.write_u32(e.entry.index());
        self.write_u32(e.entry.generation());
        self.write_state(e.old);
        self.write_state(e.new);
    }

    fn on_crossing(&mut self, e: &CrossingEvent) {
        self.write_u8(TAG_CROSSING);
        self.write_u64(e.sweep_index);
        self.write_u32(e.entry.index());
        self.write_u32(e.entry.generation());
        self.write_kind(e.kind);
        self.write_direction(e.direction);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`SweepBeginEvent`].
    SweepBegin(SweepBeginEvent),
    /// A [`SweepSummary`].
    SweepSummary(SweepSummary),
    /// A classification change, with the entry identified by raw handle
    /// parts.
    EntryTransition {
        /// Sweep counter.
        sweep_index: u64,
        /// Raw slot index of the entry.
        entry_index: u32,
        /// Generation of the entry's handle at recording time.
        entry_generation: u32,
        /// Classification before the sweep.
        old: LifetimeState,
        /// Classification after the sweep.
        new: LifetimeState,
    },
    /// A delivered boundary crossing, with the entry identified by raw
    /// handle parts.
    Crossing {
        /// Sweep counter.
        sweep_index: u64,
        /// Raw slot index of the entry.
        entry_index: u32,
        /// Generation of the entry's handle at recording time.
        entry_generation: u32,
        /// Which edge was crossed.
        kind: BoundaryKind,
        /// Which way time was moving.
        direction: CrossingDirection,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_state(&mut self) -> Option<LifetimeState> {
        Some(match self.read_u8()? {
            0 => LifetimeState::New,
            1 => LifetimeState::Future,
            2 => LifetimeState::Current,
            _ => LifetimeState::Past,
        })
    }

    fn read_kind(&mut self) -> Option<BoundaryKind> {
        Some(match self.read_u8()? {
            0 => BoundaryKind::Start,
            _ => BoundaryKind::End,
        })
    }

    fn read_direction(&mut self) -> Option<CrossingDirection> {
        Some(match self.read_u8()? {
            0 => CrossingDirection::Forward,
            _ => CrossingDirection::Backward,
        })
    }

    fn decode_sweep_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SweepBegin(SweepBeginEvent {
            sweep_index: self.read_u64()?,
            window_start: self.read_f64()?,
            window_end: self.read_f64()?,
        }))
    }

    fn decode_sweep_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SweepSummary(SweepSummary {
            sweep_index: self.read_u64()?,
            window_start: self.read_f64()?,
            window_end: self.read_f64()?,
            considered: self.read_u32()?,
            relocated: self.read_u32()?,
            activated: self.read_u32()?,
            deactivated: self.read_u32()?,
            crossings: self.read_u32()?,
            active_len: self.read_u32()?,
            membership_changed: self.read_u8()? != 0,
        }))
    }

    fn decode_entry_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::EntryTransition {
            sweep_index: self.read_u64()?,
            entry_index: self.read_u32()?,
            entry_generation: self.read_u32()?,
            old: self.read_state()?,
            new: self.read_state()?,
        })
    }

    fn decode_crossing(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Crossing {
            sweep_index: self.read_u64()?,
            entry_index: self.read_u32()?,
            entry_generation: self.read_u32()?,
            kind: self.read_kind()?,
            direction: self.read_direction()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SWEEP_BEGIN => self.decode_sweep_begin(),
            TAG_SWEEP_SUMMARY => self.decode_sweep_summary(),
            TAG_ENTRY_TRANSITION => self.decode_entry_transition(),
            TAG_CROSSING => self.decode_crossing(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
