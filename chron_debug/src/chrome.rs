// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes
//! [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Sweeps run against a timeline, not a wall clock, so the export uses a
//! virtual timebase: each sweep occupies one millisecond of trace time at
//! its sweep index, and its duration is drawn proportional to the number of
//! entries it considered. Rich events land as instants inside their sweep's
//! slot.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Microseconds of virtual trace time per sweep.
const SWEEP_SLOT_US: u64 = 1000;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::SweepBegin(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "SweepBegin",
                    "cat": "Sweep",
                    "ts": sweep_ts(e.sweep_index),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "sweep_index": e.sweep_index,
                        "window_start": finite_or_string(e.window_start),
                        "window_end": finite_or_string(e.window_end),
                    }
                }));
            }
            RecordedEvent::SweepSummary(s) => {
                events.push(json!({
                    "ph": "X",
                    "name": "Sweep",
                    "cat": "Sweep",
                    "ts": sweep_ts(s.sweep_index),
                    "dur": u64::from(s.considered).max(1),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "sweep_index": s.sweep_index,
                        "window_start": finite_or_string(s.window_start),
                        "window_end": finite_or_string(s.window_end),
                        "considered": s.considered,
                        "relocated": s.relocated,
                        "activated": s.activated,
                        "deactivated": s.deactivated,
                        "crossings": s.crossings,
                        "active_len": s.active_len,
                        "membership_changed": s.membership_changed,
                    }
                }));
            }
            RecordedEvent::EntryTransition {
                sweep_index,
                entry_index,
                entry_generation,
                old,
                new,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Transition",
                    "cat": "Rich",
                    "ts": sweep_ts(sweep_index),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "sweep_index": sweep_index,
                        "entry": format!("{entry_index}@gen{entry_generation}"),
                        "old": format!("{old:?}"),
                        "new": format!("{new:?}"),
                    }
                }));
            }
            RecordedEvent::Crossing {
                sweep_index,
                entry_index,
                entry_generation,
                kind,
                direction,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Crossing",
                    "cat": "Rich",
                    "ts": sweep_ts(sweep_index),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "sweep_index": sweep_index,
                        "entry": format!("{entry_index}@gen{entry_generation}"),
                        "kind": format!("{kind:?}"),
                        "direction": format!("{direction:?}"),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn sweep_ts(sweep_index: u64) -> u64 {
    sweep_index.saturating_mul(SWEEP_SLOT_US)
}

/// Timeline positions default to infinities; JSON numbers cannot carry
/// those, so non-finite positions are stringified.
fn finite_or_string(v: f64) -> Value {
    if v.is_finite() {
        json!(v)
    } else {
        json!(format!("{v}"))
    }
}
