// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted timeline run that exercises the tracking and diagnostics
//! pipeline.
//!
//! Registers a batch of staggered entries, drives the manager through
//! playback, a far seek, and a rewind, recording events to both a
//! [`PrettyPrintSink`](chron_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](chron_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file and prints a churn report.

use std::fs::File;
use std::io::BufWriter;

use chron_core::interval::LifetimeInterval;
use chron_core::manager::LifetimeManager;
use chron_core::trace::{CrossingEvent, SweepBeginEvent, SweepSink, SweepSummary};

use chron_harness::{
    CallbackRecord, ChurnSample, ChurnThresholds, ChurnTracker, RecordingListener, ScriptStep,
    ScriptedTimeline,
};

use chron_debug::pretty::PrettyPrintSink;
use chron_debug::recorder::RecorderSink;

const ENTRY_COUNT: u32 = 40;
/// Seconds each entry stays active.
const ENTRY_SPAN: f64 = 3.0;
/// Seconds between consecutive entry starts.
const ENTRY_STRIDE: f64 = 0.5;

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();
    let mut churn = ChurnTracker::<32>::new(ChurnThresholds::seek_heavy());

    // -- manager with staggered entries ------------------------------------
    let mut manager = LifetimeManager::new(RecordingListener::new());
    for i in 0..ENTRY_COUNT {
        let start = f64::from(i) * ENTRY_STRIDE;
        manager.add(LifetimeInterval::new(start, start + ENTRY_SPAN));
    }

    // -- scripted run: play, far seek, rewind -------------------------------
    let script = ScriptedTimeline::new(
        0.0,
        vec![
            ScriptStep::Play {
                until: 6.0,
                step: 0.25,
            },
            ScriptStep::Hold { frames: 4 },
            // Seek far past every entry: start and end crossings arrive in
            // one sweep per skipped entry.
            ScriptStep::Seek { to: 60.0 },
            // Rewind into the middle of the set.
            ScriptStep::Seek { to: 10.0 },
            ScriptStep::Play {
                until: 0.0,
                step: 0.5,
            },
        ],
    );

    let mut last_report = None;
    for position in script {
        let begin = SweepBeginEvent {
            sweep_index: manager.last_sweep().sweep_index + 1,
            window_start: position,
            window_end: position,
        };
        pretty.on_sweep_begin(&begin);
        recorder.on_sweep_begin(&begin);

        manager.update_at(position);

        let stats = manager.last_sweep();
        for record in manager.listener_mut().take() {
            if let CallbackRecord::Crossed(entry, kind, direction) = record {
                let e = CrossingEvent {
                    sweep_index: stats.sweep_index,
                    entry,
                    kind,
                    direction,
                };
                pretty.on_crossing(&e);
                recorder.on_crossing(&e);
            }
        }

        let summary = SweepSummary::new(position, position, &stats);
        pretty.on_sweep_summary(&summary);
        recorder.on_sweep_summary(&summary);

        last_report = Some(churn.observe(ChurnSample::from_stats(&stats)));
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    chron_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    let report = last_report.expect("script produced no frames");
    println!(
        "Wrote {path}: {} sweeps, {} relocations, grade {} ({:.1} avg relocations/sweep)",
        report.total_sweeps,
        report.total_relocations,
        report.grade.as_str(),
        report.avg_relocations,
    );
    println!("churn {}", churn.sparkline_ascii(0.0, 16.0));
}
