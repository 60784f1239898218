// Copyright 2026 the Chron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable sweep metrics, grading, and scripted drivers for harnesses.
//!
//! [`ChurnTracker`] grades how well a manager's sorted partitions are
//! amortizing sweeps: a healthy workload relocates a handful of entries per
//! frame no matter how many are tracked, while a pathological one (bounds
//! rewritten wholesale every frame) degenerates into full rescans.
//!
//! [`ScriptedTimeline`] produces deterministic window sequences (playback,
//! seeks, holds) for demos and replay tests, and [`RecordingListener`]
//! captures the exact callback order a run produced so it can be asserted
//! against or compared across runs.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use chron_core::entry::EntryId;
use chron_core::events::{BoundaryCrossing, BoundaryKind, CrossingDirection};
use chron_core::listener::LifetimeListener;
use chron_core::manager::{SweepContext, SweepStats};

/// Per-sweep metrics sample fed into [`ChurnTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct ChurnSample {
    /// Entries whose classification was checked.
    pub considered: u32,
    /// Entries that changed classification.
    pub relocated: u32,
    /// Boundary crossings delivered.
    pub crossings: u32,
    /// Active-partition size after the sweep.
    pub active_len: u32,
}

impl ChurnSample {
    /// Builds a sample from the manager's post-sweep counters.
    #[must_use]
    pub const fn from_stats(stats: &SweepStats) -> Self {
        Self {
            considered: stats.considered,
            relocated: stats.relocated,
            crossings: stats.crossings,
            active_len: stats.active_len,
        }
    }
}

/// Letter grade for sweep amortization quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnGrade {
    /// Boundary-only churn.
    A,
    /// Moderate churn.
    B,
    /// Heavy but bounded churn.
    C,
    /// Rescan-like behavior.
    D,
}

impl ChurnGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Average-relocations-per-sweep thresholds separating the grades.
#[derive(Clone, Copy, Debug)]
pub struct ChurnThresholds {
    /// Upper bound (exclusive) for grade A.
    pub a_relocations: f64,
    /// Upper bound (exclusive) for grade B.
    pub b_relocations: f64,
    /// Upper bound (exclusive) for grade C.
    pub c_relocations: f64,
}

impl ChurnThresholds {
    /// Thresholds for interactive playback, where only a few entries should
    /// cross a boundary per frame.
    #[must_use]
    pub const fn interactive() -> Self {
        Self {
            a_relocations: 2.0,
            b_relocations: 8.0,
            c_relocations: 32.0,
        }
    }

    /// Relaxed thresholds for seek-heavy workloads, where a single frame
    /// legitimately relocates larger batches.
    #[must_use]
    pub const fn seek_heavy() -> Self {
        Self {
            a_relocations: 16.0,
            b_relocations: 64.0,
            c_relocations: 256.0,
        }
    }
}

impl Default for ChurnThresholds {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Aggregated report returned by [`ChurnTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct ChurnReport {
    /// Current grade.
    pub grade: ChurnGrade,
    /// Mean relocations per sweep over the ring-buffer window.
    pub avg_relocations: f64,
    /// Current sweep's relocation count.
    pub relocated: u32,
    /// Current active-partition size.
    pub active_len: u32,
    /// Total sweeps observed.
    pub total_sweeps: u64,
    /// Total relocations observed.
    pub total_relocations: u64,
}

/// Rolling churn tracker with fixed-size relocation history.
#[derive(Debug)]
pub struct ChurnTracker<const N: usize> {
    relocations: [f64; N],
    cursor: usize,
    filled: usize,
    thresholds: ChurnThresholds,
    total_sweeps: u64,
    total_relocations: u64,
}

impl<const N: usize> Default for ChurnTracker<N> {
    fn default() -> Self {
        Self::new(ChurnThresholds::interactive())
    }
}

impl<const N: usize> ChurnTracker<N> {
    /// Creates a tracker grading against the given thresholds.
    #[must_use]
    pub const fn new(thresholds: ChurnThresholds) -> Self {
        Self {
            relocations: [0.0; N],
            cursor: 0,
            filled: 0,
            thresholds,
            total_sweeps: 0,
            total_relocations: 0,
        }
    }

    /// Observes one sweep and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: ChurnSample) -> ChurnReport {
        self.total_sweeps = self.total_sweeps.saturating_add(1);
        self.total_relocations = self
            .total_relocations
            .saturating_add(u64::from(sample.relocated));
        self.relocations[self.cursor % N] = f64::from(sample.relocated);
        self.cursor = (self.cursor + 1) % N;
        if self.filled < N {
            self.filled += 1;
        }

        let mut sum = 0.0;
        let mut i = 0;
        while i < self.filled {
            sum += self.relocations[i];
            i += 1;
        }
        let avg = sum / self.filled as f64;

        ChurnReport {
            grade: grade_for(&self.thresholds, avg),
            avg_relocations: avg,
            relocated: sample.relocated,
            active_len: sample.active_len,
            total_sweeps: self.total_sweeps,
            total_relocations: self.total_relocations,
        }
    }

    /// Returns ring-buffer relocation counts oldest→newest.
    #[must_use]
    pub fn relocation_history(&self) -> [f64; N] {
        let mut out = [0.0; N];
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            out[i] = self.relocations[idx];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over `relocation_history()`.
    #[must_use]
    pub fn sparkline_ascii(&self, min: f64, max: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(N);
        let mut i = 0;
        while i < N {
            let idx = (self.cursor + i) % N;
            let v = self.relocations[idx].clamp(min, max);
            let t = (v - min) / (max - min);
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
            i += 1;
        }
        out
    }
}

fn grade_for(thresholds: &ChurnThresholds, avg_relocations: f64) -> ChurnGrade {
    if avg_relocations < thresholds.a_relocations {
        ChurnGrade::A
    } else if avg_relocations < thresholds.b_relocations {
        ChurnGrade::B
    } else if avg_relocations < thresholds.c_relocations {
        ChurnGrade::C
    } else {
        ChurnGrade::D
    }
}

// ---------------------------------------------------------------------------
// Scripted timelines
// ---------------------------------------------------------------------------

/// One step of a [`ScriptedTimeline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptStep {
    /// Advance toward `until` (in either direction) by `step` per frame,
    /// ending exactly on `until`.
    Play {
        /// Target position; the last frame lands exactly here.
        until: f64,
        /// Per-frame magnitude; must be positive.
        step: f64,
    },
    /// Jump directly to a position in one frame.
    Seek {
        /// Target position.
        to: f64,
    },
    /// Repeat the current position for a number of frames.
    Hold {
        /// How many frames to repeat.
        frames: u32,
    },
}

/// A deterministic sequence of timeline positions for driving a manager.
///
/// Yields the starting position first, then one position per frame as the
/// script plays out. The same script always produces the same sequence, so
/// runs can be recorded and replayed for comparison.
#[derive(Clone, Debug)]
pub struct ScriptedTimeline {
    steps: Vec<ScriptStep>,
    next_step: usize,
    position: f64,
    hold_left: u32,
    yielded_start: bool,
}

impl ScriptedTimeline {
    /// Creates a timeline starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if any `Play` step has a non-positive `step`.
    #[must_use]
    pub fn new(start: f64, steps: Vec<ScriptStep>) -> Self {
        for s in &steps {
            if let ScriptStep::Play { step, .. } = s {
                assert!(*step > 0.0, "Play step must be positive");
            }
        }
        Self {
            steps,
            next_step: 0,
            position: start,
            hold_left: 0,
            yielded_start: false,
        }
    }

    /// Returns the mirror script: the same positions visited in reverse,
    /// starting from the current script's final position.
    ///
    /// Useful for seek-symmetry tests: playing a script and then its mirror
    /// must leave every entry back in its original classification.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut position = self.position;
        let mut reversed: Vec<ScriptStep> = Vec::new();
        for s in &self.steps {
            match *s {
                ScriptStep::Play { until, step } => {
                    reversed.push(ScriptStep::Play {
                        until: position,
                        step,
                    });
                    position = until;
                }
                ScriptStep::Seek { to } => {
                    reversed.push(ScriptStep::Seek { to: position });
                    position = to;
                }
                ScriptStep::Hold { frames } => {
                    reversed.push(ScriptStep::Hold { frames });
                }
            }
        }
        reversed.reverse();
        Self::new(position, reversed)
    }
}

impl Iterator for ScriptedTimeline {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if !self.yielded_start {
            self.yielded_start = true;
            return Some(self.position);
        }

        if self.hold_left > 0 {
            self.hold_left -= 1;
            return Some(self.position);
        }

        loop {
            let step = *self.steps.get(self.next_step)?;
            match step {
                ScriptStep::Play { until, step } => {
                    if self.position == until {
                        self.next_step += 1;
                        continue;
                    }
                    let delta = until - self.position;
                    if delta.abs() <= step {
                        self.position = until;
                        self.next_step += 1;
                    } else if delta > 0.0 {
                        self.position += step;
                    } else {
                        self.position -= step;
                    }
                    return Some(self.position);
                }
                ScriptStep::Seek { to } => {
                    self.position = to;
                    self.next_step += 1;
                    return Some(self.position);
                }
                ScriptStep::Hold { frames } => {
                    self.next_step += 1;
                    if frames == 0 {
                        continue;
                    }
                    self.hold_left = frames - 1;
                    return Some(self.position);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recording listener
// ---------------------------------------------------------------------------

/// One recorded listener callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackRecord {
    /// The entry entered the active set.
    Activated(EntryId),
    /// The entry left the active set.
    Deactivated(EntryId),
    /// A boundary crossing was delivered for the entry.
    Crossed(EntryId, BoundaryKind, CrossingDirection),
}

/// A [`LifetimeListener`] that records the exact callback sequence.
#[derive(Debug, Default)]
pub struct RecordingListener {
    records: Vec<CallbackRecord>,
}

impl RecordingListener {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the records captured so far, in callback order.
    #[must_use]
    pub fn records(&self) -> &[CallbackRecord] {
        &self.records
    }

    /// Takes the captured records, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<CallbackRecord> {
        core::mem::take(&mut self.records)
    }
}

impl LifetimeListener for RecordingListener {
    fn on_become_active(&mut self, entry: EntryId, _ctx: &mut SweepContext<'_>) {
        self.records.push(CallbackRecord::Activated(entry));
    }

    fn on_become_inactive(&mut self, entry: EntryId, _ctx: &mut SweepContext<'_>) {
        self.records.push(CallbackRecord::Deactivated(entry));
    }

    fn on_boundary_crossed(&mut self, crossing: BoundaryCrossing, _ctx: &mut SweepContext<'_>) {
        self.records.push(CallbackRecord::Crossed(
            crossing.entry,
            crossing.kind,
            crossing.direction,
        ));
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use chron_core::interval::{LifetimeInterval, LifetimeState};
    use chron_core::manager::LifetimeManager;

    use super::*;

    #[test]
    fn churn_accumulates_and_grades() {
        let mut t = ChurnTracker::<8>::new(ChurnThresholds::interactive());
        let mut report = None;
        for _ in 0..10 {
            report = Some(t.observe(ChurnSample {
                considered: 5,
                relocated: 1,
                crossings: 1,
                active_len: 3,
            }));
        }
        let report = report.unwrap();
        assert_eq!(report.grade, ChurnGrade::A);
        assert_eq!(report.total_sweeps, 10);
        assert_eq!(report.total_relocations, 10);
        assert!((report.avg_relocations - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rescan_behavior_grades_d() {
        let mut t = ChurnTracker::<4>::new(ChurnThresholds::interactive());
        let report = t.observe(ChurnSample {
            considered: 1000,
            relocated: 1000,
            crossings: 0,
            active_len: 0,
        });
        // One huge sweep over a mostly-zero window still averages past C.
        assert_eq!(report.grade, ChurnGrade::D);
    }

    #[test]
    fn seek_heavy_thresholds_are_laxer() {
        let sample = ChurnSample {
            considered: 40,
            relocated: 10,
            crossings: 20,
            active_len: 5,
        };
        let mut strict = ChurnTracker::<1>::new(ChurnThresholds::interactive());
        let mut lax = ChurnTracker::<1>::new(ChurnThresholds::seek_heavy());
        assert_eq!(strict.observe(sample).grade, ChurnGrade::C);
        assert_eq!(lax.observe(sample).grade, ChurnGrade::A);
    }

    #[test]
    fn sparkline_has_window_width() {
        let mut t = ChurnTracker::<16>::default();
        let _ = t.observe(ChurnSample {
            considered: 2,
            relocated: 2,
            crossings: 0,
            active_len: 1,
        });
        assert_eq!(t.sparkline_ascii(0.0, 10.0).len(), 16);
    }

    #[test]
    fn script_plays_holds_and_seeks() {
        let script = ScriptedTimeline::new(
            0.0,
            vec![
                ScriptStep::Play {
                    until: 3.0,
                    step: 1.0,
                },
                ScriptStep::Hold { frames: 2 },
                ScriptStep::Seek { to: 10.0 },
            ],
        );
        let positions: Vec<f64> = script.collect();
        assert_eq!(positions, [0.0, 1.0, 2.0, 3.0, 3.0, 3.0, 10.0]);
    }

    #[test]
    fn script_plays_backward_and_clamps_the_last_frame() {
        let script = ScriptedTimeline::new(
            10.0,
            vec![ScriptStep::Play {
                until: 7.5,
                step: 1.0,
            }],
        );
        let positions: Vec<f64> = script.collect();
        assert_eq!(positions, [10.0, 9.0, 8.0, 7.5]);
    }

    #[test]
    fn mirrored_script_retraces_positions_in_reverse() {
        let script = ScriptedTimeline::new(
            0.0,
            vec![
                ScriptStep::Play {
                    until: 2.0,
                    step: 1.0,
                },
                ScriptStep::Seek { to: 10.0 },
            ],
        );
        let forward: Vec<f64> = script.clone().collect();
        let backward: Vec<f64> = script.mirrored().collect();
        let mut expected = forward;
        expected.reverse();
        assert_eq!(backward, expected);
    }

    #[test]
    fn replaying_a_mirrored_script_restores_classifications() {
        let mut manager = LifetimeManager::new(RecordingListener::new());
        let a = manager.add(LifetimeInterval::new(2.0, 6.0));
        let b = manager.add(LifetimeInterval::new(5.0, 9.0));

        let script = ScriptedTimeline::new(
            0.0,
            vec![ScriptStep::Play {
                until: 12.0,
                step: 1.0,
            }],
        );

        for t in script.clone() {
            manager.update_at(t);
        }
        assert_eq!(manager.state(a), LifetimeState::Past);
        assert_eq!(manager.state(b), LifetimeState::Past);
        let forward = manager.listener_mut().take();

        for t in script.mirrored() {
            manager.update_at(t);
        }
        assert_eq!(manager.state(a), LifetimeState::Future);
        assert_eq!(manager.state(b), LifetimeState::Future);
        let backward = manager.listener_mut().take();

        // Every forward crossing has a backward twin, and activations pair
        // with deactivations entry for entry.
        let forward_crossings = forward
            .iter()
            .filter(|r| matches!(r, CallbackRecord::Crossed(..)))
            .count();
        let backward_crossings = backward
            .iter()
            .filter(|r| matches!(r, CallbackRecord::Crossed(..)))
            .count();
        assert_eq!(forward_crossings, backward_crossings);
        assert!(
            backward
                .iter()
                .all(|r| !matches!(r, CallbackRecord::Crossed(_, _, CrossingDirection::Forward))),
            "rewinding must only produce backward crossings"
        );
    }

    #[test]
    fn recording_listener_preserves_order() {
        let mut manager = LifetimeManager::new(RecordingListener::new());
        let id = manager.add(LifetimeInterval::new(10.0, 20.0));
        manager.update_at(0.0);
        assert!(
            manager.listener().records().is_empty(),
            "initial classification is silent"
        );
        manager.update_at(15.0);
        assert_eq!(
            manager.listener().records(),
            [
                CallbackRecord::Activated(id),
                CallbackRecord::Crossed(id, BoundaryKind::Start, CrossingDirection::Forward),
            ]
        );
    }
}
