//! Lap capture and per-passage speed classification
//!
//! A "mark" is the coach tapping as the runner crosses the observation line.
//! Each mark closes one segment: its duration comes from the stopwatch's
//! drift-free elapsed value, its observed speed from the segment distance,
//! and its tier from the deviation against the session target.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::config::RunConfig;
use crate::pace::{self, SegmentPace, Tier};
use crate::stopwatch::Stopwatch;

/// One observed passage, immutable once recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// 1-based, contiguous within a run.
    pub lap_number: u32,
    /// Time for this segment alone, seconds.
    pub duration_seconds: f64,
    /// Observed speed over the segment, km/h.
    pub observed_speed_kmh: f64,
    /// Qualitative deviation bucket against the target speed.
    pub tier: Tier,
    /// Stopwatch elapsed at the moment of the mark, seconds.
    pub cumulative_elapsed_seconds: f64,
}

/// Notification port for non-essential mark feedback
///
/// Platform adapters plug in haptics or audio here. The tracker never
/// depends on a listener being present.
pub trait MarkListener {
    /// A new lap was recorded.
    fn lap_marked(&mut self, lap: &Lap);

    /// The most recent lap was undone; `remaining` laps are left.
    fn lap_undone(&mut self, _remaining: usize) {}
}

/// Live progress through the current segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentProgress {
    /// Seconds since the last mark (or run start).
    pub elapsed_seconds: f64,
    /// Percentage of the target segment time consumed.
    pub percent: f64,
    /// Early / on-time / late band.
    pub pace: SegmentPace,
}

/// Ordered lap history for the current run
///
/// Owns its history exclusively; series-level accumulations live with the
/// session, so resetting a tracker never touches cross-run data.
pub struct LapTracker {
    observation_distance_m: f64,
    target_speed_kmh: f64,
    target_segment_seconds: f64,
    laps: Vec<Lap>,
    last_mark_elapsed_s: f64,
    current_tier: Option<Tier>,
    listener: Option<Box<dyn MarkListener>>,
}

impl LapTracker {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            observation_distance_m: config.observation_distance_m(),
            target_speed_kmh: config.target_speed_kmh(),
            target_segment_seconds: config.target_segment_seconds(),
            laps: Vec::new(),
            last_mark_elapsed_s: 0.0,
            current_tier: None,
            listener: None,
        }
    }

    /// Register the feedback port. Replaces any previous listener.
    pub fn set_listener(&mut self, listener: Box<dyn MarkListener>) {
        self.listener = Some(listener);
    }

    /// Detach the feedback port, e.g. to move it to a fresh tracker.
    pub fn take_listener(&mut self) -> Option<Box<dyn MarkListener>> {
        self.listener.take()
    }

    pub fn mark(&mut self, stopwatch: &mut Stopwatch) -> Option<Lap> {
        self.mark_at(stopwatch, Instant::now())
    }

    /// Record a passage at `now`.
    ///
    /// Only accepted while the stopwatch is actively running; marks while
    /// idle, paused, or after auto-stop are silent no-ops.
    pub fn mark_at(&mut self, stopwatch: &mut Stopwatch, now: Instant) -> Option<Lap> {
        let elapsed = stopwatch.sample_at(now);
        if !stopwatch.accepts_marks() {
            debug!(state = ?stopwatch.state(), "ignoring mark");
            return None;
        }

        let duration = elapsed - self.last_mark_elapsed_s;
        let observed_speed = pace::observed_speed_kmh(self.observation_distance_m, duration);
        let tier = Tier::from_deviation(observed_speed, self.target_speed_kmh);

        let lap = Lap {
            lap_number: self.laps.len() as u32 + 1,
            duration_seconds: duration,
            observed_speed_kmh: observed_speed,
            tier,
            cumulative_elapsed_seconds: elapsed,
        };

        self.laps.push(lap.clone());
        self.last_mark_elapsed_s = elapsed;
        self.current_tier = Some(tier);

        if let Some(listener) = self.listener.as_mut() {
            listener.lap_marked(&lap);
        }

        Some(lap)
    }

    /// Remove the most recent lap, restoring the previous baseline and tier.
    ///
    /// Returns `false` on an empty history.
    pub fn undo_last(&mut self) -> bool {
        if self.laps.pop().is_none() {
            debug!("ignoring undo on empty lap history");
            return false;
        }

        self.last_mark_elapsed_s = self
            .laps
            .last()
            .map(|lap| lap.cumulative_elapsed_seconds)
            .unwrap_or(0.0);
        self.current_tier = self.laps.last().map(|lap| lap.tier);

        if let Some(listener) = self.listener.as_mut() {
            listener.lap_undone(self.laps.len());
        }

        true
    }

    /// Clear lap history and baseline for the next repetition.
    pub fn reset_for_new_run(&mut self) {
        self.laps.clear();
        self.last_mark_elapsed_s = 0.0;
        self.current_tier = None;
    }

    pub fn segment_progress(&self, stopwatch: &mut Stopwatch) -> SegmentProgress {
        self.segment_progress_at(stopwatch, Instant::now())
    }

    /// Progress through the current segment at `now`.
    pub fn segment_progress_at(&self, stopwatch: &mut Stopwatch, now: Instant) -> SegmentProgress {
        let elapsed = stopwatch.sample_at(now) - self.last_mark_elapsed_s;
        let percent = if self.target_segment_seconds > 0.0 {
            elapsed / self.target_segment_seconds * 100.0
        } else {
            0.0
        };
        SegmentProgress {
            elapsed_seconds: elapsed,
            percent,
            pace: SegmentPace::from_progress_percent(percent),
        }
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn last_lap(&self) -> Option<&Lap> {
        self.laps.last()
    }

    /// Tier of the most recent lap; `None` before the first mark.
    pub fn current_tier(&self) -> Option<Tier> {
        self.current_tier
    }

    pub fn last_mark_elapsed_s(&self) -> f64 {
        self.last_mark_elapsed_s
    }

    /// Distance covered by the recorded laps, meters.
    pub fn distance_covered_m(&self) -> f64 {
        self.laps.len() as f64 * self.observation_distance_m
    }

    pub fn observation_distance_m(&self) -> f64 {
        self.observation_distance_m
    }

    pub fn target_speed_kmh(&self) -> f64 {
        self.target_speed_kmh
    }
}
