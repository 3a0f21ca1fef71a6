//! Run stopwatch with drift-free elapsed accounting
//!
//! The elapsed value is never incremented tick by tick: every sample
//! recomputes `now - start - accumulated_pause` from monotonic instants, so
//! late or missed samples only delay the display, never corrupt the value.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

/// Stopwatch lifecycle states
///
/// `Stopped` is reached only by running out the configured duration; the
/// readout stays frozen at the total until an explicit `start` or `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    Idle,
    Running,
    Paused,
    Stopped,
}

/// Point-in-time readout for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub elapsed_seconds: f64,
    pub remaining_seconds: f64,
    pub is_running: bool,
    pub is_paused: bool,
}

/// Elapsed/remaining-time tracker for a single run
///
/// Transitions outside their valid source state are silent no-ops, matching
/// the tolerance the touch UI needs for double-taps. Every time-dependent
/// method has an `_at(Instant)` form; the plain form samples `Instant::now()`.
#[derive(Debug)]
pub struct Stopwatch {
    state: StopwatchState,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    accumulated_pause: Duration,
    total_duration_s: f64,
}

impl Stopwatch {
    /// Create an idle stopwatch for a run of `total_duration_s` seconds.
    pub fn new(total_duration_s: f64) -> Self {
        Self {
            state: StopwatchState::Idle,
            started_at: None,
            paused_at: None,
            accumulated_pause: Duration::ZERO,
            total_duration_s: total_duration_s.max(0.0),
        }
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    /// Running or paused mid-run.
    pub fn is_running(&self) -> bool {
        matches!(self.state, StopwatchState::Running | StopwatchState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == StopwatchState::Paused
    }

    /// Marks are only accepted while actively running.
    pub fn accepts_marks(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn total_duration_s(&self) -> f64 {
        self.total_duration_s
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin the run. Valid from Idle or Stopped; otherwise a no-op.
    pub fn start_at(&mut self, now: Instant) {
        match self.state {
            StopwatchState::Idle | StopwatchState::Stopped => {
                self.started_at = Some(now);
                self.paused_at = None;
                self.accumulated_pause = Duration::ZERO;
                self.state = StopwatchState::Running;
            }
            _ => debug!(state = ?self.state, "ignoring start"),
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    /// Freeze elapsed accumulation. Valid from Running; otherwise a no-op.
    pub fn pause_at(&mut self, now: Instant) {
        match self.state {
            StopwatchState::Running => {
                self.paused_at = Some(now);
                self.state = StopwatchState::Paused;
            }
            _ => debug!(state = ?self.state, "ignoring pause"),
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    /// Fold the pause span into the accumulated total and keep running.
    /// Valid from Paused; otherwise a no-op.
    pub fn resume_at(&mut self, now: Instant) {
        match (self.state, self.paused_at) {
            (StopwatchState::Paused, Some(paused_at)) => {
                self.accumulated_pause += now.saturating_duration_since(paused_at);
                self.paused_at = None;
                self.state = StopwatchState::Running;
            }
            _ => debug!(state = ?self.state, "ignoring resume"),
        }
    }

    /// Return to Idle with the elapsed value zeroed and references cleared.
    pub fn reset(&mut self) {
        self.state = StopwatchState::Idle;
        self.started_at = None;
        self.paused_at = None;
        self.accumulated_pause = Duration::ZERO;
    }

    pub fn sample(&mut self) -> f64 {
        self.sample_at(Instant::now())
    }

    /// Recompute elapsed seconds at `now`.
    ///
    /// Reaching the configured total auto-transitions to Stopped and pins
    /// the readout at exactly the total, never the overshoot.
    pub fn sample_at(&mut self, now: Instant) -> f64 {
        let raw = match (self.state, self.started_at) {
            (StopwatchState::Stopped, _) => return self.total_duration_s,
            (StopwatchState::Idle, _) | (_, None) => return 0.0,
            (StopwatchState::Paused, Some(started_at)) => {
                let frozen_at = self.paused_at.unwrap_or(now);
                Self::elapsed_between(started_at, frozen_at, self.accumulated_pause)
            }
            (StopwatchState::Running, Some(started_at)) => {
                Self::elapsed_between(started_at, now, self.accumulated_pause)
            }
        };

        if raw >= self.total_duration_s {
            self.state = StopwatchState::Stopped;
            self.started_at = None;
            self.paused_at = None;
            self.accumulated_pause = Duration::ZERO;
            debug!(total = self.total_duration_s, "run duration reached, auto-stop");
            return self.total_duration_s;
        }
        raw
    }

    pub fn remaining(&mut self) -> f64 {
        self.remaining_at(Instant::now())
    }

    /// Seconds left before auto-stop, clamped at zero.
    pub fn remaining_at(&mut self, now: Instant) -> f64 {
        (self.total_duration_s - self.sample_at(now)).max(0.0)
    }

    pub fn snapshot(&mut self) -> TimerSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&mut self, now: Instant) -> TimerSnapshot {
        let elapsed = self.sample_at(now);
        TimerSnapshot {
            elapsed_seconds: elapsed,
            remaining_seconds: (self.total_duration_s - elapsed).max(0.0),
            is_running: self.is_running(),
            is_paused: self.is_paused(),
        }
    }

    fn elapsed_between(started_at: Instant, until: Instant, pause: Duration) -> f64 {
        until
            .saturating_duration_since(started_at)
            .saturating_sub(pause)
            .as_secs_f64()
    }
}
