//! Recovery countdown between repetitions and series
//!
//! A one-shot timer counting down at 1 Hz, with a single get-ready warning
//! near the end. Once it completes, is skipped, or is cancelled it goes
//! inert: further ticks return nothing and mutate nothing, so a stale tick
//! can never resurrect a finished countdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Remaining seconds at which the get-ready warning fires.
pub const WARNING_THRESHOLD_S: f64 = 15.0;

/// Which gap in the training structure this countdown covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryKind {
    /// Between repetitions within one series.
    Rep,
    /// Between two series.
    Series,
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryKind::Rep => write!(f, "repetition"),
            RecoveryKind::Series => write!(f, "series"),
        }
    }
}

/// Events surfaced by the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// Remaining time crossed the warning threshold. Fired at most once.
    Warning,
    /// Countdown reached zero or was skipped.
    Completed,
}

/// One-shot recovery countdown
#[derive(Debug)]
pub struct RecoveryTimer {
    kind: RecoveryKind,
    initial_s: f64,
    remaining_s: f64,
    warned: bool,
    finished: bool,
}

impl RecoveryTimer {
    pub fn new(kind: RecoveryKind, duration_s: f64) -> Self {
        let duration = duration_s.max(0.0);
        Self {
            kind,
            initial_s: duration,
            remaining_s: duration,
            warned: false,
            finished: false,
        }
    }

    pub fn kind(&self) -> RecoveryKind {
        self.kind
    }

    pub fn remaining_seconds(&self) -> f64 {
        self.remaining_s
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Fraction of the countdown already consumed, 0-100.
    pub fn progress_percent(&self) -> f64 {
        if self.initial_s <= 0.0 {
            return 100.0;
        }
        (self.initial_s - self.remaining_s) / self.initial_s * 100.0
    }

    /// Advance one 1 Hz tick.
    ///
    /// A warning only exists for countdowns longer than the threshold; a
    /// short countdown goes straight to completion.
    pub fn tick(&mut self) -> Option<RecoveryEvent> {
        if self.finished {
            return None;
        }

        self.remaining_s = (self.remaining_s - 1.0).max(0.0);

        if self.remaining_s <= 0.0 {
            self.finished = true;
            debug!(kind = %self.kind, "recovery countdown complete");
            return Some(RecoveryEvent::Completed);
        }

        if !self.warned
            && self.initial_s > WARNING_THRESHOLD_S
            && self.remaining_s <= WARNING_THRESHOLD_S
        {
            self.warned = true;
            return Some(RecoveryEvent::Warning);
        }

        None
    }

    /// End the countdown immediately with the same completion signal as
    /// reaching zero. Returns `None` if already finished.
    pub fn skip(&mut self) -> Option<RecoveryEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.remaining_s = 0.0;
        debug!(kind = %self.kind, "recovery countdown skipped");
        Some(RecoveryEvent::Completed)
    }

    /// Tear down without signalling completion (series cancelled).
    pub fn cancel(&mut self) {
        self.finished = true;
        self.remaining_s = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_to_completion() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 3.0);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_seconds(), 2.0);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), Some(RecoveryEvent::Completed));
        assert!(timer.is_finished());
    }

    #[test]
    fn test_inert_after_completion() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 1.0);
        assert_eq!(timer.tick(), Some(RecoveryEvent::Completed));
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.skip(), None);
        assert_eq!(timer.remaining_seconds(), 0.0);
    }

    #[test]
    fn test_warning_fires_exactly_once() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Series, 17.0);
        assert_eq!(timer.tick(), None); // 16
        assert_eq!(timer.tick(), Some(RecoveryEvent::Warning)); // 15
        for _ in 0..14 {
            assert_eq!(timer.tick(), None);
        }
        assert_eq!(timer.tick(), Some(RecoveryEvent::Completed));
    }

    #[test]
    fn test_no_warning_for_short_countdown() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 10.0);
        let mut events = Vec::new();
        while !timer.is_finished() {
            if let Some(event) = timer.tick() {
                events.push(event);
            }
        }
        assert_eq!(events, vec![RecoveryEvent::Completed]);
    }

    #[test]
    fn test_skip_signals_completion() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Series, 90.0);
        timer.tick();
        assert_eq!(timer.skip(), Some(RecoveryEvent::Completed));
        assert!(timer.is_finished());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn test_cancel_is_silent() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 30.0);
        timer.cancel();
        assert!(timer.is_finished());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn test_zero_duration_completes_on_first_tick() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 0.0);
        assert_eq!(timer.tick(), Some(RecoveryEvent::Completed));
    }

    #[test]
    fn test_progress_percent() {
        let mut timer = RecoveryTimer::new(RecoveryKind::Rep, 20.0);
        assert_eq!(timer.progress_percent(), 0.0);
        for _ in 0..5 {
            timer.tick();
        }
        assert!((timer.progress_percent() - 25.0).abs() < 1e-9);
    }
}
