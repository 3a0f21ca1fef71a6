//! Live training session orchestration
//!
//! `TrainingSession` is the single entry point the presentation layer talks
//! to. It owns the per-run stopwatch/tracker pair, the series controller,
//! and the recovery countdown, and serializes every stimulus (taps, ticks)
//! through `&mut self` — the whole engine runs on one logical thread.
//!
//! Each repetition gets a fresh stopwatch/tracker pair; the old pair is
//! dropped, which is also what guarantees no stale tick can touch a
//! finished run.

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{PaceTrackError, Result};
use crate::lap::{Lap, LapTracker, MarkListener, SegmentProgress};
use crate::pace::{self, Tier};
use crate::recovery::{RecoveryEvent, RecoveryKind, RecoveryTimer};
use crate::series::{
    PerformanceRecord, RunAssessment, SeriesController, SeriesPlan, SeriesProgress,
    ValidationOutcome,
};
use crate::stats::{SpeedSummary, TierDistribution};
use crate::stopwatch::{Stopwatch, StopwatchState, TimerSnapshot};

/// Notable transitions surfaced to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The run reached its configured duration and stopped itself.
    RunAutoStopped,
    /// A recovery countdown crossed its get-ready threshold.
    RecoveryWarning { kind: RecoveryKind },
    /// A recovery countdown finished (naturally or skipped); run controls
    /// may be re-enabled.
    RecoveryComplete { kind: RecoveryKind },
    /// Every repetition of the series has been validated.
    SeriesComplete,
}

/// One coach-facing training session
pub struct TrainingSession {
    config: RunConfig,
    stopwatch: Stopwatch,
    tracker: LapTracker,
    series: SeriesController,
    recovery: Option<RecoveryTimer>,
}

impl TrainingSession {
    pub fn new(config: RunConfig) -> Self {
        let stopwatch = Stopwatch::new(config.total_duration_seconds());
        let tracker = LapTracker::new(&config);
        Self {
            config,
            stopwatch,
            tracker,
            series: SeriesController::new(),
            recovery: None,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Swap the configuration between runs.
    ///
    /// Ignored while a run is live: the configuration is immutable per run.
    /// Applying it discards the current lap history, like the original
    /// control panel does when parameters change.
    pub fn set_config(&mut self, config: RunConfig) {
        if self.stopwatch.is_running() {
            debug!("ignoring config change during a live run");
            return;
        }
        self.config = config;
        self.fresh_run();
    }

    /// Register the optional mark-feedback port (haptics, audio).
    pub fn set_mark_listener(&mut self, listener: Box<dyn MarkListener>) {
        self.tracker.set_listener(listener);
    }

    // Run controls

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Begin a run. Ignored mid-run or while a recovery countdown holds the
    /// controls; a start after a finished run begins with a clean history.
    pub fn start_at(&mut self, now: Instant) {
        if self.recovery.is_some() {
            debug!("ignoring start during recovery");
            return;
        }
        if self.stopwatch.is_running() {
            debug!("ignoring start during a live run");
            return;
        }
        self.fresh_run();
        self.stopwatch.start_at(now);
        info!("run started");
    }

    pub fn pause_or_resume(&mut self) {
        self.pause_or_resume_at(Instant::now());
    }

    /// Toggle pause. Ignored unless a run is live.
    pub fn pause_or_resume_at(&mut self, now: Instant) {
        match self.stopwatch.state() {
            StopwatchState::Running => self.stopwatch.pause_at(now),
            StopwatchState::Paused => self.stopwatch.resume_at(now),
            _ => debug!("ignoring pause/resume with no live run"),
        }
    }

    /// Abandon the current run: timer zeroed, lap history discarded. The
    /// series structure, if any, is untouched.
    pub fn stop_and_reset(&mut self) {
        self.stopwatch.reset();
        self.fresh_run();
        debug!("run stopped and reset");
    }

    /// Full clear: run, series structure, history, pending recovery.
    pub fn reset_all(&mut self) {
        if let Some(timer) = self.recovery.as_mut() {
            timer.cancel();
        }
        self.recovery = None;
        self.series.cancel();
        self.stopwatch.reset();
        self.fresh_run();
        info!("session fully reset");
    }

    pub fn mark(&mut self) -> Option<Lap> {
        self.mark_at(Instant::now())
    }

    /// Record a passage. No-op while idle, paused, finished, or during
    /// recovery.
    pub fn mark_at(&mut self, now: Instant) -> Option<Lap> {
        if self.recovery.is_some() {
            debug!("ignoring mark during recovery");
            return None;
        }
        self.tracker.mark_at(&mut self.stopwatch, now)
    }

    /// Undo the most recent passage.
    pub fn undo_last(&mut self) -> bool {
        self.tracker.undo_last()
    }

    // Series controls

    /// Install a new series structure and arm the first repetition.
    pub fn create_series(
        &mut self,
        total_series: u32,
        reps_per_series: u32,
        recovery_between_reps_s: f64,
        recovery_between_series_s: f64,
    ) -> Result<()> {
        self.series.create_series(
            total_series,
            reps_per_series,
            recovery_between_reps_s,
            recovery_between_series_s,
        )?;
        self.recovery = None;
        self.stopwatch.reset();
        self.fresh_run();
        Ok(())
    }

    /// Drop the series structure and abandon the current run.
    pub fn cancel_series(&mut self) {
        if let Some(timer) = self.recovery.as_mut() {
            timer.cancel();
        }
        self.recovery = None;
        self.series.cancel();
        self.stopwatch.reset();
        self.fresh_run();
    }

    /// Derive an assessment of the current run from its lap history.
    pub fn assessment_from_laps(&self) -> Option<RunAssessment> {
        let last = self.tracker.last_lap()?;
        let distance = self.tracker.distance_covered_m();
        let elapsed = last.cumulative_elapsed_seconds;
        let speed = pace::observed_speed_kmh(distance, elapsed);
        let vma_percent_achieved = if self.config.vma_kmh > 0.0 {
            speed / self.config.vma_kmh * 100.0
        } else {
            0.0
        };
        Some(RunAssessment {
            distance_m: distance,
            speed_kmh: speed,
            vma_percent_achieved,
            tier: Tier::from_deviation(speed, self.config.target_speed_kmh()),
        })
    }

    /// Validate the finished run against the series structure.
    ///
    /// With `None`, the assessment is derived from the lap history. A
    /// non-terminal validation resets the run pair and starts the recovery
    /// countdown; the terminal one reports [`SessionEvent::SeriesComplete`].
    pub fn validate_performance(
        &mut self,
        assessment: Option<RunAssessment>,
    ) -> Result<Option<SessionEvent>> {
        let assessment = match assessment.or_else(|| self.assessment_from_laps()) {
            Some(assessment) => assessment,
            None => return Err(PaceTrackError::MissingAssessment),
        };

        match self.series.validate(assessment)? {
            ValidationOutcome::Recovery { kind, duration_s } => {
                self.stopwatch.reset();
                self.fresh_run();
                self.recovery = Some(RecoveryTimer::new(kind, duration_s));
                info!(%kind, duration_s, "recovery started");
                Ok(None)
            }
            ValidationOutcome::SeriesComplete => Ok(Some(SessionEvent::SeriesComplete)),
        }
    }

    // Recovery controls

    /// End the pending recovery early, committing the staged progress.
    pub fn skip_recovery(&mut self) -> Result<SessionEvent> {
        let timer = self
            .recovery
            .as_mut()
            .ok_or(PaceTrackError::NoPendingRecovery)?;
        let kind = timer.kind();
        timer.skip();
        self.recovery = None;
        self.series.on_recovery_skip()?;
        Ok(SessionEvent::RecoveryComplete { kind })
    }

    pub fn tick(&mut self) -> Vec<SessionEvent> {
        self.tick_at(Instant::now())
    }

    /// Cooperative 1 Hz heartbeat.
    ///
    /// Samples the stopwatch (detecting auto-stop) and advances the recovery
    /// countdown. Late or missed ticks never corrupt elapsed time — only
    /// the countdown's display cadence depends on them.
    pub fn tick_at(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        let was_live = self.stopwatch.accepts_marks();
        self.stopwatch.sample_at(now);
        if was_live && self.stopwatch.state() == StopwatchState::Stopped {
            events.push(SessionEvent::RunAutoStopped);
        }

        if let Some(timer) = self.recovery.as_mut() {
            let kind = timer.kind();
            match timer.tick() {
                Some(RecoveryEvent::Warning) => {
                    events.push(SessionEvent::RecoveryWarning { kind });
                }
                Some(RecoveryEvent::Completed) => {
                    self.recovery = None;
                    match self.series.on_recovery_complete() {
                        Ok(progress) => {
                            debug!(series = progress.series, rep = progress.rep, "recovery over");
                            events.push(SessionEvent::RecoveryComplete { kind });
                        }
                        Err(err) => warn!(%err, "recovery completed with nothing staged"),
                    }
                }
                None => {}
            }
        }

        events
    }

    // Read-only projections

    pub fn timer_snapshot(&mut self) -> TimerSnapshot {
        self.stopwatch.snapshot()
    }

    pub fn timer_snapshot_at(&mut self, now: Instant) -> TimerSnapshot {
        self.stopwatch.snapshot_at(now)
    }

    pub fn segment_progress_at(&mut self, now: Instant) -> SegmentProgress {
        self.tracker.segment_progress_at(&mut self.stopwatch, now)
    }

    pub fn laps(&self) -> &[Lap] {
        self.tracker.laps()
    }

    pub fn last_lap(&self) -> Option<&Lap> {
        self.tracker.last_lap()
    }

    pub fn current_tier(&self) -> Option<Tier> {
        self.tracker.current_tier()
    }

    pub fn speed_summary(&self) -> Option<SpeedSummary> {
        SpeedSummary::from_laps(self.tracker.laps())
    }

    pub fn lap_tier_distribution(&self) -> TierDistribution {
        TierDistribution::from_laps(self.tracker.laps())
    }

    pub fn performance_tier_distribution(&self) -> TierDistribution {
        TierDistribution::from_tiers(self.series.history().iter().map(|record| record.tier))
    }

    pub fn series_plan(&self) -> Option<&SeriesPlan> {
        self.series.plan()
    }

    pub fn series_progress(&self) -> SeriesProgress {
        self.series.progress()
    }

    pub fn staged_progress(&self) -> Option<SeriesProgress> {
        self.series.staged_progress()
    }

    pub fn performance_history(&self) -> &[PerformanceRecord] {
        self.series.history()
    }

    pub fn is_series_active(&self) -> bool {
        self.series.is_active()
    }

    pub fn is_series_complete(&self) -> bool {
        self.series.is_complete()
    }

    pub fn is_series_fully_validated(&self) -> bool {
        self.series.is_fully_validated()
    }

    pub fn in_recovery(&self) -> bool {
        self.recovery.is_some()
    }

    pub fn recovery_kind(&self) -> Option<RecoveryKind> {
        self.recovery.as_ref().map(|timer| timer.kind())
    }

    pub fn recovery_remaining_s(&self) -> Option<f64> {
        self.recovery.as_ref().map(|timer| timer.remaining_seconds())
    }

    /// Discard the current run pair and arm a pristine one, carrying the
    /// mark listener over.
    fn fresh_run(&mut self) {
        let listener = self.tracker.take_listener();
        self.stopwatch = Stopwatch::new(self.config.total_duration_seconds());
        self.tracker = LapTracker::new(&self.config);
        if let Some(listener) = listener {
            self.tracker.set_listener(listener);
        }
    }
}
