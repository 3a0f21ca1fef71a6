//! Series/repetition progression and performance history
//!
//! A training structure of `total_series` series of `reps_per_series` timed
//! runs, separated by recovery countdowns. Progress advances in two phases:
//! validating a run stages the next (series, rep) pair and names the
//! recovery to insert; the staged pair is committed only when that recovery
//! completes or is skipped. Until the commit, readouts keep showing the
//! just-finished run's position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PaceTrackError, Result};
use crate::pace::Tier;
use crate::recovery::RecoveryKind;

/// Shape of one training structure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPlan {
    pub total_series: u32,
    pub reps_per_series: u32,
    pub recovery_between_reps_s: f64,
    pub recovery_between_series_s: f64,
}

/// Position within the training structure, both coordinates 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesProgress {
    pub series: u32,
    pub rep: u32,
}

/// A coach's summary of one finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunAssessment {
    /// Distance actually covered, meters.
    pub distance_m: f64,
    /// Average observed speed, km/h.
    pub speed_kmh: f64,
    /// Observed speed as a percentage of the runner's VMA.
    pub vma_percent_achieved: f64,
    /// Deviation bucket against the session target.
    pub tier: Tier,
}

/// One validated run in the performance history, append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub series: u32,
    pub rep: u32,
    pub distance_m: f64,
    pub speed_kmh: f64,
    pub vma_percent_achieved: f64,
    pub tier: Tier,
    pub recorded_at: DateTime<Utc>,
}

/// What a successful validation asks the caller to do next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationOutcome {
    /// Start a recovery countdown of this kind and duration.
    Recovery { kind: RecoveryKind, duration_s: f64 },
    /// All repetitions are validated; nothing left to run.
    SeriesComplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControllerState {
    Inactive,
    Active,
    RecoveryPending,
    Complete,
}

/// Orchestrates the series structure and owns the performance history
pub struct SeriesController {
    state: ControllerState,
    plan: Option<SeriesPlan>,
    progress: SeriesProgress,
    staged: Option<SeriesProgress>,
    history: Vec<PerformanceRecord>,
}

impl Default for SeriesController {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesController {
    pub fn new() -> Self {
        Self {
            state: ControllerState::Inactive,
            plan: None,
            progress: SeriesProgress { series: 1, rep: 1 },
            staged: None,
            history: Vec::new(),
        }
    }

    /// Begin a new training structure at series 1, repetition 1.
    ///
    /// Rejects zero counts with the controller untouched. Recovery
    /// durations of zero are legal (back-to-back runs).
    pub fn create_series(
        &mut self,
        total_series: u32,
        reps_per_series: u32,
        recovery_between_reps_s: f64,
        recovery_between_series_s: f64,
    ) -> Result<()> {
        if total_series < 1 || reps_per_series < 1 {
            return Err(PaceTrackError::InvalidSeriesConfig {
                total_series,
                reps_per_series,
            });
        }

        self.plan = Some(SeriesPlan {
            total_series,
            reps_per_series,
            recovery_between_reps_s: recovery_between_reps_s.max(0.0),
            recovery_between_series_s: recovery_between_series_s.max(0.0),
        });
        self.progress = SeriesProgress { series: 1, rep: 1 };
        self.staged = None;
        self.history.clear();
        self.state = ControllerState::Active;
        info!(total_series, reps_per_series, "series created");
        Ok(())
    }

    /// Discard the structure, its progress, and its history.
    pub fn cancel(&mut self) {
        self.state = ControllerState::Inactive;
        self.plan = None;
        self.staged = None;
        self.progress = SeriesProgress { series: 1, rep: 1 };
        self.history.clear();
        debug!("series cancelled");
    }

    /// Record the current run's assessment and decide what follows.
    ///
    /// Non-terminal validations stage the next position without committing
    /// it; terminal validation transitions to Complete with progress
    /// untouched.
    pub fn validate(&mut self, assessment: RunAssessment) -> Result<ValidationOutcome> {
        let plan = match (self.state, self.plan) {
            (ControllerState::Active, Some(plan)) => plan,
            (ControllerState::RecoveryPending, _) => return Err(PaceTrackError::RecoveryPending),
            _ => return Err(PaceTrackError::NoActiveSeries),
        };

        self.history.push(PerformanceRecord {
            series: self.progress.series,
            rep: self.progress.rep,
            distance_m: assessment.distance_m,
            speed_kmh: assessment.speed_kmh,
            vma_percent_achieved: assessment.vma_percent_achieved,
            tier: assessment.tier,
            recorded_at: Utc::now(),
        });

        let outcome = if self.progress.rep < plan.reps_per_series {
            self.staged = Some(SeriesProgress {
                series: self.progress.series,
                rep: self.progress.rep + 1,
            });
            self.state = ControllerState::RecoveryPending;
            ValidationOutcome::Recovery {
                kind: RecoveryKind::Rep,
                duration_s: plan.recovery_between_reps_s,
            }
        } else if self.progress.series < plan.total_series {
            self.staged = Some(SeriesProgress {
                series: self.progress.series + 1,
                rep: 1,
            });
            self.state = ControllerState::RecoveryPending;
            ValidationOutcome::Recovery {
                kind: RecoveryKind::Series,
                duration_s: plan.recovery_between_series_s,
            }
        } else {
            self.state = ControllerState::Complete;
            info!(records = self.history.len(), "series fully validated");
            ValidationOutcome::SeriesComplete
        };

        debug!(
            series = self.progress.series,
            rep = self.progress.rep,
            ?outcome,
            "run validated"
        );
        Ok(outcome)
    }

    /// Commit the staged position after a natural recovery completion.
    pub fn on_recovery_complete(&mut self) -> Result<SeriesProgress> {
        self.commit_staged()
    }

    /// Commit the staged position after a user skip. Behaviorally identical
    /// to natural completion; only the countdown ends earlier.
    pub fn on_recovery_skip(&mut self) -> Result<SeriesProgress> {
        self.commit_staged()
    }

    fn commit_staged(&mut self) -> Result<SeriesProgress> {
        match (self.state, self.staged.take()) {
            (ControllerState::RecoveryPending, Some(next)) => {
                self.progress = next;
                self.state = ControllerState::Active;
                debug!(series = next.series, rep = next.rep, "progress committed");
                Ok(next)
            }
            _ => Err(PaceTrackError::NoPendingRecovery),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, ControllerState::Inactive)
    }

    /// True once the current position is the last repetition of the last
    /// series. This precedes the final validation: pair with
    /// [`is_fully_validated`](Self::is_fully_validated) to detect true
    /// completion.
    pub fn is_complete(&self) -> bool {
        match self.plan {
            Some(plan) => {
                self.progress.series == plan.total_series
                    && self.progress.rep == plan.reps_per_series
            }
            None => false,
        }
    }

    /// True once the final run's performance has been recorded.
    pub fn is_fully_validated(&self) -> bool {
        self.state == ControllerState::Complete
    }

    pub fn progress(&self) -> SeriesProgress {
        self.progress
    }

    /// The position that will become current once the pending recovery
    /// commits, shown as "next up" during the countdown.
    pub fn staged_progress(&self) -> Option<SeriesProgress> {
        self.staged
    }

    pub fn plan(&self) -> Option<&SeriesPlan> {
        self.plan.as_ref()
    }

    pub fn history(&self) -> &[PerformanceRecord] {
        &self.history
    }
}
