//! Unified error hierarchy for pacetrack
//!
//! The core deliberately keeps its error surface small: invalid timer and
//! lap transitions are absorbed as no-ops (a coach double-tapping must never
//! crash a live session), so errors here are either rejected-at-the-boundary
//! configuration problems or soft misuse of the series controls.

use thiserror::Error;

/// Top-level error type for all pacetrack operations
#[derive(Debug, Error)]
pub enum PaceTrackError {
    /// Series creation with a zero series or repetition count
    #[error("Invalid series configuration: {total_series} series x {reps_per_series} repetitions (both must be at least 1)")]
    InvalidSeriesConfig {
        total_series: u32,
        reps_per_series: u32,
    },

    /// Series operation without an active series
    #[error("No active series")]
    NoActiveSeries,

    /// Run validation while a recovery countdown is still pending
    #[error("A recovery countdown is already pending")]
    RecoveryPending,

    /// Recovery completion/skip without a pending recovery
    #[error("No recovery countdown is pending")]
    NoPendingRecovery,

    /// Run validation with no assessment supplied and no laps to derive one
    #[error("No assessment available to validate")]
    MissingAssessment,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),
}

impl PaceTrackError {
    /// Soft errors report discarded input but leave all state intact;
    /// callers surface them to the user without aborting the session.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            PaceTrackError::NoActiveSeries
                | PaceTrackError::RecoveryPending
                | PaceTrackError::NoPendingRecovery
                | PaceTrackError::MissingAssessment
        )
    }
}

/// Result type alias for pacetrack operations
pub type Result<T> = std::result::Result<T, PaceTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_errors() {
        assert!(PaceTrackError::NoActiveSeries.is_soft());
        assert!(PaceTrackError::NoPendingRecovery.is_soft());
        assert!(!PaceTrackError::InvalidSeriesConfig {
            total_series: 0,
            reps_per_series: 3
        }
        .is_soft());
    }

    #[test]
    fn test_display_includes_counts() {
        let err = PaceTrackError::InvalidSeriesConfig {
            total_series: 0,
            reps_per_series: 4,
        };
        assert!(err.to_string().contains("0 series"));
        assert!(err.to_string().contains("4 repetitions"));
    }
}
