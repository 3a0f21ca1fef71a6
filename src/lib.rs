// Library interface for pacetrack modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod lap;
pub mod logging;
pub mod pace;
pub mod recovery;
pub mod series;
pub mod session;
pub mod stats;
pub mod stopwatch;

// Re-export commonly used types for convenience
pub use config::RunConfig;
pub use error::{PaceTrackError, Result};
pub use export::SessionReport;
pub use lap::{Lap, LapTracker, MarkListener, SegmentProgress};
pub use pace::{SegmentPace, Tier};
pub use recovery::{RecoveryEvent, RecoveryKind, RecoveryTimer};
pub use series::{
    PerformanceRecord, RunAssessment, SeriesController, SeriesPlan, SeriesProgress,
};
pub use session::{SessionEvent, TrainingSession};
pub use stats::{SpeedSummary, TierDistribution};
pub use stopwatch::{Stopwatch, StopwatchState, TimerSnapshot};
