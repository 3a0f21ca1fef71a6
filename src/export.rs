//! Session report export
//!
//! Assembles the read-only projections into a report and writes it as JSON
//! (full report) or CSV (lap history only, for spreadsheet work). Reports
//! consume projections; nothing here feeds back into the live engine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::display::format_clock;
use crate::lap::Lap;
use crate::series::PerformanceRecord;
use crate::session::TrainingSession;
use crate::stats::{SpeedSummary, TierDistribution};

/// Report writing errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Snapshot of a session for reporting
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: RunConfig,
    pub target_speed_kmh: f64,
    pub laps: Vec<Lap>,
    pub performance_history: Vec<PerformanceRecord>,
    pub speed_summary: Option<SpeedSummary>,
    pub tier_distribution: TierDistribution,
    /// Free-form coach notes (conditions, feel, observations).
    pub notes: Option<String>,
}

impl SessionReport {
    /// Capture the session's current projections.
    pub fn from_session(session: &TrainingSession, notes: Option<String>) -> Self {
        SessionReport {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            config: session.config().clone(),
            target_speed_kmh: session.config().target_speed_kmh(),
            laps: session.laps().to_vec(),
            performance_history: session.performance_history().to_vec(),
            speed_summary: session.speed_summary(),
            tier_distribution: session.lap_tier_distribution(),
            notes,
        }
    }

    /// Write the full report as pretty-printed JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Write the lap history as CSV, one row per passage.
    pub fn write_laps_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "lap",
            "duration",
            "duration_seconds",
            "speed_kmh",
            "tier",
            "cumulative_seconds",
        ])?;
        for lap in &self.laps {
            writer.write_record(&[
                lap.lap_number.to_string(),
                format_clock(lap.duration_seconds),
                format!("{:.2}", lap.duration_seconds),
                format!("{:.2}", lap.observed_speed_kmh),
                lap.tier.to_string(),
                format!("{:.2}", lap.cumulative_elapsed_seconds),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn session_with_laps() -> TrainingSession {
        let t0 = Instant::now();
        let mut session = TrainingSession::new(RunConfig::default());
        session.start_at(t0);
        session.mark_at(t0 + Duration::from_secs(75));
        session.mark_at(t0 + Duration::from_secs(155));
        session
    }

    #[test]
    fn test_report_captures_projections() {
        let session = session_with_laps();
        let report = SessionReport::from_session(&session, Some("windy".to_string()));

        assert_eq!(report.laps.len(), 2);
        assert!((report.target_speed_kmh - 9.6).abs() < 1e-9);
        assert_eq!(report.tier_distribution.total(), 2);
        assert_eq!(report.speed_summary.unwrap().laps, 2);
        assert_eq!(report.notes.as_deref(), Some("windy"));
    }

    #[test]
    fn test_write_json() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("report.json");

        let report = SessionReport::from_session(&session_with_laps(), None);
        report.write_json(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["laps"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["config"]["track_length_m"], 200.0);
        assert_eq!(parsed["laps"][0]["tier"], "Excellent");
    }

    #[test]
    fn test_write_laps_csv() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("laps.csv");

        let report = SessionReport::from_session(&session_with_laps(), None);
        report.write_laps_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("lap,duration"));
        assert!(lines[1].contains("1:15.0"));
        assert!(lines[2].contains("Fair"));
    }

    #[test]
    fn test_empty_session_report() {
        let session = TrainingSession::new(RunConfig::default());
        let report = SessionReport::from_session(&session, None);
        assert!(report.laps.is_empty());
        assert!(report.speed_summary.is_none());
        assert_eq!(report.tier_distribution, TierDistribution::default());
    }
}
