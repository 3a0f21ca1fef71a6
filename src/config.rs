//! Session configuration and derived pace targets

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PaceTrackError;
use crate::pace;

/// Configuration for one run-set
///
/// Immutable while a run is live; derived targets are recomputed on demand
/// so a config edit between runs is picked up automatically. `vma_percent`
/// is conventionally 60-120 but deliberately not hard-enforced: coaches
/// overshoot it transiently while adjusting controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Track loop length in meters.
    pub track_length_m: f64,

    /// Runner's maximal aerobic speed in km/h.
    pub vma_kmh: f64,

    /// Prescribed percentage of VMA for this session.
    pub vma_percent: f64,

    /// Run duration in minutes.
    pub duration_minutes: f64,

    /// Distance between track markers in meters.
    pub marker_distance_m: f64,

    /// Observe passages every half-lap instead of every lap.
    pub observe_half_lap: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            track_length_m: 200.0,
            vma_kmh: 12.0,
            vma_percent: 80.0,
            duration_minutes: 3.0,
            marker_distance_m: 10.0,
            observe_half_lap: false,
        }
    }
}

impl RunConfig {
    /// Target speed for this session in km/h.
    pub fn target_speed_kmh(&self) -> f64 {
        pace::target_speed_kmh(self.vma_kmh, self.vma_percent)
    }

    /// Distance of one observation segment (lap or half-lap) in meters.
    pub fn observation_distance_m(&self) -> f64 {
        if self.observe_half_lap {
            self.track_length_m / 2.0
        } else {
            self.track_length_m
        }
    }

    /// Target time for one observation segment in seconds.
    pub fn target_segment_seconds(&self) -> f64 {
        pace::segment_time_s(self.observation_distance_m(), self.target_speed_kmh())
    }

    /// Run duration in seconds.
    pub fn total_duration_seconds(&self) -> f64 {
        self.duration_minutes * 60.0
    }

    /// Distance the runner should cover over the full duration, meters.
    pub fn planned_distance_m(&self) -> f64 {
        pace::total_distance_m(self.target_speed_kmh(), self.duration_minutes)
    }

    /// Planned distance decomposed into full laps plus marker count.
    pub fn planned_laps_and_markers(&self) -> (u32, u32) {
        let (laps, remainder) =
            pace::laps_and_remainder(self.planned_distance_m(), self.track_length_m);
        let markers = pace::markers_from_remainder(remainder, self.marker_distance_m);
        (laps, markers)
    }

    /// Reject configurations that cannot describe a run at all.
    pub fn validate(&self) -> std::result::Result<(), PaceTrackError> {
        fn positive(value: f64, field: &str) -> std::result::Result<(), PaceTrackError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(PaceTrackError::Config(format!(
                    "{} must be positive, got {}",
                    field, value
                )))
            }
        }

        positive(self.track_length_m, "track_length_m")?;
        positive(self.vma_kmh, "vma_kmh")?;
        positive(self.duration_minutes, "duration_minutes")?;
        positive(self.marker_distance_m, "marker_distance_m")?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: RunConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.as_ref().display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize configuration")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pacetrack")
            .join("config.toml")
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_config_path()).unwrap_or_default()
    }
}
