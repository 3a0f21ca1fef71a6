//! Pace arithmetic for VMA-based track work
//!
//! All functions here are pure: no state, no clock reads, identical output
//! for identical input. Speeds are km/h, distances meters, times seconds.
//!
//! # Sports Science Background
//!
//! VMA (vitesse maximale aérobie) is the runner's maximal aerobic speed in
//! km/h. Track sessions are prescribed as a percentage of VMA over a fixed
//! duration; the coach observes the runner against per-lap (or per-half-lap)
//! target split times and judges each passage by how far the observed speed
//! deviates from the target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// km/h per m/s.
const KMH_PER_MS: f64 = 3.6;

/// Deviation bounds (km/h) for the qualitative passage tiers.
///
/// Policy values, not tuning knobs: the surrounding application renders and
/// records these exact buckets.
pub const EXCELLENT_MAX_DEVIATION_KMH: f64 = 0.2;
pub const GOOD_MAX_DEVIATION_KMH: f64 = 0.5;
pub const FAIR_MAX_DEVIATION_KMH: f64 = 1.5;

/// Segment progress bands (percent of the target segment time).
pub const ON_TIME_LOWER_PERCENT: f64 = 98.0;
pub const ON_TIME_UPPER_PERCENT: f64 = 102.0;

/// Qualitative bucket for how close an observed speed is to target
///
/// Rendered blue/green/yellow/red by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Tier {
    /// Classify an observed speed against the target speed.
    ///
    /// Total over all non-negative inputs: every deviation lands in exactly
    /// one bucket.
    pub fn from_deviation(observed_kmh: f64, target_kmh: f64) -> Self {
        let deviation = (observed_kmh - target_kmh).abs();

        if deviation <= EXCELLENT_MAX_DEVIATION_KMH {
            Tier::Excellent
        } else if deviation <= GOOD_MAX_DEVIATION_KMH {
            Tier::Good
        } else if deviation <= FAIR_MAX_DEVIATION_KMH {
            Tier::Fair
        } else {
            Tier::Poor
        }
    }

    /// Display color used by the presentation layer.
    pub fn color_name(&self) -> &'static str {
        match self {
            Tier::Excellent => "blue",
            Tier::Good => "green",
            Tier::Fair => "yellow",
            Tier::Poor => "red",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Excellent => write!(f, "Excellent"),
            Tier::Good => write!(f, "Good"),
            Tier::Fair => write!(f, "Fair"),
            Tier::Poor => write!(f, "Poor"),
        }
    }
}

/// Whether the runner is ahead of, on, or behind the target split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentPace {
    Early,
    OnTime,
    Late,
}

impl SegmentPace {
    /// Band a segment progress percentage (elapsed / target * 100).
    pub fn from_progress_percent(percent: f64) -> Self {
        if percent < ON_TIME_LOWER_PERCENT {
            SegmentPace::Early
        } else if percent <= ON_TIME_UPPER_PERCENT {
            SegmentPace::OnTime
        } else {
            SegmentPace::Late
        }
    }
}

impl fmt::Display for SegmentPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentPace::Early => write!(f, "early"),
            SegmentPace::OnTime => write!(f, "on time"),
            SegmentPace::Late => write!(f, "late"),
        }
    }
}

/// Target speed in km/h from VMA and the prescribed percentage.
pub fn target_speed_kmh(vma_kmh: f64, vma_percent: f64) -> f64 {
    vma_kmh * vma_percent / 100.0
}

/// Total distance in meters covered at `speed_kmh` over `duration_minutes`.
pub fn total_distance_m(speed_kmh: f64, duration_minutes: f64) -> f64 {
    speed_kmh * 1000.0 * duration_minutes / 60.0
}

/// Decompose a total distance into full track laps and a leftover in meters.
pub fn laps_and_remainder(total_distance_m: f64, track_length_m: f64) -> (u32, f64) {
    if track_length_m <= 0.0 {
        return (0, total_distance_m.max(0.0));
    }
    let full_laps = (total_distance_m / track_length_m).floor();
    let remainder = (total_distance_m - full_laps * track_length_m).max(0.0);
    (full_laps as u32, remainder)
}

/// Number of track markers closest to a leftover distance.
pub fn markers_from_remainder(remainder_m: f64, marker_distance_m: f64) -> u32 {
    if marker_distance_m <= 0.0 {
        return 0;
    }
    (remainder_m / marker_distance_m).round() as u32
}

/// Seconds needed to cover `distance_m` at `speed_kmh`.
///
/// A zero or negative speed short-circuits to 0: degenerate values are legal
/// while the coach is still adjusting the controls.
pub fn segment_time_s(distance_m: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    distance_m / (speed_kmh * 1000.0 / 3600.0)
}

/// Observed speed in km/h from a covered distance and elapsed seconds.
pub fn observed_speed_kmh(distance_m: f64, elapsed_s: f64) -> f64 {
    if elapsed_s == 0.0 {
        return 0.0;
    }
    (distance_m / elapsed_s) * KMH_PER_MS
}

/// Distance in meters reconstructed from lap and marker counts.
pub fn distance_from_laps_and_markers(
    laps: u32,
    markers: u32,
    track_length_m: f64,
    marker_distance_m: f64,
) -> f64 {
    laps as f64 * track_length_m + markers as f64 * marker_distance_m
}

/// One row of the per-marker pace table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaceTableRow {
    /// Marker index, 0 at the start line.
    pub marker: u32,
    /// Cumulative distance from the start line in meters.
    pub distance_m: f64,
    /// Target time to reach this marker in seconds.
    pub time_s: f64,
    /// Speed implied by hitting the segment exactly on time, km/h.
    pub speed_kmh: f64,
}

/// Per-marker target times over one observation segment (lap or half-lap).
///
/// Row 0 is the start line; the last row is the segment end. An empty table
/// comes back for degenerate geometry (non-positive marker spacing or
/// segment time).
pub fn pace_table(
    track_length_m: f64,
    marker_distance_m: f64,
    segment_time_s: f64,
    observe_half_lap: bool,
) -> Vec<PaceTableRow> {
    let observation_distance = if observe_half_lap {
        track_length_m / 2.0
    } else {
        track_length_m
    };
    if marker_distance_m <= 0.0 || observation_distance <= 0.0 || segment_time_s <= 0.0 {
        return Vec::new();
    }

    let marker_count = (observation_distance / marker_distance_m).floor() as u32;
    let segment_speed = (observation_distance / segment_time_s) * KMH_PER_MS;

    (0..=marker_count)
        .map(|marker| {
            let distance_m = marker as f64 * marker_distance_m;
            PaceTableRow {
                marker,
                distance_m,
                time_s: distance_m / observation_distance * segment_time_s,
                speed_kmh: segment_speed,
            }
        })
        .collect()
}

/// One cumulative lap split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapSplit {
    /// Lap number, 1-based.
    pub lap: u32,
    /// Target cumulative time at the end of this lap, seconds.
    pub cumulative_time_s: f64,
    /// Target time for a single lap, seconds.
    pub lap_time_s: f64,
}

/// Cumulative target splits for the first `max_laps` laps.
pub fn lap_time_table(lap_time_s: f64, max_laps: u32) -> Vec<LapSplit> {
    (1..=max_laps)
        .map(|lap| LapSplit {
            lap,
            cumulative_time_s: lap_time_s * lap as f64,
            lap_time_s,
        })
        .collect()
}
