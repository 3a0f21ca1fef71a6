//! On-demand statistics over lap and performance history
//!
//! Pure projections for the presentation and export layers: recomputed from
//! the histories every time, never stored.

use serde::Serialize;
use statrs::statistics::Statistics;

use crate::lap::Lap;
use crate::pace::Tier;

/// Min/mean/max of observed speeds over a set of passages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedSummary {
    pub laps: usize,
    pub min_kmh: f64,
    pub avg_kmh: f64,
    pub max_kmh: f64,
}

impl SpeedSummary {
    /// `None` when there is nothing to summarize.
    pub fn from_laps(laps: &[Lap]) -> Option<Self> {
        if laps.is_empty() {
            return None;
        }
        let speeds: Vec<f64> = laps.iter().map(|lap| lap.observed_speed_kmh).collect();
        Some(Self {
            laps: laps.len(),
            min_kmh: Statistics::min(speeds.iter()),
            avg_kmh: Statistics::mean(speeds.iter()),
            max_kmh: Statistics::max(speeds.iter()),
        })
    }
}

/// Count of passages per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
    pub poor: u32,
}

impl TierDistribution {
    pub fn from_tiers<I: IntoIterator<Item = Tier>>(tiers: I) -> Self {
        let mut distribution = TierDistribution::default();
        for tier in tiers {
            match tier {
                Tier::Excellent => distribution.excellent += 1,
                Tier::Good => distribution.good += 1,
                Tier::Fair => distribution.fair += 1,
                Tier::Poor => distribution.poor += 1,
            }
        }
        distribution
    }

    pub fn from_laps(laps: &[Lap]) -> Self {
        Self::from_tiers(laps.iter().map(|lap| lap.tier))
    }

    pub fn count(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Excellent => self.excellent,
            Tier::Good => self.good,
            Tier::Fair => self.fair,
            Tier::Poor => self.poor,
        }
    }

    pub fn total(&self) -> u32 {
        self.excellent + self.good + self.fair + self.poor
    }
}
