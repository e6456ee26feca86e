//! Tunable constants for preference learning.
//!
//! The defaults reproduce the behaviour the app shipped with. They are
//! exposed through `LearningConfig` so they can be overridden from a config
//! file without touching the algorithm.

use serde::{Deserialize, Serialize};

/// Score every bucket starts from, and the cold-start score of every item
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Weight of one skip relative to one like.
///
/// Users skip far more often than they like, so a skip counts double to
/// keep the raw like ratio from drifting upward.
pub const DEFAULT_SKIP_WEIGHT: f64 = 2.0;

/// Observation count after which a bucket's confidence stops growing
pub const DEFAULT_CONFIDENCE_CAP: u32 = 5;

/// Gain applied to the confidence-scaled deviation from neutral
pub const DEFAULT_DEVIATION_GAIN: f64 = 1.5;

/// Max travel distance = average liked distance * this multiplier
pub const DEFAULT_TRAVEL_DISTANCE_MULTIPLIER: f64 = 1.5;

/// Parameters of the profile rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub skip_weight: f64,
    pub confidence_cap: u32,
    pub deviation_gain: f64,
    pub travel_distance_multiplier: f64,
}

impl LearningConfig {
    /// Configure the skip weight (default: 2.0)
    pub fn with_skip_weight(mut self, weight: f64) -> Self {
        self.skip_weight = weight;
        self
    }

    /// Configure the confidence cap (default: 5 observations)
    pub fn with_confidence_cap(mut self, cap: u32) -> Self {
        self.confidence_cap = cap;
        self
    }

    /// Configure the deviation gain (default: 1.5)
    pub fn with_deviation_gain(mut self, gain: f64) -> Self {
        self.deviation_gain = gain;
        self
    }

    /// Configure the travel distance multiplier (default: 1.5)
    pub fn with_travel_distance_multiplier(mut self, multiplier: f64) -> Self {
        self.travel_distance_multiplier = multiplier;
        self
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            skip_weight: DEFAULT_SKIP_WEIGHT,
            confidence_cap: DEFAULT_CONFIDENCE_CAP,
            deviation_gain: DEFAULT_DEVIATION_GAIN,
            travel_distance_multiplier: DEFAULT_TRAVEL_DISTANCE_MULTIPLIER,
        }
    }
}
