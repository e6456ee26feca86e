//! The learned preference profile.

use crate::config::NEUTRAL_SCORE;
use crate::distance::haversine_distance;
use data_loader::{Coordinate, Item};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One attribute dimension the profile learns over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Category,
    Location,
    Duration,
    Cost,
    Selectivity,
    Restrictions,
    Distance,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Category,
        Dimension::Location,
        Dimension::Duration,
        Dimension::Cost,
        Dimension::Selectivity,
        Dimension::Restrictions,
        Dimension::Distance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Location => "location",
            Dimension::Duration => "duration",
            Dimension::Cost => "cost",
            Dimension::Selectivity => "selectivity",
            Dimension::Restrictions => "restrictions",
            Dimension::Distance => "distance",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket -> score and bucket -> observation count for one dimension.
///
/// Both maps always hold the same keys. `BTreeMap` keeps iteration (and
/// therefore serialized snapshots) in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketPreferences {
    pub scores: BTreeMap<String, f64>,
    pub confidence: BTreeMap<String, u32>,
}

impl BucketPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learned score of a bucket, if it was ever observed
    pub fn score(&self, bucket: &str) -> Option<f64> {
        self.scores.get(bucket).copied()
    }

    /// Number of events that touched a bucket (0 if never observed)
    pub fn observations(&self, bucket: &str) -> u32 {
        self.confidence.get(bucket).copied().unwrap_or(0)
    }

    /// Record a bucket's score and observation count; the score is clamped.
    pub fn insert(&mut self, bucket: impl Into<String>, score: f64, observations: u32) {
        let bucket = bucket.into();
        self.scores.insert(bucket.clone(), score.clamp(0.0, 1.0));
        self.confidence.insert(bucket, observations);
    }

    /// Highest-scoring buckets, best first. Ties keep key order.
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        let mut entries: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(bucket, &score)| (bucket.as_str(), score))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries.truncate(n);
        entries
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Everything learned from a swipe history.
///
/// Profiles are never patched in place: a rebuild produces a fresh value
/// that replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    pub category: BucketPreferences,
    pub location: BucketPreferences,
    pub duration: BucketPreferences,
    pub cost: BucketPreferences,
    pub selectivity: BucketPreferences,
    pub restrictions: BucketPreferences,
    pub distance: BucketPreferences,

    pub total_swipes: u32,
    pub total_likes: u32,
    pub like_rate: f64,

    /// Mean distance (meters) from the user to liked programs
    pub average_preferred_distance: Option<f64>,
    /// Programs farther than this (meters) get zero distance score; `None` is unbounded
    pub max_travel_distance: Option<f64>,
}

impl PreferenceProfile {
    /// An empty profile: no swipes, no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything learned
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn dimension(&self, dimension: Dimension) -> &BucketPreferences {
        match dimension {
            Dimension::Category => &self.category,
            Dimension::Location => &self.location,
            Dimension::Duration => &self.duration,
            Dimension::Cost => &self.cost,
            Dimension::Selectivity => &self.selectivity,
            Dimension::Restrictions => &self.restrictions,
            Dimension::Distance => &self.distance,
        }
    }

    pub(crate) fn dimension_mut(&mut self, dimension: Dimension) -> &mut BucketPreferences {
        match dimension {
            Dimension::Category => &mut self.category,
            Dimension::Location => &mut self.location,
            Dimension::Duration => &mut self.duration,
            Dimension::Cost => &mut self.cost,
            Dimension::Selectivity => &mut self.selectivity,
            Dimension::Restrictions => &mut self.restrictions,
            Dimension::Distance => &mut self.distance,
        }
    }

    /// Score of a bucket, or the neutral score if it was never observed
    pub fn score_or_neutral(&self, dimension: Dimension, bucket: &str) -> f64 {
        self.dimension(dimension).score(bucket).unwrap_or(NEUTRAL_SCORE)
    }

    /// True until the first swipe has been learned from
    pub fn is_cold_start(&self) -> bool {
        self.total_swipes == 0
    }

    /// Travel limit in meters, `f64::INFINITY` when unbounded
    pub fn max_travel_distance_meters(&self) -> f64 {
        self.max_travel_distance.unwrap_or(f64::INFINITY)
    }

    /// True when `item` lies beyond the learned travel limit from `user`
    pub fn exceeds_travel_range(&self, item: &Item, user: Coordinate) -> bool {
        match self.max_travel_distance {
            Some(limit) => haversine_distance(user, item.coordinate()) > limit,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_clamps_and_tracks_confidence() {
        let mut prefs = BucketPreferences::new();
        prefs.insert("free", 1.7, 3);
        prefs.insert("high", -0.2, 1);

        assert_eq!(prefs.score("free"), Some(1.0));
        assert_eq!(prefs.score("high"), Some(0.0));
        assert_eq!(prefs.observations("free"), 3);
        assert_eq!(prefs.observations("missing"), 0);
        assert_eq!(prefs.len(), 2);
    }

    #[test]
    fn test_top_orders_by_score() {
        let mut prefs = BucketPreferences::new();
        prefs.insert("MIT", 0.4, 1);
        prefs.insert("Stanford", 0.9, 2);
        prefs.insert("Yale", 0.6, 1);

        let top = prefs.top(2);
        assert_eq!(top, vec![("Stanford", 0.9), ("Yale", 0.6)]);
    }

    #[test]
    fn test_cold_start_and_reset() {
        let mut profile = PreferenceProfile::new();
        assert!(profile.is_cold_start());
        assert_eq!(profile.max_travel_distance_meters(), f64::INFINITY);

        profile.total_swipes = 4;
        profile.cost.insert("low", 0.8, 4);
        assert!(!profile.is_cold_start());

        profile.reset();
        assert_eq!(profile, PreferenceProfile::default());
    }

    #[test]
    fn test_score_or_neutral() {
        let mut profile = PreferenceProfile::new();
        profile.location.insert("MIT", 0.9, 2);

        assert_eq!(profile.score_or_neutral(Dimension::Location, "MIT"), 0.9);
        assert_eq!(profile.score_or_neutral(Dimension::Location, "Yale"), NEUTRAL_SCORE);
        assert_eq!(profile.score_or_neutral(Dimension::Cost, "MIT"), NEUTRAL_SCORE);
    }

    #[test]
    fn test_profile_serde_round_trip() {
        let mut profile = PreferenceProfile::new();
        profile.total_swipes = 6;
        profile.total_likes = 4;
        profile.like_rate = 4.0 / 6.0;
        profile.category.insert("STEM - Physical Sciences", 0.8, 4);
        profile.max_travel_distance = Some(120_000.0);

        let json = serde_json::to_string(&profile).unwrap();
        let back: PreferenceProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
