//! Rebuilding a `PreferenceProfile` from the full swipe history.
//!
//! Every dimension is learned the same way: each event is mapped to one or
//! more bucket keys, likes and (weighted) skips are tallied per bucket, and
//! the resulting like ratio is pulled toward neutral until the bucket has
//! enough observations. The per-dimension part is only the key extraction,
//! expressed through the `BucketKeys` trait.

use crate::config::{LearningConfig, NEUTRAL_SCORE};
use crate::distance::{categorize_distance, haversine_distance};
use crate::normalize::{
    normalize_cost, normalize_restrictions, normalize_selectivity, normalized_categories,
};
use crate::profile::{BucketPreferences, Dimension, PreferenceProfile};
use data_loader::{Coordinate, Item, SwipeEvent};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

// =============================================================================
// Bucket key extraction
// =============================================================================

/// Maps an item to the bucket keys it contributes to in one dimension.
///
/// Returned keys must be distinct; an event counts at most once per bucket.
pub trait BucketKeys {
    /// Dimension of the profile these keys populate
    fn dimension(&self) -> Dimension;

    fn keys(&self, item: &Item) -> Vec<String>;
}

/// Normalized category groups
pub struct CategoryKeys;

/// Raw location label, trimmed
pub struct LocationKeys;

/// Raw duration text, trimmed
pub struct DurationKeys;

/// Cost tier
pub struct CostKeys;

/// Selectivity tier
pub struct SelectivityKeys;

/// Restriction tags
pub struct RestrictionKeys;

/// Distance band from a fixed origin
pub struct DistanceKeys {
    pub origin: Coordinate,
}

fn trimmed_key(text: &str) -> Vec<String> {
    let key = text.trim();
    if key.is_empty() {
        Vec::new()
    } else {
        vec![key.to_string()]
    }
}

impl BucketKeys for CategoryKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Category
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        normalized_categories(&item.category)
    }
}

impl BucketKeys for LocationKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Location
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        trimmed_key(&item.location)
    }
}

impl BucketKeys for DurationKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Duration
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        trimmed_key(&item.duration)
    }
}

impl BucketKeys for CostKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Cost
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        vec![normalize_cost(&item.cost).to_string()]
    }
}

impl BucketKeys for SelectivityKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Selectivity
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        vec![normalize_selectivity(&item.selectivity).to_string()]
    }
}

impl BucketKeys for RestrictionKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Restrictions
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        normalize_restrictions(&item.restrictions)
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

impl BucketKeys for DistanceKeys {
    fn dimension(&self) -> Dimension {
        Dimension::Distance
    }

    fn keys(&self, item: &Item) -> Vec<String> {
        let meters = haversine_distance(self.origin, item.coordinate());
        vec![categorize_distance(meters).to_string()]
    }
}

// =============================================================================
// Learning
// =============================================================================

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    likes: f64,
    dislikes: f64,
    events: u32,
}

/// Pull a raw like ratio toward neutral according to how often the bucket
/// was observed.
///
/// `score = clamp(0.5 + (raw - 0.5) * sqrt(min(n, cap) / cap) * gain, 0, 1)`
pub fn apply_confidence_scaling(raw_score: f64, observations: u32, config: &LearningConfig) -> f64 {
    let cap = config.confidence_cap.max(1);
    let confidence = f64::from(observations.min(cap)) / f64::from(cap);
    let scaled_deviation = (raw_score - NEUTRAL_SCORE) * confidence.sqrt() * config.deviation_gain;
    (NEUTRAL_SCORE + scaled_deviation).clamp(0.0, 1.0)
}

/// Learn one dimension's bucket scores from the full event history.
pub fn learn_buckets<K: BucketKeys + ?Sized>(
    events: &[SwipeEvent],
    keys: &K,
    config: &LearningConfig,
) -> BucketPreferences {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for event in events {
        let mut event_keys = keys.keys(&event.item);
        event_keys.sort();
        event_keys.dedup();

        for key in event_keys {
            let tally = tallies.entry(key).or_default();
            if event.liked {
                tally.likes += 1.0;
            } else {
                tally.dislikes += config.skip_weight;
            }
            tally.events += 1;
        }
    }

    let mut prefs = BucketPreferences::new();
    for (bucket, tally) in tallies {
        let total = tally.likes + tally.dislikes;
        if total <= 0.0 {
            continue;
        }
        let raw_score = tally.likes / total;
        prefs.insert(bucket, apply_confidence_scaling(raw_score, tally.events, config), tally.events);
    }
    prefs
}

/// Rebuild a profile from scratch.
///
/// Deterministic in its inputs: the same events, location and config always
/// produce an identical profile. The distance dimension and travel limit
/// are only learned when `user_location` is present.
#[instrument(skip_all, fields(events = events.len(), located = user_location.is_some()))]
pub fn rebuild_profile(
    events: &[SwipeEvent],
    user_location: Option<Coordinate>,
    config: &LearningConfig,
) -> PreferenceProfile {
    let mut profile = PreferenceProfile::new();

    let extractors: [&dyn BucketKeys; 6] = [
        &CategoryKeys,
        &LocationKeys,
        &DurationKeys,
        &CostKeys,
        &SelectivityKeys,
        &RestrictionKeys,
    ];
    for keys in extractors {
        *profile.dimension_mut(keys.dimension()) = learn_buckets(events, keys, config);
    }

    if let Some(origin) = user_location {
        profile.distance = learn_buckets(events, &DistanceKeys { origin }, config);

        let liked_distances: Vec<f64> = events
            .iter()
            .filter(|event| event.liked)
            .map(|event| haversine_distance(origin, event.item.coordinate()))
            .filter(|meters| meters.is_finite())
            .collect();

        if !liked_distances.is_empty() {
            let average = liked_distances.iter().sum::<f64>() / liked_distances.len() as f64;
            profile.average_preferred_distance = Some(average);
            profile.max_travel_distance = Some(average * config.travel_distance_multiplier);
        }
    }

    let total_likes = events.iter().filter(|event| event.liked).count();
    profile.total_swipes = events.len() as u32;
    profile.total_likes = total_likes as u32;
    profile.like_rate = if events.is_empty() {
        0.0
    } else {
        total_likes as f64 / events.len() as f64
    };

    log_profile(&profile);
    profile
}

fn log_profile(profile: &PreferenceProfile) {
    debug!(
        swipes = profile.total_swipes,
        likes = profile.total_likes,
        like_rate = %format!("{:.1}%", profile.like_rate * 100.0),
        "Profile rebuilt"
    );

    let mut categories: Vec<(&String, &f64)> = profile.category.scores.iter().collect();
    categories.sort_by(|a, b| a.1.total_cmp(b.1));
    for (group, score) in categories {
        debug!(
            group = group.as_str(),
            score = %format!("{score:.3}"),
            observations = profile.category.observations(group),
            "Category preference"
        );
    }

    for (location, score) in profile.location.top(3) {
        debug!(location, score = %format!("{score:.3}"), "Top location");
    }

    if let Some(limit) = profile.max_travel_distance {
        debug!(max_travel_km = %format!("{:.0}", limit / 1000.0), "Travel range learned");
    }
}
