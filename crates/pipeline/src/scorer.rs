//! Blended recommendation score per candidate.
//!
//! Each dimension of the profile contributes a sub-score in [0, 1]; the
//! final score is their weighted mean. Buckets the profile has never seen
//! contribute the neutral 0.5, so an unfamiliar program is neither pushed
//! up nor down by that dimension.

use data_loader::{Coordinate, Item};
use preferences::{
    categorize_distance, haversine_distance, normalize_category, normalize_cost,
    normalize_restrictions, normalize_selectivity, split_categories, Dimension,
    PreferenceProfile, NEUTRAL_SCORE,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Weights
// =============================================================================

/// Relative weight of every dimension in the blended score.
///
/// The defaults sum to 1.0. When no user location is known the distance
/// weight is left out and the rest are renormalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub category: f64,
    pub location: f64,
    pub duration: f64,
    pub cost: f64,
    pub selectivity: f64,
    pub restrictions: f64,
    pub distance: f64,
}

impl ScoringWeights {
    /// Configure the category weight (default: 0.55)
    pub fn with_category(mut self, weight: f64) -> Self {
        self.category = weight;
        self
    }

    /// Configure the location weight (default: 0.13)
    pub fn with_location(mut self, weight: f64) -> Self {
        self.location = weight;
        self
    }

    /// Configure the duration weight (default: 0.09)
    pub fn with_duration(mut self, weight: f64) -> Self {
        self.duration = weight;
        self
    }

    /// Configure the cost weight (default: 0.13)
    pub fn with_cost(mut self, weight: f64) -> Self {
        self.cost = weight;
        self
    }

    /// Configure the selectivity weight (default: 0.08)
    pub fn with_selectivity(mut self, weight: f64) -> Self {
        self.selectivity = weight;
        self
    }

    /// Configure the restrictions weight (default: 0.04)
    pub fn with_restrictions(mut self, weight: f64) -> Self {
        self.restrictions = weight;
        self
    }

    /// Configure the distance weight (default: 0.08)
    pub fn with_distance(mut self, weight: f64) -> Self {
        self.distance = weight;
        self
    }

    /// Sum of the weights that apply with or without a user location
    pub fn applied_total(&self, located: bool) -> f64 {
        let base = self.category
            + self.location
            + self.duration
            + self.cost
            + self.selectivity
            + self.restrictions;
        if located { base + self.distance } else { base }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: 0.55,
            location: 0.13,
            duration: 0.09,
            cost: 0.13,
            selectivity: 0.08,
            restrictions: 0.04,
            distance: 0.08,
        }
    }
}

// =============================================================================
// Scored output
// =============================================================================

/// An item paired with its blended score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredItem {
    pub item: Item,
    pub score: f64,
}

/// Every sub-score that went into a blended score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub category: f64,
    pub location: f64,
    pub duration: f64,
    pub cost: f64,
    pub selectivity: f64,
    pub restrictions: f64,
    /// `None` when no user location is known
    pub distance: Option<f64>,
    /// True when the item was beyond the learned travel range
    pub out_of_range: bool,
    pub cold_start: bool,
    pub total: f64,
}

impl ScoreBreakdown {
    fn neutral() -> Self {
        Self {
            category: NEUTRAL_SCORE,
            location: NEUTRAL_SCORE,
            duration: NEUTRAL_SCORE,
            cost: NEUTRAL_SCORE,
            selectivity: NEUTRAL_SCORE,
            restrictions: NEUTRAL_SCORE,
            distance: None,
            out_of_range: false,
            cold_start: true,
            total: NEUTRAL_SCORE,
        }
    }
}

// =============================================================================
// Scorer
// =============================================================================

/// Scores items against a `PreferenceProfile`.
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    weights: ScoringWeights,
    user_location: Option<Coordinate>,
}

impl RecommendationScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the dimension weights
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enable the distance dimension, measured from `location`
    pub fn with_user_location(mut self, location: Option<Coordinate>) -> Self {
        self.user_location = location;
        self
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    /// Blended score of `item` in [0, 1]; 0.5 for every item on a cold start.
    pub fn score_item(&self, item: &Item, profile: &PreferenceProfile) -> f64 {
        self.explain(item, profile).total
    }

    /// Score `item` and keep every sub-score.
    pub fn explain(&self, item: &Item, profile: &PreferenceProfile) -> ScoreBreakdown {
        if profile.is_cold_start() {
            return ScoreBreakdown::neutral();
        }

        let w = &self.weights;
        let category = category_score(item, profile);
        let location = profile.score_or_neutral(Dimension::Location, item.location.trim());
        let duration = profile.score_or_neutral(Dimension::Duration, item.duration.trim());
        let cost = profile.score_or_neutral(Dimension::Cost, normalize_cost(&item.cost).as_str());
        let selectivity = profile.score_or_neutral(
            Dimension::Selectivity,
            normalize_selectivity(&item.selectivity).as_str(),
        );
        let restrictions = restrictions_score(item, profile);

        let mut weighted = category * w.category
            + location * w.location
            + duration * w.duration
            + cost * w.cost
            + selectivity * w.selectivity
            + restrictions * w.restrictions;

        let mut out_of_range = false;
        let distance = self.user_location.map(|origin| {
            let meters = haversine_distance(origin, item.coordinate());
            if meters > profile.max_travel_distance_meters() {
                out_of_range = true;
                0.0
            } else {
                profile.score_or_neutral(Dimension::Distance, categorize_distance(meters).as_str())
            }
        });
        if let Some(distance) = distance {
            weighted += distance * w.distance;
        }

        let applied = w.applied_total(distance.is_some());
        let total = if applied > 0.0 {
            (weighted / applied).clamp(0.0, 1.0)
        } else {
            NEUTRAL_SCORE
        };

        ScoreBreakdown {
            category,
            location,
            duration,
            cost,
            selectivity,
            restrictions,
            distance,
            out_of_range,
            cold_start: false,
            total,
        }
    }

    /// Score every item, keeping input order
    pub fn score_all(&self, items: &[Item], profile: &PreferenceProfile) -> Vec<ScoredItem> {
        items
            .iter()
            .map(|item| ScoredItem {
                item: item.clone(),
                score: self.score_item(item, profile),
            })
            .collect()
    }
}

/// Mean over the raw labels whose normalized group the profile knows
fn category_score(item: &Item, profile: &PreferenceProfile) -> f64 {
    mean_of_known(
        split_categories(&item.category)
            .filter_map(|label| profile.category.score(&normalize_category(label))),
    )
}

/// Mean over the restriction tags the profile knows
fn restrictions_score(item: &Item, profile: &PreferenceProfile) -> f64 {
    mean_of_known(
        normalize_restrictions(&item.restrictions)
            .iter()
            .filter_map(|tag| profile.restrictions.score(tag.as_str())),
    )
}

fn mean_of_known(scores: impl Iterator<Item = f64>) -> f64 {
    let (sum, matched) = scores.fold((0.0, 0u32), |(sum, n), score| (sum + score, n + 1));
    if matched == 0 {
        NEUTRAL_SCORE
    } else {
        sum / f64::from(matched)
    }
}
