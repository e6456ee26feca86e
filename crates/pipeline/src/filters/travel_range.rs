//! Opt-in hard exclusion of programs beyond the learned travel range.
//!
//! The scorer already zeroes the distance term for such programs; this
//! filter removes them outright for callers that want a strict cut.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use data_loader::Item;
use tracing::debug;

/// Removes candidates farther from the user than `max_travel_distance`.
///
/// Does nothing without a user location or while the travel range is
/// still unbounded.
pub struct TravelRangeFilter;

impl Filter for TravelRangeFilter {
    fn name(&self) -> &str {
        "TravelRangeFilter"
    }

    fn apply(&self, candidates: Vec<Item>, context: &FilterContext) -> Result<Vec<Item>> {
        let Some(user) = context.user_location else {
            return Ok(candidates);
        };

        let before = candidates.len();
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| !context.profile.exceeds_travel_range(item, user))
            .collect();

        if filtered.len() < before {
            debug!(
                excluded = before - filtered.len(),
                max_travel_meters = context.profile.max_travel_distance_meters(),
                "Excluded programs beyond travel range"
            );
        }
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::program;
    use data_loader::Coordinate;
    use preferences::PreferenceProfile;
    use std::sync::Arc;

    fn candidates() -> Vec<Item> {
        vec![
            program("Harvard", 42.3770, -71.1167),
            program("Penn", 39.9522, -75.1932),
            program("UCLA", 34.0689, -118.4452),
        ]
    }

    #[test]
    fn test_excludes_beyond_range() {
        let mut profile = PreferenceProfile::new();
        profile.total_swipes = 5;
        profile.max_travel_distance = Some(600_000.0);
        let context = FilterContext::new(Arc::new(profile))
            .with_user_location(Some(Coordinate::new(42.3601, -71.0589)));

        let filtered = TravelRangeFilter.apply(candidates(), &context).unwrap();
        let names: Vec<&str> = filtered.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Harvard", "Penn"]);
    }

    #[test]
    fn test_noop_without_location_or_range() {
        let mut profile = PreferenceProfile::new();
        profile.max_travel_distance = Some(1.0);
        let context = FilterContext::new(Arc::new(profile));
        assert_eq!(TravelRangeFilter.apply(candidates(), &context).unwrap().len(), 3);

        let unbounded = FilterContext::new(Arc::new(PreferenceProfile::new()))
            .with_user_location(Some(Coordinate::new(42.3601, -71.0589)));
        assert_eq!(TravelRangeFilter.apply(candidates(), &unbounded).unwrap().len(), 3);
    }
}
