//! Integration tests for the pipeline.
//!
//! These run the whole chain a session uses: swipe history -> profile
//! rebuild -> filters -> scoring -> diversified ranking.

use data_loader::{Catalog, Coordinate, Item, SwipeEvent};
use pipeline::filters::*;
use pipeline::{DiversifiedRanker, FilterContext, FilterPipeline, RecommendationScorer};
use preferences::{rebuild_profile, LearningConfig, PreferenceProfile};
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

fn program(name: &str, category: &str) -> Item {
    Item {
        id: 0,
        link: String::new(),
        name: name.to_string(),
        location: "Unvisited Campus".to_string(),
        category: category.to_string(),
        selectivity: "N/A".to_string(),
        application_date: "April 1".to_string(),
        duration: "3 weeks".to_string(),
        restrictions: "Rising juniors".to_string(),
        cost: "TBD".to_string(),
        latitude: 40.0,
        longitude: -80.0,
    }
}

/// A swiped program whose non-category attributes never match a candidate
fn swiped(name: &str, category: &str, liked: bool, order: u32) -> SwipeEvent {
    let item = Item {
        location: "Seen Campus".to_string(),
        selectivity: "8%".to_string(),
        duration: "6 weeks".to_string(),
        restrictions: "Open to all".to_string(),
        cost: "Free".to_string(),
        ..program(name, category)
    };
    SwipeEvent::new(item, liked, order, 1_700_000_000 + i64::from(order))
}

#[test]
fn test_liked_category_ranks_above_skipped_category() {
    let events = vec![
        swiped("P1", "Physics", true, 0),
        swiped("P2", "Physics", true, 1),
        swiped("A1", "Art", false, 2),
        swiped("P3", "Physics", true, 3),
        swiped("A2", "Art", false, 4),
        swiped("P4", "Physics", true, 5),
    ];
    let profile = rebuild_profile(&events, None, &LearningConfig::default());
    let scorer = RecommendationScorer::new();

    let physics = program("New Physics", "Physics");
    let art = program("New Art", "Art");
    assert!(scorer.score_item(&physics, &profile) > scorer.score_item(&art, &profile));

    let ranked = DiversifiedRanker::new(scorer).rank(&[art, physics], &profile, 2);
    assert_eq!(ranked[0].name, "New Physics");
}

#[test]
fn test_young_profile_prefers_new_category() {
    let events = vec![
        swiped("P1", "Physics", true, 0),
        swiped("P2", "Physics", true, 1),
        swiped("P3", "Physics", false, 2),
        swiped("P4", "Physics", true, 3),
    ];
    let profile = rebuild_profile(&events, None, &LearningConfig::default());
    let ranker = DiversifiedRanker::default();
    let candidates = vec![
        program("Physics A", "Physics"),
        program("Physics B", "Physics"),
        program("Math C", "Mathematics"),
    ];

    let scored = ranker.rank_scored(&candidates, &profile, 3);
    let physics_score = scored[0].score;
    let math_score = scored.iter().find(|s| s.item.name == "Math C").unwrap().score;
    assert!(physics_score > math_score);

    let ranked = ranker.rank(&candidates, &profile, 2);
    let names: Vec<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Physics A", "Math C"]);
}

#[test]
fn test_filter_chain_over_history() {
    let boston = Coordinate::new(42.3601, -71.0589);
    let mut near = program("Near", "Physics");
    near.latitude = 42.3770;
    near.longitude = -71.1167;
    let mut far = program("Far", "Physics");
    far.latitude = 34.0689;
    far.longitude = -118.4452;

    let events = vec![
        SwipeEvent::new(near.clone(), true, 0, 0),
        SwipeEvent::new(program("Skipped", "Art"), false, 1, 0),
    ];
    let profile = Arc::new(rebuild_profile(&events, Some(boston), &LearningConfig::default()));
    let context = FilterContext::from_history(&events, profile.clone()).with_user_location(Some(boston));

    let pipeline = FilterPipeline::new()
        .add_filter(AlreadySwipedFilter)
        .add_filter(TravelRangeFilter);
    let mut near_twin = near.clone();
    near_twin.name = "Near Twin".to_string();
    let remaining = pipeline
        .apply(vec![near, far, near_twin, program("Skipped", "Art")], &context)
        .unwrap();

    let names: Vec<&str> = remaining.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, vec!["Near Twin"]);
}

#[test]
fn test_rank_shipped_catalog() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/programs.csv");
    assert!(path.exists(), "missing catalog at {}", path.display());
    let catalog = Catalog::load_from_file(&path).unwrap();
    let items = catalog.items();

    let events: Vec<SwipeEvent> = items
        .iter()
        .take(12)
        .zip(0..)
        .map(|(item, order)| SwipeEvent::new(item.clone(), order % 3 == 0, order, 0))
        .collect();
    let location = Some(Coordinate::new(42.3601, -71.0589));
    let profile = rebuild_profile(&events, location, &LearningConfig::default());

    let ranker = DiversifiedRanker::new(RecommendationScorer::new().with_user_location(location));
    let ranked = ranker.rank_scored(&items[12..], &profile, items.len());

    assert_eq!(ranked.len(), items.len() - 12);
    let unique: HashSet<&str> = ranked.iter().map(|s| s.item.name.as_str()).collect();
    assert_eq!(unique.len(), ranked.len());
    assert!(ranked.iter().all(|s| (0.0..=1.0).contains(&s.score)));
}

// =============================================================================
// Properties
// =============================================================================

const LABELS: &[&str] = &["Physics", "Art", "CS", "Medicine", "Journalism", "Mystery", ""];

fn arb_item() -> impl Strategy<Value = Item> {
    (0..LABELS.len(), 0..LABELS.len(), 0..8u32, -60.0..60.0f64, -150.0..150.0f64).prop_map(
        |(first, second, suffix, latitude, longitude)| Item {
            category: format!("{}, {}", LABELS[first], LABELS[second]),
            latitude,
            longitude,
            ..program(&format!("Program {suffix}"), "")
        },
    )
}

fn arb_profile() -> impl Strategy<Value = PreferenceProfile> {
    (
        prop::collection::vec((0..LABELS.len(), -1.0..2.0f64), 0..6),
        0..40u32,
        prop::option::of(0.0..5_000_000.0f64),
    )
        .prop_map(|(entries, total_swipes, max_travel)| {
            let mut profile = PreferenceProfile::new();
            profile.total_swipes = total_swipes;
            profile.max_travel_distance = max_travel;
            for (label, score) in entries {
                profile.category.insert(preferences::normalize_category(LABELS[label]), score, 3);
            }
            profile
        })
}

proptest! {
    #[test]
    fn prop_score_in_unit_range(item in arb_item(), profile in arb_profile(), located in any::<bool>()) {
        let location = located.then(|| Coordinate::new(42.36, -71.06));
        let score = RecommendationScorer::new()
            .with_user_location(location)
            .score_item(&item, &profile);
        prop_assert!((0.0..=1.0).contains(&score));
        if profile.total_swipes == 0 {
            prop_assert_eq!(score, 0.5);
        }
    }

    #[test]
    fn prop_rank_bounded_and_unique(
        items in prop::collection::vec(arb_item(), 0..20),
        profile in arb_profile(),
        count in 0..25usize,
    ) {
        let ranked = DiversifiedRanker::default().rank(&items, &profile, count);
        let distinct: HashSet<&str> = items.iter().map(|item| item.name.as_str()).collect();

        prop_assert!(ranked.len() <= count.min(items.len()));
        prop_assert_eq!(ranked.len(), count.min(distinct.len()));
        let names: HashSet<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
        prop_assert_eq!(names.len(), ranked.len());
    }
}
