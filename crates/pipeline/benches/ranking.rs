//! Benchmarks for profile rebuild and deck ranking
//!
//! Run with: cargo bench --package pipeline
//!
//! Uses the shipped program catalog and a synthetic 60-swipe history.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{Catalog, Coordinate, SwipeEvent};
use pipeline::{DiversifiedRanker, RecommendationScorer};
use preferences::{rebuild_profile, LearningConfig};
use std::path::Path;

const BOSTON: Coordinate = Coordinate {
    latitude: 42.3601,
    longitude: -71.0589,
};

fn load_catalog() -> Catalog {
    let path = Path::new("../../data/programs.csv");
    Catalog::load_from_file(path).expect("Failed to load catalog")
}

fn synthetic_history(catalog: &Catalog) -> Vec<SwipeEvent> {
    catalog
        .items()
        .iter()
        .take(60)
        .zip(0..)
        .map(|(item, order)| SwipeEvent::new(item.clone(), order % 4 == 0, order, 0))
        .collect()
}

fn bench_rebuild_profile(c: &mut Criterion) {
    let catalog = load_catalog();
    let events = synthetic_history(&catalog);
    let config = LearningConfig::default();

    c.bench_function("rebuild_profile_60_swipes", |b| {
        b.iter(|| {
            let profile = rebuild_profile(black_box(&events), Some(BOSTON), &config);
            black_box(profile)
        })
    });
}

fn bench_rank_remaining(c: &mut Criterion) {
    let catalog = load_catalog();
    let events = synthetic_history(&catalog);
    let profile = rebuild_profile(&events, Some(BOSTON), &LearningConfig::default());
    let remaining = &catalog.items()[events.len()..];
    let ranker = DiversifiedRanker::new(RecommendationScorer::new().with_user_location(Some(BOSTON)));

    c.bench_function("rank_remaining_deck", |b| {
        b.iter(|| {
            let ranked = ranker.rank(black_box(remaining), &profile, remaining.len());
            black_box(ranked)
        })
    });
}

criterion_group!(benches, bench_rebuild_profile, bench_rank_remaining);
criterion_main!(benches);
