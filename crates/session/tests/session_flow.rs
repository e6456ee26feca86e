//! End-to-end session tests over the shipped catalog.

use data_loader::{Catalog, Coordinate};
use session::{EngineConfig, SessionSnapshot, SwipeSession};
use std::collections::HashSet;
use std::path::Path;

fn shipped_catalog() -> Catalog {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/programs.csv");
    assert!(path.exists(), "missing catalog at {}", path.display());
    Catalog::load_from_file(&path).unwrap()
}

#[test]
fn test_liking_one_group_pulls_it_forward() {
    let catalog = shipped_catalog();
    let mut session = SwipeSession::from_catalog(&catalog, EngineConfig::default())
        .with_user_location(Some(Coordinate::new(42.3601, -71.0589)));
    session.shuffle(11);

    for _ in 0..30 {
        let Some(item) = session.current() else {
            break;
        };
        let liked = item.category.contains("Engineering") || item.category.contains("CS");
        if liked {
            session.like();
        } else {
            session.skip();
        }
    }

    let profile = session.profile_snapshot();
    assert_eq!(profile.total_swipes, 29);
    assert_eq!(session.events().len(), 30);

    // Deck is still a permutation of the catalog
    let names: HashSet<&str> = session.deck().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names.len(), catalog.len());
    assert_eq!(session.deck().len(), catalog.len());
}

#[test]
fn test_stats_and_snapshot_over_catalog() {
    let catalog = shipped_catalog();
    let mut session = SwipeSession::from_catalog(&catalog, EngineConfig::default());
    for i in 0..10 {
        if i % 3 == 0 {
            session.like();
        } else {
            session.skip();
        }
    }

    let stats = session.stats();
    assert_eq!(stats.total_swipes, 10);
    assert_eq!(stats.likes, 4);
    assert_ne!(stats.most_liked_category(), session::NO_DATA);
    let total: f64 = stats.categories.iter().map(|share| share.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    session.snapshot().save(&path).unwrap();
    let restored = SwipeSession::restore(SessionSnapshot::load(&path).unwrap(), EngineConfig::default()).unwrap();
    assert_eq!(restored.stats(), stats);
}
