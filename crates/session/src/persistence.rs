//! JSON snapshots of a session.
//!
//! A snapshot is everything needed to resume: the deck and where the user
//! is in it, the full swipe history, the liked list and the last published
//! profile.

use crate::config::EngineConfig;
use crate::controller::SwipeSession;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use data_loader::{Coordinate, Item, SwipeEvent};
use preferences::PreferenceProfile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub saved_at: DateTime<Utc>,
    pub catalog_order: Vec<Item>,
    pub deck: Vec<Item>,
    pub cursor: usize,
    pub events: Vec<SwipeEvent>,
    pub liked: Vec<Item>,
    pub profile: PreferenceProfile,
    #[serde(default)]
    pub user_location: Option<Coordinate>,
}

impl SessionSnapshot {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), swipes = self.events.len(), "Session saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid snapshot {}", path.display()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reject snapshots no session could have produced
    pub fn validate(&self) -> Result<()> {
        if self.cursor > self.deck.len() {
            bail!(
                "Snapshot cursor {} is past the end of a {}-card deck",
                self.cursor,
                self.deck.len()
            );
        }
        if self
            .events
            .windows(2)
            .any(|pair| pair[1].swipe_order <= pair[0].swipe_order)
        {
            bail!("Snapshot swipe history is not in increasing swipe order");
        }
        Ok(())
    }
}

impl SwipeSession {
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            saved_at: Utc::now(),
            catalog_order: self.catalog_order.clone(),
            deck: self.deck.clone(),
            cursor: self.cursor,
            events: self.events.clone(),
            liked: self.liked.clone(),
            profile: (*self.profile).clone(),
            user_location: self.user_location,
        }
    }

    /// Resume a session from a snapshot
    pub fn restore(snapshot: SessionSnapshot, config: EngineConfig) -> Result<Self> {
        snapshot.validate()?;
        Ok(Self {
            catalog_order: snapshot.catalog_order,
            deck: snapshot.deck,
            cursor: snapshot.cursor,
            events: snapshot.events,
            liked: snapshot.liked,
            profile: Arc::new(snapshot.profile),
            user_location: snapshot.user_location,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(name: &str) -> Item {
        Item {
            id: 0,
            link: format!("https://example.org/{name}"),
            name: name.to_string(),
            location: "Yale".to_string(),
            category: "Physics, Astronomy".to_string(),
            selectivity: "11% (60/700)".to_string(),
            application_date: "March 15".to_string(),
            duration: "5 weeks".to_string(),
            restrictions: "16+".to_string(),
            cost: "$7,500".to_string(),
            latitude: 41.3163,
            longitude: -72.9223,
        }
    }

    fn played_session() -> SwipeSession {
        let items = (0..9).map(|i| program(&format!("Program {i}"))).collect();
        let mut session = SwipeSession::new(items, EngineConfig::default())
            .with_user_location(Some(Coordinate::new(42.36, -71.06)));
        for i in 0..6 {
            if i % 2 == 0 {
                session.like();
            } else {
                session.skip();
            }
        }
        session
    }

    #[test]
    fn test_save_load_restore() {
        let session = played_session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        session.snapshot().save(&path).unwrap();
        let loaded = SessionSnapshot::load(&path).unwrap();
        let restored = SwipeSession::restore(loaded, EngineConfig::default()).unwrap();

        assert_eq!(restored.cursor(), 6);
        assert_eq!(restored.events(), session.events());
        assert_eq!(restored.liked(), session.liked());
        assert_eq!(restored.deck(), session.deck());
        assert_eq!(*restored.profile_snapshot(), *session.profile_snapshot());
        assert_eq!(restored.user_location(), session.user_location());
    }

    #[test]
    fn test_restored_session_keeps_swiping() {
        let session = played_session();
        let mut restored = SwipeSession::restore(session.snapshot(), EngineConfig::default()).unwrap();

        let outcome = restored.like().unwrap();
        assert_eq!(outcome.swipe_order, 6);
        // 7 swipes: not on the rebuild schedule
        assert!(!outcome.rebuilt);
        assert!(restored.skip().unwrap().rebuilt);
    }

    #[test]
    fn test_gapped_history_stays_increasing_after_restore() {
        let mut snapshot = played_session().snapshot();
        snapshot.events.truncate(2);
        snapshot.events[1].swipe_order = 10;
        snapshot.cursor = 2;
        snapshot.validate().unwrap();

        let mut restored = SwipeSession::restore(snapshot, EngineConfig::default()).unwrap();
        assert_eq!(restored.like().unwrap().swipe_order, 11);
        restored.snapshot().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_cursor() {
        let mut snapshot = played_session().snapshot();
        snapshot.cursor = 100;
        assert!(SwipeSession::restore(snapshot, EngineConfig::default()).is_err());
    }

    #[test]
    fn test_rejects_unordered_history() {
        let mut snapshot = played_session().snapshot();
        snapshot.events.swap(0, 1);
        let err = snapshot.validate().unwrap_err();
        assert!(err.to_string().contains("increasing swipe order"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SessionSnapshot::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read snapshot"));
    }
}
