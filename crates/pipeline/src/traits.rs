//! Core traits for candidate filtering.
//!
//! Filters run before scoring and remove programs that should not be
//! ranked at all (already decided, out of range, ...).

use anyhow::Result;
use data_loader::{Coordinate, Item, SwipeEvent};
use preferences::PreferenceProfile;
use std::collections::HashSet;
use std::sync::Arc;

/// What a filter may look at when deciding on a candidate.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    /// Names of programs the user already liked or skipped
    pub swiped_names: HashSet<String>,
    pub profile: Arc<PreferenceProfile>,
    pub user_location: Option<Coordinate>,
}

impl FilterContext {
    pub fn new(profile: Arc<PreferenceProfile>) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Context for a swipe history: every swiped name is recorded
    pub fn from_history(events: &[SwipeEvent], profile: Arc<PreferenceProfile>) -> Self {
        Self {
            swiped_names: events.iter().map(|event| event.item.name.clone()).collect(),
            profile,
            user_location: None,
        }
    }

    pub fn with_user_location(mut self, location: Option<Coordinate>) -> Self {
        self.user_location = location;
        self
    }
}

/// Core trait for filtering candidates.
///
/// Filters take ownership of the candidate list and hand back the survivors,
/// so a chain of filters never clones items.
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging)
    fn name(&self) -> &str;

    fn apply(&self, candidates: Vec<Item>, context: &FilterContext) -> Result<Vec<Item>>;
}
