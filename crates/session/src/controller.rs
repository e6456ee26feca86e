//! The swipe session: deck, history and the rebuild trigger.
//!
//! A session owns everything the engine needs between swipes. Each like or
//! skip appends a `SwipeEvent`; when the rebuild policy fires, the profile
//! is rebuilt from the whole history, published as a new `Arc`, and the
//! undecided part of the deck is replaced with the ranker's ordering.
//! Cards already swiped never move.

use crate::config::EngineConfig;
use crate::stats::SessionStats;
use anyhow::Result;
use chrono::Utc;
use data_loader::{Catalog, Coordinate, Item, SwipeEvent, SwipeOrder};
use pipeline::filters::AlreadySwipedFilter;
use pipeline::{
    DiversifiedRanker, FilterContext, FilterPipeline, RecommendationScorer, ScoredItem,
};
use preferences::{rebuild_profile, PreferenceProfile};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What happened on a single swipe
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    pub item: Item,
    pub liked: bool,
    pub swipe_order: SwipeOrder,
    /// True when this swipe triggered a profile rebuild and deck reorder
    pub rebuilt: bool,
}

pub struct SwipeSession {
    /// Deck order a reset returns to
    pub(crate) catalog_order: Vec<Item>,
    pub(crate) deck: Vec<Item>,
    /// Index of the current card; everything before it has been decided
    pub(crate) cursor: usize,
    pub(crate) events: Vec<SwipeEvent>,
    pub(crate) liked: Vec<Item>,
    pub(crate) profile: Arc<PreferenceProfile>,
    pub(crate) user_location: Option<Coordinate>,
    pub(crate) config: EngineConfig,
}

impl SwipeSession {
    /// Start a session over `items`, in the given order
    pub fn new(items: Vec<Item>, config: EngineConfig) -> Self {
        Self {
            deck: items.clone(),
            catalog_order: items,
            cursor: 0,
            events: Vec::new(),
            liked: Vec::new(),
            profile: Arc::new(PreferenceProfile::new()),
            user_location: None,
            config,
        }
    }

    pub fn from_catalog(catalog: &Catalog, config: EngineConfig) -> Self {
        Self::new(catalog.items().to_vec(), config)
    }

    pub fn with_user_location(mut self, location: Option<Coordinate>) -> Self {
        self.user_location = location;
        self
    }

    /// Update the user's position; used from the next rebuild on
    pub fn set_user_location(&mut self, location: Option<Coordinate>) {
        self.user_location = location;
    }

    /// Shuffle the undecided cards with a seeded RNG.
    ///
    /// Shuffling before the first swipe also changes the order a reset
    /// returns to.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let start = self.cursor.min(self.deck.len());
        self.deck[start..].shuffle(&mut rng);
        if start == 0 {
            self.catalog_order = self.deck.clone();
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The card currently on top of the deck
    pub fn current(&self) -> Option<&Item> {
        self.deck.get(self.cursor)
    }

    /// Undecided cards, current card first
    pub fn remaining(&self) -> &[Item] {
        &self.deck[self.cursor.min(self.deck.len())..]
    }

    /// Cards already liked or skipped, in swipe order
    pub fn decided(&self) -> &[Item] {
        &self.deck[..self.cursor.min(self.deck.len())]
    }

    pub fn deck(&self) -> &[Item] {
        &self.deck
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.deck.len()
    }

    pub fn events(&self) -> &[SwipeEvent] {
        &self.events
    }

    /// Liked programs, one entry per name, in the order they were liked
    pub fn liked(&self) -> &[Item] {
        &self.liked
    }

    pub fn user_location(&self) -> Option<Coordinate> {
        self.user_location
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current profile. Holders keep a consistent snapshot even if the
    /// session rebuilds in the meantime.
    pub fn profile_snapshot(&self) -> Arc<PreferenceProfile> {
        Arc::clone(&self.profile)
    }

    /// Whether the current card should be presented as a recommended pick
    pub fn is_highlighted(&self) -> bool {
        !self.is_exhausted()
            && self
                .config
                .highlight
                .is_highlighted(self.events.len(), self.cursor)
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::from_events(&self.events)
    }

    // =========================================================================
    // Swiping
    // =========================================================================

    /// Like the current card. `None` once the deck is exhausted.
    pub fn like(&mut self) -> Option<SwipeOutcome> {
        self.record(true)
    }

    /// Skip the current card. `None` once the deck is exhausted.
    pub fn skip(&mut self) -> Option<SwipeOutcome> {
        self.record(false)
    }

    fn record(&mut self, liked: bool) -> Option<SwipeOutcome> {
        let item = self.current()?.clone();
        let swipe_order = self
            .events
            .last()
            .map_or(0, |last| last.swipe_order + 1);

        if liked && !self.liked.iter().any(|existing| existing.name == item.name) {
            self.liked.push(item.clone());
        }
        self.events.push(SwipeEvent::new(
            item.clone(),
            liked,
            swipe_order,
            Utc::now().timestamp(),
        ));
        self.cursor += 1;
        debug!(name = item.name.as_str(), liked, swipe_order, "Swipe recorded");

        let rebuilt = self.config.rebuild.should_rebuild(self.events.len());
        if rebuilt {
            self.refresh_recommendations();
        }

        Some(SwipeOutcome {
            item,
            liked,
            swipe_order,
            rebuilt,
        })
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Ranker configured for this session's weights, ranking config and location
    pub fn ranker(&self) -> DiversifiedRanker {
        let scorer = RecommendationScorer::new()
            .with_weights(self.config.weights)
            .with_user_location(self.user_location);
        DiversifiedRanker::new(scorer).with_config(self.config.ranking)
    }

    /// Rebuild the profile from the full history and reorder the undecided
    /// part of the deck. Returns how many cards were reordered.
    #[instrument(skip(self), fields(swipes = self.events.len(), cursor = self.cursor))]
    pub fn refresh_recommendations(&mut self) -> usize {
        let profile = rebuild_profile(&self.events, self.user_location, &self.config.learning);
        self.profile = Arc::new(profile);

        if self.is_exhausted() {
            return 0;
        }

        let remaining = self.deck.split_off(self.cursor);
        let mut ranked = self.ranker().rank(&remaining, &self.profile, remaining.len());
        let reordered = ranked.len();

        // The ranker keeps one card per name; repeats go to the back
        let repeats = {
            let mut placed: HashMap<&str, usize> = HashMap::new();
            for item in &ranked {
                *placed.entry(item.name.as_str()).or_default() += 1;
            }
            remaining
                .iter()
                .filter(|item| match placed.get_mut(item.name.as_str()) {
                    Some(count) if *count > 0 => {
                        *count -= 1;
                        false
                    }
                    _ => true,
                })
                .cloned()
                .collect::<Vec<_>>()
        };
        ranked.extend(repeats);
        self.deck.extend(ranked);

        info!(
            "Updated recommendations - {} programs reordered (like rate {:.0}%)",
            reordered,
            self.profile.like_rate * 100.0
        );
        reordered
    }

    /// Top `limit` undecided programs under the current profile, with scores.
    ///
    /// Does not touch the deck. Programs already swiped are never returned.
    pub fn recommend(&self, limit: usize) -> Result<Vec<ScoredItem>> {
        self.recommend_with(limit, &FilterPipeline::new().add_filter(AlreadySwipedFilter))
    }

    /// Like `recommend`, with a caller-supplied filter chain
    pub fn recommend_with(&self, limit: usize, filters: &FilterPipeline) -> Result<Vec<ScoredItem>> {
        let context = FilterContext::from_history(&self.events, self.profile_snapshot())
            .with_user_location(self.user_location);
        let candidates = filters.apply(self.remaining().to_vec(), &context)?;

        Ok(self.ranker().rank_scored(&candidates, &self.profile, limit))
    }

    // =========================================================================
    // Liked list and reset
    // =========================================================================

    /// Remove a program from the liked list. The swipe history is unchanged.
    pub fn remove_liked(&mut self, name: &str) -> bool {
        let before = self.liked.len();
        self.liked.retain(|item| item.name != name);
        self.liked.len() < before
    }

    pub fn clear_liked(&mut self) {
        self.liked.clear();
    }

    /// Start over: forget every swipe, like and learned preference.
    pub fn reset(&mut self) {
        self.deck = self.catalog_order.clone();
        self.cursor = 0;
        self.events.clear();
        self.liked.clear();
        self.profile = Arc::new(PreferenceProfile::new());
        info!(programs = self.deck.len(), "Session reset");
    }
}
