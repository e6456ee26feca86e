//! Core domain types for the summer-program catalog.
//!
//! This module defines the fundamental data structures shared by every
//! other crate in the workspace:
//! - `Item`: one summer program card, immutable once loaded
//! - `SwipeEvent`: one like/skip decision, append-only
//! - `Coordinate`: a latitude/longitude pair
//! - `Catalog`: the in-memory store of all items plus lookup indices

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier assigned to an item when the catalog is loaded (row order)
pub type ItemId = u32;

/// Monotonic sequence number assigned to a swipe when it is recorded
pub type SwipeOrder = u32;

// =============================================================================
// Geography
// =============================================================================

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

// =============================================================================
// Catalog Items
// =============================================================================

/// A summer program as it appears on a card.
///
/// Every descriptive attribute is kept as the free text found in the
/// catalog. Normalization into discrete buckets happens later, in the
/// `preferences` crate, so the raw text is never lost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub link: String,
    /// Display name; also the identity used for de-duplication
    pub name: String,
    /// Free-text location label ("MIT", "Stanford, CA", ...)
    pub location: String,
    /// Comma-joined list of raw category labels
    pub category: String,
    pub selectivity: String,
    pub application_date: String,
    pub duration: String,
    pub restrictions: String,
    pub cost: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Item {
    /// Location of the program as a coordinate
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Raw category labels of this program
    pub fn raw_categories(&self) -> impl Iterator<Item = &str> {
        split_categories(&self.category)
    }
}

/// Split a comma-joined category list into trimmed, non-empty raw labels
pub fn split_categories(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|label| !label.is_empty())
}

// =============================================================================
// Swipe Events
// =============================================================================

/// A single like/skip decision.
///
/// The event carries its own copy of the item so a persisted history stays
/// meaningful even if the catalog changes between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
    pub item: Item,
    pub liked: bool,
    /// Unix timestamp (seconds) when the decision was recorded
    pub timestamp: i64,
    /// Position of this event in the history, independent of clock precision
    pub swipe_order: SwipeOrder,
}

impl SwipeEvent {
    pub fn new(item: Item, liked: bool, swipe_order: SwipeOrder, timestamp: i64) -> Self {
        Self {
            item,
            liked,
            timestamp,
            swipe_order,
        }
    }
}

// =============================================================================
// Catalog - The In-Memory Item Store
// =============================================================================

/// Holds every loaded item, in catalog order, plus lookup indices.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) items: Vec<Item>,
    /// Item name -> position in `items`
    pub(crate) name_index: HashMap<String, usize>,
    /// Raw category label -> ids of items carrying it
    pub(crate) category_index: HashMap<String, Vec<ItemId>>,
}

impl Catalog {
    /// Creates a new, empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// All items in catalog order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Get an item by id
    pub fn get_item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Get an item by its display name
    pub fn get_by_name(&self, name: &str) -> Option<&Item> {
        self.name_index.get(name).and_then(|&idx| self.items.get(idx))
    }

    /// Ids of the items tagged with a raw category label
    pub fn items_in_category(&self, label: &str) -> &[ItemId] {
        self.category_index
            .get(label)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Case-insensitive title search.
    ///
    /// Exact matches come first, then substring matches, each group in
    /// catalog order.
    pub fn search(&self, query: &str) -> Vec<&Item> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for item in &self.items {
            let title = item.name.to_lowercase();
            if title == needle {
                exact.push(item);
            } else if title.contains(&needle) {
                partial.push(item);
            }
        }
        exact.extend(partial);
        exact
    }

    /// Insert an item.
    ///
    /// Returns `false` (and leaves the catalog untouched) when an item with
    /// the same name is already present.
    pub fn insert_item(&mut self, item: Item) -> bool {
        if self.name_index.contains_key(&item.name) {
            return false;
        }
        self.name_index.insert(item.name.clone(), self.items.len());
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
