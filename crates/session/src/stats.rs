//! Summary statistics over a swipe history.

use data_loader::SwipeEvent;
use preferences::{normalize_category, split_categories};
use serde::Serialize;
use std::collections::HashMap;

/// Returned by `most_liked_category` when nothing has been liked
pub const NO_DATA: &str = "No data";

/// One slice of the liked-category breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub group: String,
    pub count: usize,
    /// Share of all liked category labels, 0-100
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_swipes: usize,
    pub likes: usize,
    pub passes: usize,
    pub like_rate: f64,
    /// Normalized category groups of liked programs, most frequent first
    pub categories: Vec<CategoryShare>,
}

impl SessionStats {
    pub fn from_events(events: &[SwipeEvent]) -> Self {
        let likes = events.iter().filter(|event| event.liked).count();
        let total_swipes = events.len();

        // Every raw label counts, so a program listing two labels of the
        // same group counts twice for it
        let mut counts: HashMap<String, usize> = HashMap::new();
        for event in events.iter().filter(|event| event.liked) {
            for label in split_categories(&event.item.category) {
                *counts.entry(normalize_category(label)).or_default() += 1;
            }
        }

        let labelled: usize = counts.values().sum();
        let mut categories: Vec<CategoryShare> = counts
            .into_iter()
            .map(|(group, count)| CategoryShare {
                group,
                count,
                percentage: count as f64 / labelled as f64 * 100.0,
            })
            .collect();
        categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));

        Self {
            total_swipes,
            likes,
            passes: total_swipes - likes,
            like_rate: if total_swipes == 0 {
                0.0
            } else {
                likes as f64 / total_swipes as f64
            },
            categories,
        }
    }

    /// Most liked category group, or "No data"
    pub fn most_liked_category(&self) -> &str {
        self.categories
            .first()
            .map(|share| share.group.as_str())
            .unwrap_or(NO_DATA)
    }
}
