//! Filter to remove programs the user already decided on.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use data_loader::Item;

/// Removes candidates whose name appears in the swipe history.
///
/// Names are the identity used across the deck, so a program that shows up
/// twice in the catalog is removed in both places.
pub struct AlreadySwipedFilter;

impl Filter for AlreadySwipedFilter {
    fn name(&self) -> &str {
        "AlreadySwipedFilter"
    }

    fn apply(&self, candidates: Vec<Item>, context: &FilterContext) -> Result<Vec<Item>> {
        let filtered: Vec<Item> = candidates
            .into_iter()
            .filter(|item| !context.swiped_names.contains(&item.name))
            .collect();
        Ok(filtered)
    }
}
