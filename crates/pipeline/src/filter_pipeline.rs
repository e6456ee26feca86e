//! The FilterPipeline chains candidate filters.

use crate::traits::{Filter, FilterContext};
use anyhow::Result;
use data_loader::Item;
use tracing::debug;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadySwipedFilter)
///     .add_filter(TravelRangeFilter);
///
/// let remaining = pipeline.apply(catalog.items().to_vec(), &context)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern)
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    /// Apply all filters in sequence.
    pub fn apply(&self, candidates: Vec<Item>, context: &FilterContext) -> Result<Vec<Item>> {
        let mut current = candidates;
        for filter in &self.filters {
            let input = current.len();
            current = filter.apply(current, context)?;
            debug!(
                filter = filter.name(),
                input,
                output = current.len(),
                "Filter applied"
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
