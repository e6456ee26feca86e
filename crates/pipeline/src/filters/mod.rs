//! Filter implementations for the candidate pipeline.

pub mod already_swiped;
pub mod travel_range;

pub use already_swiped::AlreadySwipedFilter;
pub use travel_range::TravelRangeFilter;
