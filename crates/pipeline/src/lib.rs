//! Scoring, ranking and filtering of candidate programs.
//!
//! This crate provides:
//! - `RecommendationScorer`: blended per-program score in [0, 1]
//! - `DiversifiedRanker`: score-ordered ranking with forced category diversity
//! - `Filter` trait and `FilterPipeline` for removing candidates before ranking
//!
//! ## Architecture
//! Candidates move through three stages:
//! 1. Filters drop programs that must not be shown (already swiped, out of range)
//! 2. The scorer evaluates every survivor against the current profile
//! 3. The ranker orders them, mixing in new categories for young profiles
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::filters::AlreadySwipedFilter;
//! use pipeline::{DiversifiedRanker, FilterContext, FilterPipeline, RecommendationScorer};
//!
//! let context = FilterContext::from_history(&events, profile.clone());
//! let remaining = FilterPipeline::new()
//!     .add_filter(AlreadySwipedFilter)
//!     .apply(catalog.items().to_vec(), &context)?;
//!
//! let ranker = DiversifiedRanker::new(RecommendationScorer::new());
//! let next = ranker.rank(&remaining, &profile, 10);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod scorer;
pub mod ranker;

pub use filter_pipeline::FilterPipeline;
pub use ranker::{DiversifiedRanker, DiversityKey, RankingConfig};
pub use scorer::{RecommendationScorer, ScoreBreakdown, ScoredItem, ScoringWeights};
pub use traits::{Filter, FilterContext};
