//! # Preferences Crate
//!
//! Turns a swipe history into a `PreferenceProfile`: a per-dimension map of
//! bucket -> score in [0, 1] with observation counts.
//!
//! ## Main Components
//!
//! - **normalize**: Free-text attributes -> discrete buckets (cost, selectivity,
//!   restrictions, category groups)
//! - **distance**: Great-circle distance (via `geo`) and distance bands
//! - **profile**: `PreferenceProfile` and `BucketPreferences`
//! - **builder**: `rebuild_profile`, one generic learner over a `BucketKeys` trait
//! - **config**: Learning constants and `LearningConfig`
//!
//! ## Example Usage
//!
//! ```ignore
//! use preferences::{rebuild_profile, LearningConfig};
//!
//! let profile = rebuild_profile(&events, None, &LearningConfig::default());
//! println!("like rate: {:.0}%", profile.like_rate * 100.0);
//! ```

pub mod config;
pub mod normalize;
pub mod distance;
pub mod profile;
pub mod builder;

pub use builder::{apply_confidence_scaling, learn_buckets, rebuild_profile, BucketKeys};
pub use config::{LearningConfig, NEUTRAL_SCORE};
pub use distance::{categorize_distance, haversine_distance, DistanceBand};
pub use normalize::{
    normalize_category, normalize_cost, normalize_restrictions, normalize_selectivity,
    normalized_categories, split_categories, CostTier, RestrictionTag, SelectivityTier,
};
pub use profile::{BucketPreferences, Dimension, PreferenceProfile};
