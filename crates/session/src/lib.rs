//! # Session Crate
//!
//! The surrounding controller for the recommendation engine: it owns the
//! deck and swipe history, decides when to rebuild the profile, and keeps
//! liked programs and statistics.
//!
//! ## Main Components
//!
//! - **controller**: `SwipeSession`, likes/skips, rebuild trigger, deck reordering
//! - **config**: `EngineConfig` with the rebuild and highlight policies
//! - **stats**: `SessionStats`, likes/passes and liked-category breakdown
//! - **persistence**: `SessionSnapshot`, JSON save/load/restore
//!
//! ## Example Usage
//!
//! ```ignore
//! use session::{EngineConfig, SwipeSession};
//!
//! let mut session = SwipeSession::from_catalog(&catalog, EngineConfig::default());
//! while let Some(item) = session.current() {
//!     let liked = item.category.contains("Physics");
//!     if liked { session.like(); } else { session.skip(); }
//! }
//! println!("{}", session.stats().most_liked_category());
//! ```

pub mod config;
pub mod controller;
pub mod stats;
pub mod persistence;

pub use config::{EngineConfig, HighlightPolicy, RebuildPolicy};
pub use controller::{SwipeOutcome, SwipeSession};
pub use persistence::SessionSnapshot;
pub use stats::{CategoryShare, SessionStats, NO_DATA};
