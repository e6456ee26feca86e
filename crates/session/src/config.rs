//! Engine configuration.
//!
//! Every tunable of the engine lives in one `EngineConfig` that can be read
//! from a JSON file. Missing fields keep their defaults, so a config file
//! only needs to mention what it changes:
//!
//! ```json
//! { "learning": { "skip_weight": 3.0 }, "rebuild": { "interval": 5 } }
//! ```

use anyhow::{Context, Result};
use pipeline::{RankingConfig, ScoringWeights};
use preferences::LearningConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// When the session rebuilds the profile and reorders the deck.
///
/// The first rebuild happens once `warmup_swipes` decisions exist, then
/// again after every further `interval` decisions (5, 8, 11, ... by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildPolicy {
    pub warmup_swipes: usize,
    pub interval: usize,
}

impl RebuildPolicy {
    pub fn should_rebuild(&self, swipes: usize) -> bool {
        swipes >= self.warmup_swipes && (swipes - self.warmup_swipes) % self.interval.max(1) == 0
    }
}

impl Default for RebuildPolicy {
    fn default() -> Self {
        Self {
            warmup_swipes: 5,
            interval: 3,
        }
    }
}

/// When the current card is marked as a recommended pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightPolicy {
    pub min_swipes: usize,
    pub every: usize,
}

impl HighlightPolicy {
    pub fn is_highlighted(&self, swipes: usize, position: usize) -> bool {
        swipes >= self.min_swipes && position % self.every.max(1) == 0
    }
}

impl Default for HighlightPolicy {
    fn default() -> Self {
        Self {
            min_swipes: 5,
            every: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub learning: LearningConfig,
    pub weights: ScoringWeights,
    pub ranking: RankingConfig,
    pub rebuild: RebuildPolicy,
    pub highlight: HighlightPolicy,
}

impl EngineConfig {
    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse engine config")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize engine config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::DiversityKey;
    use std::io::Write;

    #[test]
    fn test_rebuild_schedule() {
        let policy = RebuildPolicy::default();
        let fired: Vec<usize> = (0..=15).filter(|&n| policy.should_rebuild(n)).collect();
        assert_eq!(fired, vec![5, 8, 11, 14]);
    }

    #[test]
    fn test_zero_interval_does_not_panic() {
        let policy = RebuildPolicy {
            warmup_swipes: 2,
            interval: 0,
        };
        assert!(!policy.should_rebuild(1));
        assert!(policy.should_rebuild(2));
        assert!(policy.should_rebuild(3));
    }

    #[test]
    fn test_highlight_policy() {
        let policy = HighlightPolicy::default();
        assert!(!policy.is_highlighted(4, 6));
        assert!(policy.is_highlighted(5, 6));
        assert!(!policy.is_highlighted(7, 7));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "learning": { "skip_weight": 3.0 }, "ranking": { "diversity_key": "normalized_group" } }"#,
        )
        .unwrap();

        assert_eq!(config.learning.skip_weight, 3.0);
        assert_eq!(config.learning.confidence_cap, 5);
        assert_eq!(config.ranking.diversity_key, DiversityKey::NormalizedGroup);
        assert_eq!(config.weights, ScoringWeights::default());
        assert_eq!(config.rebuild, RebuildPolicy::default());
    }

    #[test]
    fn test_from_file_round_trip() {
        let config = EngineConfig {
            rebuild: RebuildPolicy {
                warmup_swipes: 4,
                interval: 2,
            },
            ..EngineConfig::default()
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config.to_json().unwrap().as_bytes()).unwrap();

        let loaded = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = EngineConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
