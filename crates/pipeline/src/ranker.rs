//! Diversity-aware ranking of the remaining deck.
//!
//! ## Algorithm
//! 1. Score every candidate and sort by score, best first (stable)
//! 2. Walk the sorted list, accepting a candidate when it brings at least one
//!    category not yet on the selected list, or when its score clears
//!    `score_threshold - diversity_weight * penalty_scale`
//! 3. If the walk ends short of `count`, backfill with the best remaining
//!    candidates
//!
//! New users get a much larger diversity weight, so their deck mixes
//! categories until their profile says something reliable.

use crate::scorer::{RecommendationScorer, ScoredItem};
use data_loader::Item;
use preferences::{normalize_category, split_categories, PreferenceProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// What counts as "the same category" during the diversity walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversityKey {
    /// Raw comma-separated labels, trimmed ("CS" and "AI" differ)
    #[default]
    RawLabel,
    /// Normalized category groups ("CS" and "AI" are both Engineering & CS)
    NormalizedGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Diversity weight once the user has `warmup_swipes` swipes
    pub diversity_weight: f64,
    /// Diversity weight before that
    pub cold_diversity_weight: f64,
    pub warmup_swipes: u32,
    pub score_threshold: f64,
    pub penalty_scale: f64,
    pub diversity_key: DiversityKey,
}

impl RankingConfig {
    /// Configure the diversity key (default: raw labels)
    pub fn with_diversity_key(mut self, key: DiversityKey) -> Self {
        self.diversity_key = key;
        self
    }

    /// Configure the baseline diversity weight (default: 0.1)
    pub fn with_diversity_weight(mut self, weight: f64) -> Self {
        self.diversity_weight = weight;
        self
    }

    /// Diversity weight for a profile built from `total_swipes` swipes
    pub fn adaptive_weight(&self, total_swipes: u32) -> f64 {
        if total_swipes < self.warmup_swipes {
            self.cold_diversity_weight
        } else {
            self.diversity_weight
        }
    }

    /// Score above which a candidate is accepted even without a new category
    pub fn inclusion_threshold(&self, total_swipes: u32) -> f64 {
        self.score_threshold - self.adaptive_weight(total_swipes) * self.penalty_scale
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            diversity_weight: 0.1,
            cold_diversity_weight: 0.5,
            warmup_swipes: 10,
            score_threshold: 0.75,
            penalty_scale: 0.1,
            diversity_key: DiversityKey::RawLabel,
        }
    }
}

/// Ranks candidates with a `RecommendationScorer` and injects diversity.
#[derive(Debug, Clone, Default)]
pub struct DiversifiedRanker {
    scorer: RecommendationScorer,
    config: RankingConfig,
}

impl DiversifiedRanker {
    pub fn new(scorer: RecommendationScorer) -> Self {
        Self {
            scorer,
            config: RankingConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RankingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scorer(&self) -> &RecommendationScorer {
        &self.scorer
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank `candidates` and return at most `count` items, no two sharing a name.
    pub fn rank(&self, candidates: &[Item], profile: &PreferenceProfile, count: usize) -> Vec<Item> {
        self.rank_scored(candidates, profile, count)
            .into_iter()
            .map(|scored| scored.item)
            .collect()
    }

    /// Like `rank`, keeping each item's score.
    #[instrument(skip_all, fields(candidates = candidates.len(), count))]
    pub fn rank_scored(
        &self,
        candidates: &[Item],
        profile: &PreferenceProfile,
        count: usize,
    ) -> Vec<ScoredItem> {
        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut sorted: Vec<ScoredItem> = candidates
            .iter()
            .filter(|item| seen_names.insert(item.name.as_str()))
            .map(|item| ScoredItem {
                item: item.clone(),
                score: self.scorer.score_item(item, profile),
            })
            .collect();
        sorted.sort_by(|a, b| b.score.total_cmp(&a.score));

        let threshold = self.config.inclusion_threshold(profile.total_swipes);
        let mut picked: Vec<usize> = Vec::with_capacity(count.min(sorted.len()));
        let mut selected_keys: HashSet<String> = HashSet::new();

        for (position, candidate) in sorted.iter().enumerate() {
            if picked.len() >= count {
                break;
            }
            let keys = self.diversity_keys(&candidate.item);
            let introduces_new = keys.iter().any(|key| !selected_keys.contains(key));

            if introduces_new || candidate.score > threshold {
                picked.push(position);
                selected_keys.extend(keys);
            }
        }
        let diverse = picked.len();

        // Backfill with the best of what the walk passed over
        if picked.len() < count {
            let mut taken = vec![false; sorted.len()];
            for &position in &picked {
                taken[position] = true;
            }
            let missing = count - picked.len();
            let remaining = (0..sorted.len()).filter(|&position| !taken[position]);
            picked.extend(remaining.take(missing));
        }

        debug!(
            threshold,
            diverse,
            backfilled = picked.len() - diverse,
            "Ranked candidates"
        );

        let mut slots: Vec<Option<ScoredItem>> = sorted.into_iter().map(Some).collect();
        picked
            .into_iter()
            .filter_map(|position| slots[position].take())
            .collect()
    }

    fn diversity_keys(&self, item: &Item) -> Vec<String> {
        match self.config.diversity_key {
            DiversityKey::RawLabel => split_categories(&item.category).map(str::to_string).collect(),
            DiversityKey::NormalizedGroup => split_categories(&item.category)
                .map(normalize_category)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use preferences::normalize::{MATH_DATA, STEM_ENGINEERING_CS, STEM_PHYSICAL_SCIENCES};

    fn program(name: &str, category: &str) -> Item {
        Item {
            id: 0,
            link: String::new(),
            name: name.to_string(),
            location: "MIT".to_string(),
            category: category.to_string(),
            selectivity: "N/A".to_string(),
            application_date: "March 1".to_string(),
            duration: "4 weeks".to_string(),
            restrictions: "None".to_string(),
            cost: "TBD".to_string(),
            latitude: 42.3601,
            longitude: -71.0942,
        }
    }

    fn profile_with(total_swipes: u32, groups: &[(&str, f64)]) -> PreferenceProfile {
        let mut profile = PreferenceProfile::new();
        profile.total_swipes = total_swipes;
        for &(group, score) in groups {
            profile.category.insert(group, score, 5);
        }
        profile
    }

    #[test]
    fn test_adaptive_threshold() {
        let config = RankingConfig::default();
        assert_eq!(config.adaptive_weight(9), 0.5);
        assert_eq!(config.adaptive_weight(10), 0.1);
        assert!((config.inclusion_threshold(3) - 0.70).abs() < 1e-12);
        assert!((config.inclusion_threshold(30) - 0.74).abs() < 1e-12);
    }

    #[test]
    fn test_new_category_beats_second_of_same() {
        let profile = profile_with(6, &[(STEM_PHYSICAL_SCIENCES, 0.7), (MATH_DATA, 0.6)]);
        let candidates = vec![
            program("Physics A", "Physics"),
            program("Physics B", "Physics"),
            program("Math C", "Mathematics"),
        ];

        let ranked = DiversifiedRanker::default().rank(&candidates, &profile, 2);
        let names: Vec<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Physics A", "Math C"]);
    }

    #[test]
    fn test_high_score_overrides_diversity() {
        let profile = profile_with(6, &[(STEM_PHYSICAL_SCIENCES, 1.0), (MATH_DATA, 0.2)]);
        let candidates = vec![
            program("Physics A", "Physics"),
            program("Physics B", "Physics"),
            program("Math C", "Mathematics"),
        ];

        // Physics scores clear the 0.70 threshold on their own
        let ranked = DiversifiedRanker::default().rank(&candidates, &profile, 2);
        let names: Vec<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["Physics A", "Physics B"]);
    }

    #[test]
    fn test_backfill_fills_quota() {
        let profile = profile_with(20, &[(STEM_PHYSICAL_SCIENCES, 0.6)]);
        let candidates = vec![
            program("A", "Physics"),
            program("B", "Physics"),
            program("C", "Physics"),
        ];

        let ranked = DiversifiedRanker::default().rank_scored(&candidates, &profile, 3);
        let names: Vec<&str> = ranked.iter().map(|s| s.item.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_duplicates_and_count_bounds() {
        let profile = PreferenceProfile::new();
        let candidates = vec![program("A", "Art"), program("A", "Art"), program("B", "Physics")];

        let ranker = DiversifiedRanker::default();
        assert_eq!(ranker.rank(&candidates, &profile, 10).len(), 2);
        assert_eq!(ranker.rank(&candidates, &profile, 1).len(), 1);
        assert!(ranker.rank(&candidates, &profile, 0).is_empty());
        assert!(ranker.rank(&[], &profile, 5).is_empty());
    }

    #[test]
    fn test_cold_start_keeps_input_order() {
        let profile = PreferenceProfile::new();
        let candidates = vec![program("A", "Art"), program("B", "Physics"), program("C", "Art")];

        let ranked = DiversifiedRanker::default().rank(&candidates, &profile, 3);
        let names: Vec<&str> = ranked.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_normalized_group_key() {
        let profile = profile_with(6, &[(STEM_ENGINEERING_CS, 0.6), (MATH_DATA, 0.55)]);
        let candidates = vec![
            program("Robots", "Robotics"),
            program("Code", "CS"),
            program("Stats", "Statistics"),
        ];

        // Raw labels: "CS" is new, so it is picked before Statistics
        let raw = DiversifiedRanker::default().rank(&candidates, &profile, 2);
        assert_eq!(raw[1].name, "Code");

        // Groups: "CS" repeats Engineering & CS, Statistics brings Math & Data
        let grouped = DiversifiedRanker::default()
            .with_config(RankingConfig::default().with_diversity_key(DiversityKey::NormalizedGroup))
            .rank(&candidates, &profile, 2);
        assert_eq!(grouped[1].name, "Stats");
    }
}
