//! Agent configuration
//!
//! All fields have defaults matching the reference deployment, so an empty
//! YAML document is a valid configuration. Environment variables override
//! the file:
//!
//! - `MOVIE_AGENT_SEED` - seed for phrase selection
//! - `MOVIE_AGENT_USE_REPHRASER` - `true`/`false`
//! - `MOVIE_AGENT_RECOMMENDATIONS` - number of recommended titles

use crate::agent::classifier::KeywordRouting;
use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub resolver: ResolverConfig,
    pub recommendation: RecommendationConfig,
    /// Keywords for the built-in classifier
    pub routing: KeywordRouting,
    /// Seed for template selection; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Rewrite fusion answers through the rephraser when one is configured
    pub use_rephraser: bool,
}

/// Thresholds for fuzzy span matching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Score cutoff when the recognizer already found something in the text
    pub threshold_with_rules: f64,
    /// Score cutoff when the recognizer found nothing
    pub threshold_without_rules: f64,
    /// Score cutoff for labels shorter than `short_label_len`
    pub short_label_threshold: f64,
    pub short_label_len: usize,
    /// Labels dropped when any other mention exists in the same message
    pub noise_labels: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold_with_rules: 90.0,
            threshold_without_rules: 80.0,
            short_label_threshold: 95.0,
            short_label_len: 5,
            noise_labels: vec!["tell".to_string()],
        }
    }
}

/// Relation identifiers and limits used by the recommendation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub count: usize,
    pub genre_relation: String,
    pub director_relation: String,
    pub franchise_relation: String,
    pub rating_relation: String,
    pub designated_min_shared: usize,
    pub unrestricted_min_shared: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            count: 3,
            genre_relation: "P136".to_string(),
            director_relation: "P57".to_string(),
            franchise_relation: "P179".to_string(),
            rating_relation: "P444".to_string(),
            designated_min_shared: 2,
            unrestricted_min_shared: 5,
        }
    }
}

impl RecommendationConfig {
    /// Relations inspected by the first (designated) attribute pass
    pub fn designated_relations(&self) -> Vec<String> {
        vec![
            self.genre_relation.clone(),
            self.director_relation.clone(),
            self.franchise_relation.clone(),
        ]
    }
}

impl AgentConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `MOVIE_AGENT_*` environment overrides
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(seed) = lookup("MOVIE_AGENT_SEED") {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|e| AgentError::Config(format!("MOVIE_AGENT_SEED: {}", e)))?;
            self.seed = Some(seed);
        }
        if let Some(flag) = lookup("MOVIE_AGENT_USE_REPHRASER") {
            self.use_rephraser = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(count) = lookup("MOVIE_AGENT_RECOMMENDATIONS") {
            self.recommendation.count = count.trim().parse::<usize>().map_err(|e| {
                AgentError::Config(format!("MOVIE_AGENT_RECOMMENDATIONS: {}", e))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.recommendation.count == 0 {
            return Err(AgentError::Config(
                "recommendation.count must be at least 1".to_string(),
            ));
        }
        let thresholds = [
            self.resolver.threshold_with_rules,
            self.resolver.threshold_without_rules,
            self.resolver.short_label_threshold,
        ];
        if thresholds.iter().any(|t| !(0.0..=100.0).contains(t)) {
            return Err(AgentError::Config(
                "resolver thresholds must be within 0..=100".to_string(),
            ));
        }
        Ok(())
    }
}
