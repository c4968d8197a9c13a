//! Configuration for spam-rs

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::error::{Result, SpamError};

/// Prefix of the environment variables read by [`ClassifierConfig::load`]
pub const ENV_PREFIX: &str = "SPAM";

/// Classifier thresholds and prior
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ClassifierConfig {
    /// Scores at or below this are ham
    #[serde(default = "default_max_ham_score")]
    pub max_ham_score: f64,
    /// Scores at or above this are spam
    #[serde(default = "default_min_spam_score")]
    pub min_spam_score: f64,
    /// Spam probability assumed for a word with no evidence
    #[serde(default = "default_assumed_probability")]
    pub assumed_probability: f64,
    /// How many observations the assumed probability is worth
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,
}

fn default_max_ham_score() -> f64 {
    0.4
}

fn default_min_spam_score() -> f64 {
    0.6
}

fn default_assumed_probability() -> f64 {
    0.5
}

fn default_prior_weight() -> f64 {
    1.0
}

impl ClassifierConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpamError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| SpamError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional TOML file, then `SPAM_*` environment variables
    /// (for example `SPAM_MIN_SPAM_SCORE=0.9`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    /// Same as [`ClassifierConfig::load`] with a custom environment prefix
    pub fn load_with_env_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        builder = builder.add_source(Environment::with_prefix(prefix).try_parsing(true));

        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| SpamError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override both thresholds
    pub fn with_thresholds(mut self, max_ham_score: f64, min_spam_score: f64) -> Self {
        self.max_ham_score = max_ham_score;
        self.min_spam_score = min_spam_score;
        self
    }

    /// Override the Bayesian prior
    pub fn with_prior(mut self, assumed_probability: f64, prior_weight: f64) -> Self {
        self.assumed_probability = assumed_probability;
        self.prior_weight = prior_weight;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let unit = [
            ("max_ham_score", self.max_ham_score),
            ("min_spam_score", self.min_spam_score),
            ("assumed_probability", self.assumed_probability),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                warn!("Rejected {} = {}", name, value);
                return Err(SpamError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if self.max_ham_score > self.min_spam_score {
            warn!(
                "Rejected thresholds: max_ham_score {} > min_spam_score {}",
                self.max_ham_score, self.min_spam_score
            );
            return Err(SpamError::Config(format!(
                "max_ham_score ({}) must not exceed min_spam_score ({})",
                self.max_ham_score, self.min_spam_score
            )));
        }

        if !self.prior_weight.is_finite() || self.prior_weight < 0.0 {
            warn!("Rejected prior_weight = {}", self.prior_weight);
            return Err(SpamError::Config(format!(
                "prior_weight must be a non-negative number, got {}",
                self.prior_weight
            )));
        }

        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_ham_score: default_max_ham_score(),
            min_spam_score: default_min_spam_score(),
            assumed_probability: default_assumed_probability(),
            prior_weight: default_prior_weight(),
        }
    }
}
