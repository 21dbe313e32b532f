//! Analysis configuration.
//!
//! # Responsibility
//! - Hold tunable weights and thresholds for feasibility analysis.
//! - Load overrides from JSON documents.
//!
//! # Invariants
//! - Weights are finite and non-negative, and at least one is positive.
//! - `medium_threshold <= high_threshold`, both within `0..=100`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Relative weight of each feasibility signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub skill: f64,
    pub budget: f64,
    pub capacity: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            skill: 0.6,
            budget: 0.2,
            capacity: 0.2,
        }
    }
}

/// Tunables for feasibility scoring and risk detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub weights: SignalWeights,
    pub high_threshold: f64,
    pub medium_threshold: f64,
    /// Fewer remaining days than this raises a schedule warning.
    pub schedule_warning_days: i64,
    pub max_recommended_teams: usize,
    /// Overrun ratio (cost over budget) above which the risk is critical.
    pub over_budget_critical_ratio: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            high_threshold: 75.0,
            medium_threshold: 50.0,
            schedule_warning_days: 30,
            max_recommended_teams: 3,
            over_budget_critical_ratio: 0.2,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read analysis config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse analysis config: {err}"),
            Self::Invalid(message) => write!(f, "invalid analysis config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl AnalysisConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("skill", self.weights.skill),
            ("budget", self.weights.budget),
            ("capacity", self.weights.capacity),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight `{name}` must be finite and >= 0, got {value}"
                )));
            }
        }
        if weights.iter().all(|(_, value)| *value == 0.0) {
            return Err(ConfigError::Invalid(
                "at least one signal weight must be positive".to_string(),
            ));
        }

        let in_range = |value: f64| (0.0..=100.0).contains(&value);
        if !in_range(self.high_threshold) || !in_range(self.medium_threshold) {
            return Err(ConfigError::Invalid(
                "thresholds must be within 0..=100".to_string(),
            ));
        }
        if self.medium_threshold > self.high_threshold {
            return Err(ConfigError::Invalid(format!(
                "medium_threshold ({}) must be <= high_threshold ({})",
                self.medium_threshold, self.high_threshold
            )));
        }
        if self.schedule_warning_days < 0 {
            return Err(ConfigError::Invalid(
                "schedule_warning_days must be >= 0".to_string(),
            ));
        }
        if !self.over_budget_critical_ratio.is_finite() || self.over_budget_critical_ratio < 0.0 {
            return Err(ConfigError::Invalid(
                "over_budget_critical_ratio must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}
