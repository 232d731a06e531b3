//! Orchestrator settings.

use crate::error::ConfigError;
use draftforge_model::LENGTH_PENALTY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Smallest divisor an objective can be normalized by.
pub const SCALE_FLOOR: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Time budget of the constraint-only scaling solve.
    pub scaling_budget_ms: u64,
    /// Time budget of the final weighted solve.
    pub final_budget_ms: u64,
    /// Coefficient of the squared length deviation.
    pub length_penalty: f64,
    pub scale_floor: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            scaling_budget_ms: 5_000,
            final_budget_ms: 10_000,
            length_penalty: LENGTH_PENALTY,
            scale_floor: SCALE_FLOOR,
        }
    }
}

impl SelectorConfig {
    pub fn with_budgets(mut self, scaling_ms: u64, final_ms: u64) -> Self {
        self.scaling_budget_ms = scaling_ms;
        self.final_budget_ms = final_ms;
        self
    }

    pub fn scaling_budget(&self) -> Duration {
        Duration::from_millis(self.scaling_budget_ms)
    }

    pub fn final_budget(&self) -> Duration {
        Duration::from_millis(self.final_budget_ms)
    }

    /// Read overrides from the environment.
    /// Recognizes: DRAFTFORGE_SCALING_BUDGET_MS, DRAFTFORGE_FINAL_BUDGET_MS,
    /// DRAFTFORGE_LENGTH_PENALTY
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = env_parse("DRAFTFORGE_SCALING_BUDGET_MS")? {
            config.scaling_budget_ms = v;
        }
        if let Some(v) = env_parse("DRAFTFORGE_FINAL_BUDGET_MS")? {
            config.final_budget_ms = v;
        }
        if let Some(v) = env_parse("DRAFTFORGE_LENGTH_PENALTY")? {
            config.length_penalty = v;
        }
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let blob = serde_json::to_vec_pretty(self)?;
        fs::write(path, blob)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.length_penalty.is_finite() && self.length_penalty >= 0.0) {
            return Err(format!("length_penalty must be non-negative, got {}", self.length_penalty));
        }
        if !(self.scale_floor.is_finite() && self.scale_floor > 0.0) {
            return Err(format!("scale_floor must be positive, got {}", self.scale_floor));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("{key}={raw}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budgets() {
        let config = SelectorConfig::default();
        assert_eq!(config.scaling_budget(), Duration::from_secs(5));
        assert_eq!(config.final_budget(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selector.json");
        let config = SelectorConfig::default().with_budgets(100, 400);
        config.save_to_file(&path).unwrap();
        assert_eq!(SelectorConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_floor() {
        let config = SelectorConfig {
            scale_floor: 0.0,
            ..SelectorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
