//! Objective weights.

use crate::error::SelectionError;
use draftforge_model::Objective;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Key under which the constraint multiplier appears in keyed form.
pub const CONSTRAINT_KEY: &str = "constraint";

/// Multipliers for each objective plus the length constraint.
///
/// Missing objectives weigh 1.0. Keyed form is a flat map such as
/// `{"relevance": 10.0, "param": 5.0, "constraint": 1.0}`; unknown names are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightConfig {
    weights: BTreeMap<Objective, f64>,
    constraint: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            constraint: 1.0,
        }
    }
}

impl WeightConfig {
    /// `{relevance: 10, param: 5, constraint: 1}`
    pub fn parameter_relevance() -> Self {
        Self::default()
            .with(Objective::Relevance, 10.0)
            .with(Objective::Param, 5.0)
    }

    /// `{relevance: 10, param: 5, adopt: 100, constraint: 1}`
    pub fn custom() -> Self {
        Self::parameter_relevance().with(Objective::Adopt, 100.0)
    }

    pub fn with(mut self, objective: Objective, weight: f64) -> Self {
        self.weights.insert(objective, weight);
        self
    }

    pub fn with_constraint(mut self, weight: f64) -> Self {
        self.constraint = weight;
        self
    }

    pub fn weight(&self, objective: Objective) -> f64 {
        self.weights.get(&objective).copied().unwrap_or(1.0)
    }

    pub fn constraint(&self) -> f64 {
        self.constraint
    }

    /// Apply named overrides on top of these weights.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, f64>) {
        for (name, value) in overrides {
            if name == CONSTRAINT_KEY {
                self.constraint = *value;
            } else if let Some(objective) = Objective::from_name(name) {
                self.weights.insert(objective, *value);
            } else {
                debug!(name = %name, "ignoring unknown weight name");
            }
        }
    }

    pub fn validate(&self) -> Result<(), SelectionError> {
        let entries = self
            .weights
            .iter()
            .map(|(o, w)| (o.name(), *w))
            .chain(std::iter::once((CONSTRAINT_KEY, self.constraint)));
        for (name, value) in entries {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SelectionError::InvalidWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, f64>> for WeightConfig {
    type Error = SelectionError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        let mut config = WeightConfig::default();
        config.apply_overrides(&map);
        config.validate()?;
        Ok(config)
    }
}

impl From<WeightConfig> for BTreeMap<String, f64> {
    fn from(config: WeightConfig) -> Self {
        let mut map: BTreeMap<String, f64> = config
            .weights
            .iter()
            .map(|(o, w)| (o.name().to_string(), *w))
            .collect();
        map.insert(CONSTRAINT_KEY.to_string(), config.constraint);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_defaults() {
        let w = WeightConfig::parameter_relevance();
        assert_eq!(w.weight(Objective::Relevance), 10.0);
        assert_eq!(w.weight(Objective::Param), 5.0);
        assert_eq!(w.weight(Objective::Adopt), 1.0);
        assert_eq!(w.constraint(), 1.0);

        assert_eq!(WeightConfig::custom().weight(Objective::Adopt), 100.0);
    }

    #[test]
    fn test_unknown_names_ignored() {
        let w: WeightConfig =
            serde_json::from_str(r#"{"relevance": 2.0, "novelty": 7.0, "constraint": 0.5}"#)
                .unwrap();
        assert_eq!(w.weight(Objective::Relevance), 2.0);
        assert_eq!(w.weight(Objective::Param), 1.0);
        assert_eq!(w.constraint(), 0.5);

        let keyed: BTreeMap<String, f64> = w.into();
        assert!(!keyed.contains_key("novelty"));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let err = serde_json::from_str::<WeightConfig>(r#"{"adopt": -1.0}"#).unwrap_err();
        assert!(err.to_string().contains("adopt"));

        let w = WeightConfig::custom().with_constraint(f64::NAN);
        assert!(matches!(w.validate(), Err(SelectionError::InvalidWeight { .. })));
    }
}
