//! Per-objective normalization divisors.

use crate::weights::CONSTRAINT_KEY;
use draftforge_model::Objective;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Divisor per objective, plus `constraint: 1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleTable(BTreeMap<String, f64>);

impl ScaleTable {
    /// Every objective at 1.0: no normalization.
    pub fn unit(objectives: impl IntoIterator<Item = Objective>) -> Self {
        Self::from_entries(objectives.into_iter().map(|o| (o, 1.0)))
    }

    /// Scales from magnitudes measured at a feasible assignment:
    /// `max(|magnitude|, floor)`.
    pub fn from_magnitudes(
        magnitudes: impl IntoIterator<Item = (Objective, f64)>,
        floor: f64,
    ) -> Self {
        Self::from_entries(magnitudes.into_iter().map(|(o, m)| {
            let scale = if m.is_finite() { m.abs().max(floor) } else { 1.0 };
            (o, scale)
        }))
    }

    fn from_entries(entries: impl Iterator<Item = (Objective, f64)>) -> Self {
        let mut map: BTreeMap<String, f64> =
            entries.map(|(o, s)| (o.name().to_string(), s)).collect();
        map.insert(CONSTRAINT_KEY.to_string(), 1.0);
        Self(map)
    }

    pub fn get(&self, objective: Objective) -> f64 {
        self.0.get(objective.name()).copied().unwrap_or(1.0)
    }

    pub fn constraint(&self) -> f64 {
        self.0.get(CONSTRAINT_KEY).copied().unwrap_or(1.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_and_constraint_entry() {
        let table = ScaleTable::from_magnitudes(
            [(Objective::Relevance, -3.2), (Objective::Param, 0.0001)],
            0.01,
        );
        assert_eq!(table.get(Objective::Relevance), 3.2);
        assert_eq!(table.get(Objective::Param), 0.01);
        assert_eq!(table.constraint(), 1.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_unit_table_serializes_flat() {
        let table = ScaleTable::unit([Objective::Relevance, Objective::Adopt]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!({"relevance": 1.0, "adopt": 1.0, "constraint": 1.0}));
    }
}
