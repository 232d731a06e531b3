//! Binary decision variables and assignments to them.

use crate::poly::Polynomial;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a decision variable. Variable `i` belongs to candidate `i`.
pub type VarId = usize;

/// One binary variable per candidate, indexed like the candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionVector {
    len: usize,
}

impl DecisionVector {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The variable as a polynomial `q_i`.
    pub fn var(&self, index: usize) -> Polynomial {
        debug_assert!(index < self.len, "decision variable {index} out of range");
        Polynomial::variable(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = VarId> {
        0..self.len
    }
}

/// Values a solver assigned to decision variables.
///
/// Values are stored as reals so adapters that report relaxed or noisy
/// values can be decoded with a threshold. A variable may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    values: BTreeMap<VarId, f64>,
}

impl Assignment {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn from_bits(bits: &[bool]) -> Self {
        Self {
            values: bits
                .iter()
                .enumerate()
                .map(|(i, b)| (i, if *b { 1.0 } else { 0.0 }))
                .collect(),
        }
    }

    pub fn set(&mut self, var: VarId, value: f64) {
        self.values.insert(var, value);
    }

    pub fn get(&self, var: VarId) -> Option<f64> {
        self.values.get(&var).copied()
    }

    /// Thresholded value of `var`, or `None` when it is absent or not a
    /// finite number.
    pub fn bit(&self, var: VarId) -> Option<bool> {
        self.get(var).filter(|v| v.is_finite()).map(|v| v > 0.5)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dense 0/1 view over `len` variables; unreadable values become 0.
    pub fn to_bits(&self, len: usize) -> Vec<bool> {
        (0..len).map(|i| self.bit(i).unwrap_or(false)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_thresholds() {
        let mut assignment = Assignment::new();
        assignment.set(0, 1.0);
        assignment.set(1, 0.4);
        assignment.set(2, f64::NAN);

        assert_eq!(assignment.bit(0), Some(true));
        assert_eq!(assignment.bit(1), Some(false));
        assert_eq!(assignment.bit(2), None);
        assert_eq!(assignment.bit(3), None);
        assert_eq!(assignment.to_bits(4), vec![true, false, false, false]);
    }

    #[test]
    fn test_decision_vector() {
        let q = DecisionVector::new(3);
        assert_eq!(q.len(), 3);
        assert_eq!(q.var(2).linear_coefficient(2), 1.0);
        assert_eq!(q.ids().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
