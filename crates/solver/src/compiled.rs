//! Dense adjacency form of a polynomial for fast bit-flip search.

use draftforge_model::{Assignment, Polynomial};

#[derive(Debug, Clone)]
pub(crate) struct CompiledQubo {
    constant: f64,
    linear: Vec<f64>,
    neighbors: Vec<Vec<(usize, f64)>>,
}

impl CompiledQubo {
    pub(crate) fn from_polynomial(poly: &Polynomial) -> Self {
        let n = poly.num_variables();
        let mut linear = vec![0.0; n];
        let mut neighbors = vec![Vec::new(); n];

        for (var, c) in poly.linear_terms() {
            linear[var] += c;
        }
        for ((a, b), c) in poly.quadratic_terms() {
            neighbors[a].push((b, c));
            neighbors[b].push((a, c));
        }

        Self {
            constant: poly.constant_term(),
            linear,
            neighbors,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.linear.len()
    }

    pub(crate) fn energy(&self, bits: &[bool]) -> f64 {
        let mut total = self.constant;
        for (var, c) in self.linear.iter().enumerate() {
            if bits[var] {
                total += c;
            }
        }
        for (var, adj) in self.neighbors.iter().enumerate() {
            if !bits[var] {
                continue;
            }
            for (other, c) in adj {
                // Each pair is stored twice; count it once.
                if *other > var && bits[*other] {
                    total += c;
                }
            }
        }
        total
    }

    /// Energy change from flipping `var`.
    pub(crate) fn flip_delta(&self, bits: &[bool], var: usize) -> f64 {
        let mut gradient = self.linear[var];
        for (other, c) in &self.neighbors[var] {
            if bits[*other] {
                gradient += c;
            }
        }
        if bits[var] {
            -gradient
        } else {
            gradient
        }
    }

    /// Largest single-flip energy change from the all-zero state, used to
    /// pick a starting temperature on the objective's own scale.
    pub(crate) fn magnitude(&self) -> f64 {
        self.linear
            .iter()
            .zip(&self.neighbors)
            .map(|(c, adj)| c.abs() + adj.iter().map(|(_, q)| q.abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }
}

pub(crate) fn to_assignment(bits: &[bool]) -> Assignment {
    Assignment::from_bits(bits)
}
