//! Exhaustive enumeration for small candidate sets.

use crate::adapter::{Credentials, SolveResult, Solution, SolverAdapter};
use crate::compiled::{to_assignment, CompiledQubo};
use crate::error::SolverError;
use draftforge_model::Polynomial;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Upper bound on variables the exhaustive solver accepts by default.
pub const EXHAUSTIVE_LIMIT: usize = 20;

/// How often (in visited assignments) the time budget is checked.
const BUDGET_CHECK_INTERVAL: u64 = 4096;

/// Visits every assignment in Gray-code order, so each step is one bit flip.
///
/// Exact, deterministic, and independent of credentials. Every strict
/// improvement over the incumbent is reported as a solution.
pub struct ExhaustiveSolver {
    limit: usize,
}

impl ExhaustiveSolver {
    pub fn new() -> Self {
        Self {
            limit: EXHAUSTIVE_LIMIT,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverAdapter for ExhaustiveSolver {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn requires_credentials(&self) -> bool {
        false
    }

    fn solve(
        &self,
        objective: &Polynomial,
        _credentials: &Credentials,
        budget: Duration,
    ) -> Result<SolveResult, SolverError> {
        let qubo = CompiledQubo::from_polynomial(objective);
        let n = qubo.len();
        if n > self.limit || n >= 64 {
            return Err(SolverError::TooLarge {
                solver: self.name().into(),
                variables: n,
                limit: self.limit,
            });
        }

        let start = Instant::now();
        let mut bits = vec![false; n];
        let mut energy = qubo.energy(&bits);
        let mut best = energy;
        let mut found = vec![Solution {
            assignment: to_assignment(&bits),
            objective: energy,
            elapsed: start.elapsed(),
        }];

        let total: u64 = 1u64 << n;
        for step in 1..total {
            // Gray code: step k flips the lowest set bit of k.
            let var = step.trailing_zeros() as usize;
            energy += qubo.flip_delta(&bits, var);
            bits[var] = !bits[var];

            if energy < best {
                best = energy;
                found.push(Solution {
                    assignment: to_assignment(&bits),
                    objective: energy,
                    elapsed: start.elapsed(),
                });
            }

            if step % BUDGET_CHECK_INTERVAL == 0 && start.elapsed() > budget {
                warn!(
                    visited = step,
                    total,
                    budget_ms = budget.as_millis() as u64,
                    "exhaustive search hit its time budget; returning best so far"
                );
                break;
            }
        }

        // Accumulated deltas drift slightly; report exact values.
        for solution in &mut found {
            solution.objective = objective.evaluate(&solution.assignment);
        }

        debug!(
            variables = n,
            improvements = found.len(),
            best,
            "exhaustive search finished"
        );
        Ok(SolveResult::from_solutions(found))
    }
}
