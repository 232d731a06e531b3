//! Solver adapter contract.

use crate::error::SolverError;
use draftforge_model::{Assignment, Polynomial};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Opaque token handed to the solver backend.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credentials(<none>)")
        } else {
            f.write_str("Credentials(<redacted>)")
        }
    }
}

impl From<Option<String>> for Credentials {
    fn from(token: Option<String>) -> Self {
        token.map(Credentials::new).unwrap_or_default()
    }
}

/// One assignment a solver returned, with its objective value and the time
/// into the solve at which it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub assignment: Assignment,
    pub objective: f64,
    pub elapsed: Duration,
}

/// `(elapsed seconds, objective value)` sample for value-over-time plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub time: f64,
    pub value: f64,
}

/// Solutions ranked best (lowest objective) first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveResult {
    solutions: Vec<Solution>,
}

impl SolveResult {
    pub fn empty() -> Self {
        Self {
            solutions: Vec::new(),
        }
    }

    /// Rank solutions by objective value; ties keep their original order.
    pub fn from_solutions(mut solutions: Vec<Solution>) -> Self {
        solutions.sort_by(|a, b| a.objective.total_cmp(&b.objective));
        Self { solutions }
    }

    pub fn best(&self) -> Option<&Solution> {
        self.solutions.first()
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Samples in order of discovery.
    pub fn trace(&self) -> Vec<TraceSample> {
        let mut samples: Vec<TraceSample> = self
            .solutions
            .iter()
            .map(|s| TraceSample {
                time: s.elapsed.as_secs_f64(),
                value: s.objective,
            })
            .collect();
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        samples
    }
}

/// A combinatorial solver that minimizes a quadratic binary objective.
pub trait SolverAdapter: Send + Sync {
    /// Name of this solver.
    fn name(&self) -> &str;

    /// Whether the backend needs a non-empty credential.
    fn requires_credentials(&self) -> bool {
        true
    }

    /// Minimize `objective` within `budget`.
    fn solve(
        &self,
        objective: &Polynomial,
        credentials: &Credentials,
        budget: Duration,
    ) -> Result<SolveResult, SolverError>;

    /// Value of an already-built expression at an assignment, without solving.
    fn evaluate(&self, objective: &Polynomial, assignment: &Assignment) -> f64 {
        objective.evaluate(assignment)
    }
}

pub type DynSolver = Arc<dyn SolverAdapter>;
