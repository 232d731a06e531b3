//! Solver selection as runtime configuration.

use crate::adapter::{Credentials, DynSolver, SolveResult, SolverAdapter};
use crate::anneal::{AnnealingSchedule, AnnealingSolver};
use crate::error::SolverError;
use crate::exhaustive::{ExhaustiveSolver, EXHAUSTIVE_LIMIT};
use draftforge_model::Polynomial;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverBackend {
    Exhaustive,
    Anneal,
    /// Exhaustive when the problem is small enough, annealing otherwise.
    Auto,
}

impl FromStr for SolverBackend {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" | "exact" => Ok(SolverBackend::Exhaustive),
            "anneal" | "annealing" | "sa" => Ok(SolverBackend::Anneal),
            "auto" => Ok(SolverBackend::Auto),
            other => Err(SolverError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// `None` means no solver capability is available.
    pub backend: Option<SolverBackend>,
    pub seed: u64,
    pub exhaustive_limit: usize,
    pub schedule: AnnealingSchedule,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: Some(SolverBackend::Auto),
            seed: 0x5eed,
            exhaustive_limit: EXHAUSTIVE_LIMIT,
            schedule: AnnealingSchedule::default(),
        }
    }
}

impl SolverConfig {
    /// Configuration with the solver capability switched off.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            ..Self::default()
        }
    }

    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Read overrides from the environment.
    /// Recognizes: DRAFTFORGE_SOLVER (exhaustive|anneal|auto|none),
    /// DRAFTFORGE_SOLVER_SEED, DRAFTFORGE_EXHAUSTIVE_LIMIT, DRAFTFORGE_ANNEAL_SWEEPS
    pub fn from_env() -> Result<Self, SolverError> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("DRAFTFORGE_SOLVER") {
            config.backend = match raw.trim().to_ascii_lowercase().as_str() {
                "none" | "off" | "" => None,
                other => Some(other.parse()?),
            };
        }
        if let Ok(raw) = std::env::var("DRAFTFORGE_SOLVER_SEED") {
            config.seed = parse_setting("DRAFTFORGE_SOLVER_SEED", &raw)?;
        }
        if let Ok(raw) = std::env::var("DRAFTFORGE_EXHAUSTIVE_LIMIT") {
            config.exhaustive_limit = parse_setting("DRAFTFORGE_EXHAUSTIVE_LIMIT", &raw)?;
        }
        if let Ok(raw) = std::env::var("DRAFTFORGE_ANNEAL_SWEEPS") {
            config.schedule.sweeps = parse_setting("DRAFTFORGE_ANNEAL_SWEEPS", &raw)?;
        }

        Ok(config)
    }

    /// Instantiate the configured solver, or `None` when the capability is off.
    pub fn build(&self) -> Option<DynSolver> {
        let backend = self.backend?;
        let anneal = || {
            AnnealingSolver::new(self.seed).with_schedule(self.schedule.clone())
        };
        let solver: DynSolver = match backend {
            SolverBackend::Exhaustive => {
                Arc::new(ExhaustiveSolver::with_limit(self.exhaustive_limit))
            }
            SolverBackend::Anneal => Arc::new(anneal()),
            SolverBackend::Auto => Arc::new(AutoSolver {
                exhaustive: ExhaustiveSolver::with_limit(self.exhaustive_limit),
                anneal: anneal(),
            }),
        };
        info!(solver = solver.name(), seed = self.seed, "solver capability configured");
        Some(solver)
    }
}

fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Result<T, SolverError> {
    raw.trim()
        .parse()
        .map_err(|_| SolverError::InvalidSetting(format!("{key}={raw}")))
}

/// Dispatches on problem size.
pub struct AutoSolver {
    exhaustive: ExhaustiveSolver,
    anneal: AnnealingSolver,
}

impl SolverAdapter for AutoSolver {
    fn name(&self) -> &str {
        "auto"
    }

    fn requires_credentials(&self) -> bool {
        false
    }

    fn solve(
        &self,
        objective: &Polynomial,
        credentials: &Credentials,
        budget: Duration,
    ) -> Result<SolveResult, SolverError> {
        if objective.num_variables() <= self.exhaustive.limit() {
            self.exhaustive.solve(objective, credentials, budget)
        } else {
            self.anneal.solve(objective, credentials, budget)
        }
    }
}
