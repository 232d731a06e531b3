//! Two-stage solve: measure objective magnitudes under the length constraint,
//! then solve the weighted, normalized sum.
//!
//! ```text
//! stage 1: solve(constraint)                      ──▶ assignment a₁
//!          scale[o] = max(|o(a₁)|, floor)
//! stage 2: solve(w_c·constraint + Σ w[o]/scale[o]·o) ──▶ ranked solutions + trace
//! ```

use crate::config::SelectorConfig;
use crate::error::{SelectionError, Stage};
use crate::scales::ScaleTable;
use crate::weights::WeightConfig;
use draftforge_model::{Polynomial, SelectionProblem};
use draftforge_solver::{Credentials, SolveResult, SolverAdapter};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of the final solve together with the scales that shaped it.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub result: SolveResult,
    pub scales: ScaleTable,
}

pub struct TwoStageOrchestrator<'a> {
    solver: &'a dyn SolverAdapter,
    config: &'a SelectorConfig,
}

impl<'a> TwoStageOrchestrator<'a> {
    pub fn new(solver: &'a dyn SolverAdapter, config: &'a SelectorConfig) -> Self {
        Self { solver, config }
    }

    /// Stage 1. Solver errors propagate; an empty result falls back to unit scales.
    pub fn compute_scales(
        &self,
        problem: &SelectionProblem,
        credentials: &Credentials,
    ) -> Result<ScaleTable, SelectionError> {
        let objectives = problem.objectives.iter().map(|(o, _)| *o);

        let result = self
            .solver
            .solve(&problem.constraint, credentials, self.config.scaling_budget())
            .map_err(SelectionError::solver(Stage::Scaling))?;

        let Some(best) = result.best() else {
            warn!(
                solver = self.solver.name(),
                "scaling stage returned no assignment; objectives left unnormalized"
            );
            return Ok(ScaleTable::unit(objectives));
        };

        let magnitudes = problem
            .objectives
            .iter()
            .map(|(o, poly)| (*o, self.solver.evaluate(poly, &best.assignment)));
        let scales = ScaleTable::from_magnitudes(magnitudes, self.config.scale_floor);

        for (name, scale) in scales.iter() {
            debug!(objective = name, scale, "objective scale");
        }
        Ok(scales)
    }

    /// `w_c · constraint + Σ (w[o] / scale[o]) · o`
    pub fn final_expression(
        problem: &SelectionProblem,
        weights: &WeightConfig,
        scales: &ScaleTable,
    ) -> Polynomial {
        let mut expression = &problem.constraint * weights.constraint();
        for (objective, poly) in &problem.objectives {
            let factor = weights.weight(*objective) / scales.get(*objective);
            expression += poly * factor;
        }
        expression
    }

    /// Run both stages.
    pub fn run(
        &self,
        problem: &SelectionProblem,
        weights: &WeightConfig,
        credentials: &Credentials,
    ) -> Result<Outcome, SelectionError> {
        let start = Instant::now();

        let scales = self.compute_scales(problem, credentials)?;
        let scaling_ms = start.elapsed().as_secs_f64() * 1000.0;

        let expression = Self::final_expression(problem, weights, &scales);
        let result = self
            .solver
            .solve(&expression, credentials, self.config.final_budget())
            .map_err(SelectionError::solver(Stage::Final))?;

        if result.is_empty() {
            return Err(SelectionError::Solver {
                stage: Stage::Final,
                source: draftforge_solver::SolverError::NoAssignment {
                    solver: self.solver.name().into(),
                },
            });
        }

        info!(
            solver = self.solver.name(),
            variables = problem.variables.len(),
            solutions = result.solutions().len(),
            best = result.best().map(|s| s.objective),
            scaling_ms,
            total_ms = start.elapsed().as_secs_f64() * 1000.0,
            "two-stage solve finished"
        );

        Ok(Outcome { result, scales })
    }
}
