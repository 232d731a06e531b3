//! Simulated annealing over single-bit flips.

use crate::adapter::{Credentials, SolveResult, Solution, SolverAdapter};
use crate::compiled::{to_assignment, CompiledQubo};
use crate::error::SolverError;
use draftforge_model::Polynomial;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Cooling schedule for [`AnnealingSolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingSchedule {
    /// Number of sweeps (one sweep = `n` attempted flips).
    pub sweeps: usize,
    /// Starting temperature; `None` derives it from the objective's coefficients.
    pub start_temperature: Option<f64>,
    /// Final temperature as a fraction of the starting one.
    pub end_ratio: f64,
    /// Independent runs from fresh random states.
    pub restarts: usize,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            sweeps: 2_000,
            start_temperature: None,
            end_ratio: 1e-4,
            restarts: 4,
        }
    }
}

impl AnnealingSchedule {
    /// A short schedule for quick scaling passes and tests.
    pub fn quick() -> Self {
        Self {
            sweeps: 200,
            restarts: 2,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sweeps == 0 {
            return Err("sweeps must be > 0".into());
        }
        if self.restarts == 0 {
            return Err("restarts must be > 0".into());
        }
        if !(self.end_ratio > 0.0 && self.end_ratio <= 1.0) {
            return Err("end_ratio must be in (0, 1]".into());
        }
        if let Some(t) = self.start_temperature {
            if !(t.is_finite() && t > 0.0) {
                return Err("start_temperature must be a positive number".into());
            }
        }
        Ok(())
    }

    fn temperature(&self, start: f64, sweep: usize) -> f64 {
        if self.sweeps <= 1 {
            return start * self.end_ratio;
        }
        let progress = sweep as f64 / (self.sweeps - 1) as f64;
        start * self.end_ratio.powf(progress)
    }
}

/// Seeded simulated annealing. Deterministic for a given seed unless the
/// time budget cuts a run short.
pub struct AnnealingSolver {
    schedule: AnnealingSchedule,
    seed: u64,
}

impl AnnealingSolver {
    pub fn new(seed: u64) -> Self {
        Self {
            schedule: AnnealingSchedule::default(),
            seed,
        }
    }

    pub fn with_schedule(mut self, schedule: AnnealingSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn schedule(&self) -> &AnnealingSchedule {
        &self.schedule
    }
}

impl SolverAdapter for AnnealingSolver {
    fn name(&self) -> &str {
        "anneal"
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
        self.schedule
            .validate()
            .map_err(SolverError::InvalidSetting)?;

        let start = Instant::now();
        let qubo = CompiledQubo::from_polynomial(objective);
        let n = qubo.len();
        let mut rng = fastrand::Rng::with_seed(self.seed);

        let t0 = self
            .schedule
            .start_temperature
            .unwrap_or_else(|| (qubo.magnitude() * 0.5).max(1e-6));

        let mut best_energy = f64::INFINITY;
        let mut found: Vec<Solution> = Vec::new();
        let mut timed_out = false;

        'restarts: for restart in 0..self.schedule.restarts {
            let mut bits: Vec<bool> = (0..n).map(|_| rng.bool()).collect();
            let mut energy = qubo.energy(&bits);

            if energy < best_energy {
                best_energy = energy;
                found.push(Solution {
                    assignment: to_assignment(&bits),
                    objective: energy,
                    elapsed: start.elapsed(),
                });
            }

            if n == 0 {
                break;
            }

            for sweep in 0..self.schedule.sweeps {
                let temperature = self.schedule.temperature(t0, sweep);
                for _ in 0..n {
                    let var = rng.usize(..n);
                    let delta = qubo.flip_delta(&bits, var);
                    if delta <= 0.0 || rng.f64() < (-delta / temperature).exp() {
                        bits[var] = !bits[var];
                        energy += delta;

                        if energy < best_energy - 1e-12 {
                            best_energy = energy;
                            found.push(Solution {
                                assignment: to_assignment(&bits),
                                objective: energy,
                                elapsed: start.elapsed(),
                            });
                        }
                    }
                }

                if start.elapsed() > budget {
                    debug!(restart, sweep, "annealing hit its time budget");
                    timed_out = true;
                    break 'restarts;
                }
            }
        }

        for solution in &mut found {
            solution.objective = objective.evaluate(&solution.assignment);
        }

        debug!(
            variables = n,
            improvements = found.len(),
            best = best_energy,
            timed_out,
            seed = self.seed,
            "annealing finished"
        );

        if found.is_empty() {
            return Err(SolverError::NoAssignment {
                solver: self.name().into(),
            });
        }
        Ok(SolveResult::from_solutions(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exhaustive::ExhaustiveSolver;

    fn length_like_objective() -> Polynomial {
        let lengths = [50.0, 80.0, 120.0, 30.0, 95.0, 60.0];
        let selected: Polynomial = lengths
            .iter()
            .enumerate()
            .map(|(i, l)| Polynomial::term(i, *l))
            .sum();
        (selected - 200.0).square().unwrap() * 0.001
    }

    #[test]
    fn test_matches_exhaustive_on_small_problem() {
        let p = length_like_objective();
        let exact = ExhaustiveSolver::new()
            .solve(&p, &Credentials::none(), Duration::from_secs(5))
            .unwrap();
        let annealed = AnnealingSolver::new(7)
            .solve(&p, &Credentials::none(), Duration::from_secs(5))
            .unwrap();

        let exact_best = exact.best().unwrap().objective;
        let annealed_best = annealed.best().unwrap().objective;
        assert!((annealed_best - exact_best).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_answer() {
        let p = length_like_objective();
        let solver = AnnealingSolver::new(42).with_schedule(AnnealingSchedule::quick());
        let a = solver
            .solve(&p, &Credentials::none(), Duration::from_secs(5))
            .unwrap();
        let b = solver
            .solve(&p, &Credentials::none(), Duration::from_secs(5))
            .unwrap();
        assert_eq!(
            a.best().unwrap().assignment,
            b.best().unwrap().assignment
        );
    }

    #[test]
    fn test_invalid_schedule() {
        let solver = AnnealingSolver::new(1).with_schedule(AnnealingSchedule {
            sweeps: 0,
            ..Default::default()
        });
        let err = solver
            .solve(&Polynomial::variable(0), &Credentials::none(), Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, SolverError::InvalidSetting(_)));
    }
}
