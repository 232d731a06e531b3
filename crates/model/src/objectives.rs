//! Objective and constraint expressions over candidate decision variables.
//!
//! Every objective is a sum of one term per candidate, built in candidate
//! order. Lower is better.

use crate::error::ModelError;
use crate::poly::Polynomial;
use crate::variables::DecisionVector;
use draftforge_candidates::{Candidate, TargetParams};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default coefficient of the squared length deviation.
pub const LENGTH_PENALTY: f64 = 0.001;

/// Named objectives a selection can combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Penalizes off-topic candidates.
    Relevance,
    /// Penalizes distance from the target stylistic parameters.
    Param,
    /// Rewards keeping candidates the user endorsed.
    Adopt,
}

impl Objective {
    pub const ALL: [Objective; 3] = [Objective::Relevance, Objective::Param, Objective::Adopt];

    pub fn name(&self) -> &'static str {
        match self {
            Objective::Relevance => "relevance",
            Objective::Param => "param",
            Objective::Adopt => "adopt",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.name() == name)
    }

    pub fn build(
        &self,
        q: &DecisionVector,
        candidates: &[Candidate],
        params: &TargetParams,
    ) -> Polynomial {
        match self {
            Objective::Relevance => relevance_objective(q, candidates),
            Objective::Param => param_objective(q, candidates, params),
            Objective::Adopt => adoption_objective(q, candidates),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Σ (1 - relevance_i) q_i`
pub fn relevance_objective(q: &DecisionVector, candidates: &[Candidate]) -> Polynomial {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| q.var(i) * (1.0 - c.relevance))
        .sum()
}

/// `Σ dist²(attributes_i, target(kind_i)) q_i`
pub fn param_objective(
    q: &DecisionVector,
    candidates: &[Candidate],
    params: &TargetParams,
) -> Polynomial {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let cost = params.squared_distance(&c.kind, |axis| c.attribute(axis));
            q.var(i) * cost
        })
        .sum()
}

/// `Σ_{adopted} (1 - q_i)`
///
/// The constant term is kept; it shifts the value but not the arg-min.
pub fn adoption_objective(q: &DecisionVector, candidates: &[Candidate]) -> Polynomial {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_adopted())
        .map(|(i, _)| Polynomial::constant(1.0) - q.var(i))
        .sum()
}

/// `Σ len_i q_i`, with length in characters.
pub fn selected_length(q: &DecisionVector, candidates: &[Candidate]) -> Polynomial {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| q.var(i) * c.char_len() as f64)
        .sum()
}

/// `coefficient * (Σ len_i q_i - target)²`, a soft pull toward the target length.
pub fn length_penalty(
    q: &DecisionVector,
    candidates: &[Candidate],
    target_length: f64,
    coefficient: f64,
) -> Result<Polynomial, ModelError> {
    let deviation = selected_length(q, candidates) - target_length;
    Ok(deviation.square()? * coefficient)
}

/// Everything the orchestrator needs: variables, named objectives, and the
/// always-present constraint penalty.
#[derive(Debug, Clone)]
pub struct SelectionProblem {
    pub variables: DecisionVector,
    pub objectives: Vec<(Objective, Polynomial)>,
    pub constraint: Polynomial,
    pub target_length: f64,
}

impl SelectionProblem {
    pub fn objective(&self, objective: Objective) -> Option<&Polynomial> {
        self.objectives
            .iter()
            .find(|(o, _)| *o == objective)
            .map(|(_, p)| p)
    }
}

#[derive(Debug, Clone)]
pub struct ProblemBuilder<'a> {
    candidates: &'a [Candidate],
    params: &'a TargetParams,
    objectives: Vec<Objective>,
    length_penalty: f64,
}

impl<'a> ProblemBuilder<'a> {
    pub fn new(candidates: &'a [Candidate], params: &'a TargetParams) -> Self {
        Self {
            candidates,
            params,
            objectives: Vec::new(),
            length_penalty: LENGTH_PENALTY,
        }
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        if !self.objectives.contains(&objective) {
            self.objectives.push(objective);
        }
        self
    }

    pub fn with_objectives(self, objectives: &[Objective]) -> Self {
        objectives
            .iter()
            .fold(self, |builder, o| builder.with_objective(*o))
    }

    pub fn with_length_penalty(mut self, coefficient: f64) -> Self {
        self.length_penalty = coefficient;
        self
    }

    pub fn build(self) -> Result<SelectionProblem, ModelError> {
        if self.candidates.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        self.params.validate().map_err(ModelError::InvalidTarget)?;

        let q = DecisionVector::new(self.candidates.len());
        let objectives = self
            .objectives
            .iter()
            .map(|o| (*o, o.build(&q, self.candidates, self.params)))
            .collect();
        let constraint = length_penalty(
            &q,
            self.candidates,
            self.params.length,
            self.length_penalty,
        )?;

        Ok(SelectionProblem {
            variables: q,
            objectives,
            constraint,
            target_length: self.params.length,
        })
    }
}
