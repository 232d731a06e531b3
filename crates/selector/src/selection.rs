//! Selection entry points: request in, updated candidates out.

use crate::config::SelectorConfig;
use crate::decoder::{decode_selection, SelectionSummary};
use crate::error::SelectionError;
use crate::orchestrator::TwoStageOrchestrator;
use crate::scales::ScaleTable;
use crate::weights::WeightConfig;
use draftforge_candidates::{Candidate, TargetParams};
use draftforge_model::{Objective, ProblemBuilder};
use draftforge_solver::{Credentials, DynSolver, SolverConfig, TraceSample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Which objectives a selection combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Relevance and parameter fit only.
    Parameter,
    /// Relevance, parameter fit, and a strong pull toward endorsed candidates.
    Custom,
}

impl SelectionMode {
    pub fn objectives(&self) -> &'static [Objective] {
        match self {
            SelectionMode::Parameter => &[Objective::Relevance, Objective::Param],
            SelectionMode::Custom => &[Objective::Relevance, Objective::Param, Objective::Adopt],
        }
    }

    pub fn default_weights(&self) -> WeightConfig {
        match self {
            SelectionMode::Parameter => WeightConfig::parameter_relevance(),
            SelectionMode::Custom => WeightConfig::custom(),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Parameter => f.write_str("parameter"),
            SelectionMode::Custom => f.write_str("custom"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionRequest {
    pub candidates: Vec<Candidate>,
    pub params: TargetParams,
    /// Solver credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Per-name overrides on top of the mode's default weights.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub weights: BTreeMap<String, f64>,
}

impl SelectionRequest {
    pub fn new(candidates: Vec<Candidate>, params: TargetParams) -> Self {
        Self {
            candidates,
            params,
            token: None,
            weights: BTreeMap::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_weight(mut self, name: impl Into<String>, value: f64) -> Self {
        self.weights.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub candidates: Vec<Candidate>,
    pub trace: Vec<TraceSample>,
    pub scales: ScaleTable,
    pub summary: SelectionSummary,
    pub solver: String,
}

/// Runs selections against an injected solver capability.
///
/// Holds no per-request state; one instance can serve any number of
/// sequential requests.
pub struct Selector {
    solver: Option<DynSolver>,
    config: SelectorConfig,
}

impl Selector {
    pub fn new(config: SelectorConfig, solver: Option<DynSolver>) -> Self {
        Self { solver, config }
    }

    pub fn from_configs(config: SelectorConfig, solver: &SolverConfig) -> Self {
        Self::new(config, solver.build())
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn has_solver(&self) -> bool {
        self.solver.is_some()
    }

    /// Relevance + parameter fit, weights `{relevance: 10, param: 5, constraint: 1}`.
    pub fn run_parameter_selection(
        &self,
        request: SelectionRequest,
    ) -> Result<SelectionResponse, SelectionError> {
        self.select(SelectionMode::Parameter, request)
    }

    /// Adds the adoption bias, weights `{relevance: 10, param: 5, adopt: 100, constraint: 1}`.
    pub fn run_custom_selection(
        &self,
        request: SelectionRequest,
    ) -> Result<SelectionResponse, SelectionError> {
        self.select(SelectionMode::Custom, request)
    }

    pub fn select(
        &self,
        mode: SelectionMode,
        request: SelectionRequest,
    ) -> Result<SelectionResponse, SelectionError> {
        let solver = self
            .solver
            .as_deref()
            .ok_or(SelectionError::CapabilityUnavailable)?;

        let SelectionRequest {
            mut candidates,
            params,
            token,
            weights: overrides,
        } = request;

        if candidates.is_empty() {
            return Err(SelectionError::EmptyInput);
        }

        let credentials = Credentials::from(token);
        if solver.requires_credentials() && credentials.is_empty() {
            return Err(SelectionError::MissingCredential {
                solver: solver.name().to_string(),
            });
        }

        let mut weights = mode.default_weights();
        weights.apply_overrides(&overrides);
        weights.validate()?;

        info!(
            mode = %mode,
            candidates = candidates.len(),
            target_length = params.length,
            solver = solver.name(),
            "starting selection"
        );

        let problem = ProblemBuilder::new(&candidates, &params)
            .with_objectives(mode.objectives())
            .with_length_penalty(self.config.length_penalty)
            .build()?;

        let outcome =
            TwoStageOrchestrator::new(solver, &self.config).run(&problem, &weights, &credentials)?;

        let best = outcome.result.best().map(|s| &s.assignment);
        let selected = decode_selection(&mut candidates, best);
        let summary = SelectionSummary::from_candidates(&candidates, params.length);

        info!(
            mode = %mode,
            selected,
            selected_length = summary.selected_length,
            length_delta = summary.length_delta,
            "selection complete"
        );

        Ok(SelectionResponse {
            trace: outcome.result.trace(),
            candidates,
            scales: outcome.scales,
            summary,
            solver: solver.name().to_string(),
        })
    }
}
