//! Selection error taxonomy.

use draftforge_model::ModelError;
use draftforge_solver::SolverError;
use std::fmt;
use thiserror::Error;

/// Which solver invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Constraint-only solve used to measure objective magnitudes.
    Scaling,
    /// Weighted, normalized solve whose answer is returned.
    Final,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Scaling => f.write_str("scaling stage"),
            Stage::Final => f.write_str("final stage"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("combinatorial solver capability is not available; configure a solver backend")]
    CapabilityUnavailable,

    #[error("solver '{solver}' requires a credential but none was supplied")]
    MissingCredential { solver: String },

    #[error("nothing to optimize: the candidate list is empty")]
    EmptyInput,

    #[error("invalid weight for '{name}': {value} (weights must be finite and non-negative)")]
    InvalidWeight { name: String, value: f64 },

    #[error("could not build the selection model: {0}")]
    Model(#[from] ModelError),

    #[error("solver failed in the {stage}: {source}")]
    Solver {
        stage: Stage,
        #[source]
        source: SolverError,
    },
}

impl SelectionError {
    pub(crate) fn solver(stage: Stage) -> impl FnOnce(SolverError) -> SelectionError {
        move |source| SelectionError::Solver { stage, source }
    }

    /// Errors caused by the request contents rather than configuration or the solver.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SelectionError::EmptyInput
                | SelectionError::InvalidWeight { .. }
                | SelectionError::Model(ModelError::EmptyInput)
                | SelectionError::Model(ModelError::InvalidTarget(_))
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}
