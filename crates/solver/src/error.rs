//! Solver errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("{solver}: {variables} variables exceed the limit of {limit}")]
    TooLarge {
        solver: String,
        variables: usize,
        limit: usize,
    },

    #[error("{solver} returned no usable assignment")]
    NoAssignment { solver: String },

    #[error("unknown solver backend '{0}' (expected exhaustive, anneal, auto or none)")]
    UnknownBackend(String),

    #[error("invalid solver setting: {0}")]
    InvalidSetting(String),

    #[error("{solver} failed: {detail}")]
    Backend { solver: String, detail: String },
}
