//! Errors raised while building a selection model.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("nothing to optimize: the candidate list is empty")]
    EmptyInput,

    #[error("expression of degree {degree} cannot be represented (max 2)")]
    DegreeOverflow { degree: usize },

    #[error("invalid target: {0}")]
    InvalidTarget(String),
}
