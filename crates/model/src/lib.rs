//! Binary optimization model for candidate selection.
//!
//! # Key Components
//!
//! - [`variables::DecisionVector`]: one 0/1 variable per candidate
//! - [`poly::Polynomial`]: quadratic expression over those variables
//! - [`objectives`]: relevance, parameter-alignment, adoption and length terms
//! - [`objectives::ProblemBuilder`]: assembles a [`objectives::SelectionProblem`]

pub mod error;
pub mod objectives;
pub mod poly;
pub mod variables;

pub use error::ModelError;
pub use objectives::{
    adoption_objective, length_penalty, param_objective, relevance_objective, Objective,
    ProblemBuilder, SelectionProblem, LENGTH_PENALTY,
};
pub use poly::Polynomial;
pub use variables::{Assignment, DecisionVector, VarId};
