//! DraftForge: pick the subset of generated passages that best fits a length
//! target, a stylistic profile, and the user's endorsements.
//!
//! ```text
//! candidates ──▶ model (objectives + constraint) ──▶ solver ×2 ──▶ selector ──▶ updated candidates
//! ```

pub use draftforge_candidates as candidates;
pub use draftforge_model as model;
pub use draftforge_selector as selector;
pub use draftforge_solver as solver;

pub use draftforge_candidates::{Candidate, CandidateKind, CandidatePool, TargetParams};
pub use draftforge_model::{Objective, Polynomial};
pub use draftforge_selector::{
    SelectionError, SelectionMode, SelectionRequest, SelectionResponse, Selector, SelectorConfig,
    WeightConfig,
};
pub use draftforge_solver::{DynSolver, SolverAdapter, SolverConfig};
