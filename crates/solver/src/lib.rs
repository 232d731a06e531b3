//! Solver adapters for DraftForge selection problems.
//!
//! The orchestrator only talks to [`SolverAdapter`]. Two local backends ship
//! here: an exact Gray-code enumerator for small pools and a seeded simulated
//! annealer for larger ones. Remote solvers plug in behind the same trait.
//!
//! ```text
//! Polynomial ──▶ SolverAdapter::solve ──▶ SolveResult { ranked solutions } ──▶ trace()
//! ```

mod compiled;

pub mod adapter;
pub mod anneal;
pub mod config;
pub mod error;
pub mod exhaustive;

pub use adapter::{Credentials, DynSolver, SolveResult, Solution, SolverAdapter, TraceSample};
pub use anneal::{AnnealingSchedule, AnnealingSolver};
pub use config::{AutoSolver, SolverBackend, SolverConfig};
pub use error::SolverError;
pub use exhaustive::{ExhaustiveSolver, EXHAUSTIVE_LIMIT};
