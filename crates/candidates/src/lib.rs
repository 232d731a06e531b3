//! Candidate fragments for DraftForge.
//!
//! A candidate is a short generated text fragment with a relevance score and
//! per-axis stylistic attributes. This crate owns the entity, its tolerant
//! keyed form, the target-parameter vectors candidates are scored against,
//! and intake of generated replies.

pub mod axes;
pub mod candidate;
pub mod error;
pub mod intake;
pub mod pool;

pub use axes::{TargetParams, TargetVector, CHARACTER_AXES, NEUTRAL, SCENE_AXES};
pub use candidate::{Candidate, CandidateKind};
pub use error::{IntakeError, PoolError};
pub use intake::parse_generated;
pub use pool::CandidatePool;
