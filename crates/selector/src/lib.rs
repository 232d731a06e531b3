//! DraftForge selection facade: weights, scaling, the two-stage solve, and
//! decoding the answer back onto candidates.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod orchestrator;
pub mod scales;
pub mod selection;
pub mod weights;

#[cfg(feature = "cli")]
pub use cli::*;
pub use config::*;
pub use decoder::*;
pub use error::*;
pub use orchestrator::*;
pub use scales::*;
pub use selection::*;
pub use weights::*;
