//! Error types for candidate intake and pool persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("generated reply contains no JSON list; reply starts with: {preview}...")]
    MissingList { preview: String },

    #[error("failed to parse generated list ({source}); reply starts with: {preview}...")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("pool file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("pool file is not a candidate list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no ids left to number {incoming} new candidates after id {max_id}")]
    IdSpaceExhausted { max_id: i64, incoming: usize },
}
