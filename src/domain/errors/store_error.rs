//! Local store error types.

use thiserror::Error;

/// Errors raised by a local store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage location unavailable: {0}")]
    Unavailable(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
