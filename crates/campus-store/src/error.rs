use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The key cannot be mapped to a storage slot.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}
