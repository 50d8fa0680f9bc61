//! Store error types.

/// Key-value store error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Value failed to (de)serialize to JSON.
    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),

    /// Backend error (network, disk, etc.).
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error from any error type.
    #[inline]
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}
