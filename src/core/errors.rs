use thiserror::Error;

/// Error taxonomy surfaced by the core. The transport layer maps these to
/// user-facing messages; the core only reports structured kinds and fails on
/// the first problem it finds.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad input shape or range. Never retried automatically and never
    /// silently coerced: a non-positive amount is rejected, not zeroed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A referenced id does not exist.
    #[error("{0} not found")]
    NotFound(String),
    /// Semantically impossible mode/state combination.
    #[error("invalid mode: {0}")]
    InvalidMode(String),
    /// Concurrent mutation detected (stale revision on save).
    #[error("conflict: {0}")]
    Conflict(String),
    /// An atomic batch landed partially. A correct implementation never
    /// constructs this; its presence marks an invariant breach.
    #[error("partial write: {0}")]
    PartialWrite(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound(format!("{kind} `{id}`"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
