use thiserror::Error;

/// Domain-level errors shared across application components.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The incoming payload could not be decoded into the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// Input exceeded guard rails such as maximum payload size.
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Requested article does not exist in the store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store already holds a record with the same identifier.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage engine is closed or unreachable.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Catch-all for storage-related failures we don't want to leak directly.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn limit(msg: impl Into<String>) -> Self {
        Self::LimitExceeded(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for failures caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::LimitExceeded(_))
    }
}
