use thiserror::Error;

/// Errors that can occur when talking to a session store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("session serialization error: {0}")]
    Serialization(String),
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, SessionError>;
