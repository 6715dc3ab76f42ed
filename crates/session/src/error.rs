//! The uniform result envelope for credential operations

use thiserror::Error;

/// Human-readable failure returned by every credential operation.
///
/// Operations never panic and never leak transport-layer error types;
/// whatever went wrong arrives here as one normalized display string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OpError(pub String);

impl OpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result alias for credential operations.
pub type OpResult<T> = Result<T, OpError>;
