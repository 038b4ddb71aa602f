//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures raised by pure domain logic.
///
/// The messages of `Validation` and `Conflict` are user-facing and end up in
/// form errors verbatim. Services wrap these in their own error type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input the user can correct (bad date order, wrong booking kind, ...).
    #[error("{0}")]
    Validation(String),

    /// An id string did not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record does not exist; carries the record kind.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request contradicts current state, e.g. an illegal status move.
    #[error("{0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Text suitable for a form error.
    pub fn message(&self) -> String {
        match self {
            DomainError::Validation(m) | DomainError::Conflict(m) => m.clone(),
            other => other.to_string(),
        }
    }
}
