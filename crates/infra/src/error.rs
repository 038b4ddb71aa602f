//! Service-level errors.

use serde::Serialize;
use thiserror::Error;

use eventstock_core::{DomainError, ValidationErrors};

use crate::store::StoreError;

/// A kind of record that blocks a delete, and how many of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Blocker {
    pub kind: &'static str,
    pub count: usize,
}

/// Why an operation conflicts with existing state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictInfo {
    pub entity: &'static str,
    pub message: String,
    pub blockers: Vec<Blocker>,
}

impl ConflictInfo {
    pub fn new(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
            blockers: Vec::new(),
        }
    }

    /// Delete refused while other records still reference `entity`.
    /// Returns `None` when nothing blocks.
    pub fn protected(entity: &'static str, blockers: Vec<Blocker>) -> Option<Self> {
        let blockers: Vec<Blocker> = blockers.into_iter().filter(|b| b.count > 0).collect();
        if blockers.is_empty() {
            return None;
        }
        let list = blockers
            .iter()
            .map(|b| format!("{} {}", b.count, b.kind))
            .collect::<Vec<_>>()
            .join(", ");
        Some(Self {
            entity,
            message: format!("Cannot delete this {entity}: it is still referenced by {list}."),
            blockers,
        })
    }
}

impl core::fmt::Display for ConflictInfo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected; every problem is listed.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("conflict: {0}")]
    Conflict(ConflictInfo),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Storage or other infrastructure failure.
    #[error("system error: {0}")]
    System(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.field(name, message);
        Self::Validation(errors)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::System(value.to_string())
    }
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Conflict(msg) => Self::Conflict(ConflictInfo::new("record", msg)),
            DomainError::NotFound(entity) => Self::not_found(entity, "unknown"),
            other => Self::Validation(other.into()),
        }
    }
}
