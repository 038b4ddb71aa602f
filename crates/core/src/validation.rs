//! Field-addressable validation errors.
//!
//! Booking forms are validated as a whole: every problem is collected so a
//! caller can re-render the form with one message per offending field or
//! line-item row, instead of stopping at the first failure.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Where a validation message belongs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorTarget {
    /// Applies to the submission as a whole.
    NonField,
    /// A named top-level field (e.g. `end_date`).
    Field { name: String },
    /// A line-item row, optionally narrowed to one of its fields.
    Line { index: usize, field: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub target: ErrorTarget,
    pub message: String,
}

/// Ordered collection of [`FieldError`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: ErrorTarget, message: impl Into<String>) {
        self.errors.push(FieldError {
            target,
            message: message.into(),
        });
    }

    pub fn non_field(&mut self, message: impl Into<String>) {
        self.push(ErrorTarget::NonField, message);
    }

    pub fn field(&mut self, name: &str, message: impl Into<String>) {
        self.push(
            ErrorTarget::Field {
                name: name.to_string(),
            },
            message,
        );
    }

    pub fn line(&mut self, index: usize, field: Option<&str>, message: impl Into<String>) {
        self.push(
            ErrorTarget::Line {
                index,
                field: field.map(str::to_string),
            },
            message,
        );
    }

    /// Record a domain error against a named field.
    pub fn field_error(&mut self, name: &str, err: &DomainError) {
        self.field(name, err.message());
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Errors attached to a single line-item row.
    pub fn for_line(&self, index: usize) -> impl Iterator<Item = &FieldError> {
        self.errors
            .iter()
            .filter(move |e| matches!(e.target, ErrorTarget::Line { index: i, .. } if i == index))
    }

    /// `Ok(value)` when nothing was collected.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            match &e.target {
                ErrorTarget::NonField => write!(f, "{}", e.message)?,
                ErrorTarget::Field { name } => write!(f, "{name}: {}", e.message)?,
                ErrorTarget::Line { index, .. } => write!(f, "line {index}: {}", e.message)?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<DomainError> for ValidationErrors {
    fn from(value: DomainError) -> Self {
        let mut errors = Self::new();
        errors.non_field(value.message());
        errors
    }
}
