//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction and request validation.
///
/// The `Display` form of every variant is safe to show to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("{message}")]
    Rule { field: String, message: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates a validation error for a violated rule with a user-facing message.
    pub fn rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::Rule {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field } | ValidationError::Rule { field, .. } => field,
        }
    }
}
