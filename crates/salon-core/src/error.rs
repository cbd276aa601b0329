//! Domain errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Missing tenant context")]
    MissingTenant,

    #[error("Unknown child set {child} for {aggregate}")]
    UnknownChildSet { aggregate: &'static str, child: String },

    #[error("Column {column} of {table} must not be null")]
    NullConstraint { table: &'static str, column: &'static str },

    #[error("No valid fields to update")]
    NothingToUpdate,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Row decode error: {0}")]
    RowDecodeError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Errors the caller caused, as opposed to storage or programming failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::MissingTenant
                | DomainError::NothingToUpdate
                | DomainError::ValidationError(_)
                | DomainError::NullConstraint { .. }
        )
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(error: serde_json::Error) -> Self {
        DomainError::RowDecodeError(error.to_string())
    }
}
