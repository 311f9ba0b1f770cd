use query_core::QueryError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("Column '{column}' is not allowed here")]
    ForbiddenColumn { column: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }

    pub fn forbidden_column(column: impl Into<String>) -> Self {
        Self::ForbiddenColumn {
            column: column.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<QueryError> for DomainError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Validation { field, message } => Self::validation(field, message),
            QueryError::UnknownColumn(column) => Self::unknown_column(column),
            QueryError::ForbiddenColumn(column) => Self::forbidden_column(column),
            QueryError::Storage(source) => Self::database(source.to_string()),
            QueryError::Projection(source) => Self::internal(source.to_string()),
        }
    }
}
