use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsuariosError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Column not allowed: {column}")]
    ForbiddenColumn { column: String },

    #[error("Internal error")]
    Internal,
}

impl UsuariosError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
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

    pub fn internal() -> Self {
        Self::Internal
    }
}
