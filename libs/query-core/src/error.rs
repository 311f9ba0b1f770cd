use thiserror::Error;

/// Unified error for compiling and executing list/summary queries.
///
/// The first three variants are client-input errors: they are raised while the
/// request is being compiled, before any storage access. `Storage` wraps
/// whatever the storage handle returned; `Projection` means a fetched row did
/// not fit the requested shape. Both are server-side faults.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid value for '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("column not allowed: {0}")]
    ForbiddenColumn(String),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("row projection failed: {0}")]
    Projection(#[source] serde_json::Error),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    pub fn forbidden_column(name: impl Into<String>) -> Self {
        Self::ForbiddenColumn(name.into())
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }

    /// True when the caller can fix the request and retry.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Projection(_))
    }

    /// HTTP-equivalent status for transports that want one.
    pub fn status(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "QUERY_VALIDATION",
            Self::UnknownColumn(_) => "QUERY_UNKNOWN_COLUMN",
            Self::ForbiddenColumn(_) => "QUERY_FORBIDDEN_COLUMN",
            Self::Storage(_) => "QUERY_STORAGE",
            Self::Projection(_) => "QUERY_PROJECTION",
        }
    }
}
