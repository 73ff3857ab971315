use thiserror::Error;

/// Failure reported by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Any storage failure, carrying the backend's own message.
    #[error("{0}")]
    Backend(String),

    /// The caller's cancellation token fired before the call completed.
    #[error("operation cancelled")]
    Cancelled,
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Backend(err.to_string())
    }
}

/// Failure kinds surfaced by the book lifecycle service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("{0}")]
    InvalidArgument(&'static str),

    #[error("book {0} not found")]
    NotFound(String),

    /// Storage failure, passed through with its original message.
    #[error(transparent)]
    Persistence(RepositoryError),

    #[error("operation cancelled")]
    Cancelled,
}

impl From<RepositoryError> for BookError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Cancelled => BookError::Cancelled,
            other => BookError::Persistence(other),
        }
    }
}
