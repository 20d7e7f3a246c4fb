//! Unified error handling for userdb

use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Connection error: {0}")]
    Connection(sqlx::Error),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse error category, for callers that only branch on the kind of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Constraint,
    Connection,
    Database,
    Validation,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Constraint(_) => ErrorKind::Constraint,
            AppError::Connection(_) => ErrorKind::Connection,
            AppError::Database(_) => ErrorKind::Database,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Process exit code used by the CLI
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::NotFound => 2,
            ErrorKind::Validation | ErrorKind::Constraint => 3,
            ErrorKind::Connection => 4,
            ErrorKind::Database => 5,
            ErrorKind::Internal => 1,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation
                | sqlx::error::ErrorKind::ForeignKeyViolation
                | sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => {
                    AppError::Constraint(db.message().to_string())
                }
                _ => AppError::Database(err),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::Configuration(_) => AppError::Connection(err),
            _ => AppError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
