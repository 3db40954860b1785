//! Domain error types for account management.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The external identity is already bound to an account.
    #[error(
        "external login user already exists [external_id: {external_id}, user_id: {user_id}, login_source_id: {login_source_id}]"
    )]
    AlreadyLinked {
        external_id: String,
        user_id: i64,
        login_source_id: i64,
    },

    /// No external identity binding matched.
    #[error(
        "external login user does not exist [user_id: {user_id}, login_source_id: {login_source_id}]"
    )]
    NotLinked { user_id: i64, login_source_id: i64 },

    /// Caller cancelled a long-running operation before it committed
    #[error("Cancelled: {0}")]
    Cancelled(String),
}

impl AppError {
    /// True for conflicts such as a duplicate external login link.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::AlreadyLinked { .. })
    }

    /// True when the referenced record (or link) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_) | AppError::NotLinked { .. })
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::Database(err.to_string())
    }
}
