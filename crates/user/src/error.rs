use thiserror::Error;

/// Domain-specific errors for user operations
///
/// These errors represent failures the HTTP layer maps to a status code and
/// a message shown to the caller.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed")]
    HashingError(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<validator::ValidationErrors> for UserError {
    fn from(err: validator::ValidationErrors) -> Self {
        UserError::ValidationError(err.to_string())
    }
}

/// Result type for user operations that may fail with UserError
pub type UserResult<T> = Result<T, UserError>;
