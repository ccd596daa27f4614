//! Authentication error type.

use lightning_stores_core::EmailError;

use crate::db::RepositoryError;

/// Errors from signup, login, and token handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Wrong email or password. Deliberately one variant for both so the
    /// response can't be used to probe which emails are registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    UserAlreadyExists,

    #[error("weak password: {0}")]
    WeakPassword(String),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed (argon2 errors don't implement `std::error::Error`).
    #[error("password hashing error: {0}")]
    Hashing(String),

    /// The bearer token is missing, malformed, expired, or mis-signed.
    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
