//! Error types for the authentication layer

use common::error::DatabaseError;
use thiserror::Error;

/// Failure modes of `UserStore::create`
#[derive(Error, Debug)]
pub enum CreateUserError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Errors surfaced by the session authenticator
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing or malformed signup/login input
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Email already registered")]
    DuplicateEmail,

    /// Same error for an unknown identifier and a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthenticated,

    /// Unusable authentication settings detected at startup
    #[error("Invalid authentication configuration: {0}")]
    Configuration(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Session store error: {0}")]
    SessionStore(#[source] anyhow::Error),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl From<CreateUserError> for AuthError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::DuplicateUsername => AuthError::DuplicateUsername,
            CreateUserError::DuplicateEmail => AuthError::DuplicateEmail,
            CreateUserError::Database(e) => AuthError::Store(e),
        }
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
