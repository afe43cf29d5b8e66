//! Authentication logic: password hashing and bearer-token management.

pub mod jwt;
pub mod password;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token error: {0}")]
    TokenError(String),

    #[error("internal error: {0}")]
    Internal(String),
}
