//! Authentication error types.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is well formed but past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// Bad signature, wrong issuer, or not a token at all.
    #[error("Token rejected: {0}")]
    TokenRejected(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Could not sign token: {0}")]
    JwtEncoding(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// The blocking hashing task panicked or was cancelled.
    #[error("Hashing task failed: {0}")]
    TaskJoin(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidToken => AuthError::InvalidToken,
            _ => AuthError::TokenRejected(e.to_string()),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
