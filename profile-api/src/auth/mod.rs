mod extractor;
mod jwt;

use thiserror::Error;

pub use extractor::AuthUser;
pub use jwt::{JwtKeys, Principal};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not authenticated")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    ExpiredToken,
    #[error("failed to issue token: {0}")]
    Encoding(String),
}
