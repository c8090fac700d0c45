//! Error types for credential operations

/// Errors from the token refresh exchange.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("refresh token rejected: {0}")]
    InvalidCredentials(String),

    #[error("no refresh token stored")]
    MissingRefreshToken,
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
