//! Command-line specific errors
//!
//! Backend and session failures arrive as `recruit_client::Error` and are
//! wrapped with context by `anyhow`; these cover what the shell itself
//! refuses to do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The page gate redirected instead of rendering.
    #[error("{page} is not available to you; redirected to {redirect}")]
    AccessDenied { page: String, redirect: String },

    #[error("no password given; pass --password or set RECRUIT_PASSWORD")]
    MissingPassword,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result alias using service Error
pub type Result<T> = std::result::Result<T, Error>;
