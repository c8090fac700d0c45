//! Credential handling for the Recruitsss API client
//!
//! Owns the two bearer credentials the backend issues (access + refresh),
//! the storage they live in between runs, and the one backend call that is
//! allowed to bypass the client's 401 interception: the token refresh.
//!
//! Credential lifecycle:
//! 1. Login/register responses carry a `TokenPair`, stored via `TokenStore::set_pair`
//! 2. Every outbound call reads `TokenStore::access()` for its bearer header
//! 3. On a first-attempt 401 the client calls `token::refresh_access_token()`
//! 4. The new access token replaces the old one via `TokenStore::set_access`
//! 5. Logout or an unrecoverable refresh failure calls `TokenStore::clear`

pub mod constants;
pub mod error;
pub mod password;
pub mod store;
pub mod token;

pub use constants::*;
pub use error::{Error, Result};
pub use store::TokenStore;
pub use token::{RefreshResponse, TokenPair, refresh_access_token};
