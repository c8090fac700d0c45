//! Backend contract constants
//!
//! Paths are relative to the configured API base URL. The storage keys are
//! the names the two credentials are persisted under.

use std::time::Duration;

/// Base URL used when neither config nor `RECRUIT_API_URL` provides one
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Per-request transport timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const LOGIN_ENDPOINT: &str = "/auth/login/";
pub const REGISTER_ENDPOINT: &str = "/auth/register/";
pub const REFRESH_ENDPOINT: &str = "/auth/token/refresh/";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout/";

/// "Who am I" endpoint used to establish or rehydrate the session identity
pub const CURRENT_USER_ENDPOINT: &str = "/users/me/";

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
