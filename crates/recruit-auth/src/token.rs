//! Token wire types and the bare refresh exchange
//!
//! `refresh_access_token` talks to the backend directly through the raw
//! `reqwest::Client`. It never goes through the API client's 401 handling,
//! so a rejected refresh cannot trigger another refresh.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::REFRESH_ENDPOINT;
use crate::error::{Error, Result};

/// Access/refresh pair as returned by login and registration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Response from the refresh endpoint.
///
/// `refresh` is only present when the backend rotates refresh tokens.
#[derive(Deserialize, Serialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
}

impl fmt::Debug for RefreshResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshResponse")
            .field("access", &"[REDACTED]")
            .field("rotated", &self.refresh.is_some())
            .finish()
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Join a backend-relative path onto the API base URL.
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Exchange a refresh token for a new access token.
///
/// 401/403 from the endpoint means the refresh token is expired, revoked or
/// blacklisted and maps to `InvalidCredentials`.
pub async fn refresh_access_token(
    client: &reqwest::Client,
    base_url: &str,
    refresh: &str,
) -> Result<RefreshResponse> {
    let url = endpoint_url(base_url, REFRESH_ENDPOINT);
    debug!(url = %url, "exchanging refresh token");

    let response = client
        .post(&url)
        .json(&RefreshRequest { refresh })
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(Error::InvalidCredentials(format!(
                "refresh endpoint returned {status}: {body}"
            )));
        }

        return Err(Error::TokenRefresh(format!(
            "refresh endpoint returned {status}: {body}"
        )));
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| Error::TokenRefresh(format!("invalid refresh response: {e}")))
}
