//! The request pipeline every backend call goes through
//!
//! A logical call is at most two exchanges: the first attempt and, after a
//! 401 and a successful refresh, one retry. The retry is never refreshed
//! again, so a backend that keeps answering 401 cannot loop the client.
//!
//! Refreshes are single-flight. A call that hits 401 takes `refresh_guard`;
//! once inside it checks whether the access token it sent has already been
//! replaced by a concurrent caller and, if so, retries with the current one
//! instead of spending the refresh token again.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use recruit_auth::constants::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use recruit_auth::token::endpoint_url;
use recruit_auth::{TokenStore, refresh_access_token};
use recruit_session::{AuthSession, Navigator, Route};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::metrics;

/// A header sent with every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInjection {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,
    pub timeout: Duration,
    pub default_headers: Vec<HeaderInjection>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: Vec::new(),
        }
    }
}

/// Per-call query parameters and extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    query: Vec<(String, String)>,
    headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add `key` only when `value` is set.
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Add a header. Invalid headers and attempts to set `Authorization` are
    /// dropped with a warning; the bearer token is owned by the pipeline.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let Some((name, value)) = parse_header(name, value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let header = match HeaderName::from_str(name) {
        Ok(n) => n,
        Err(e) => {
            warn!(header = %name, error = %e, "skipping invalid header name");
            return None;
        }
    };
    if header == AUTHORIZATION {
        warn!("refusing to override Authorization header");
        return None;
    }
    match HeaderValue::from_str(value) {
        Ok(v) => Some((header, v)),
        Err(e) => {
            warn!(header = %name, error = %e, "skipping invalid header value");
            None
        }
    }
}

/// Which exchange of a logical call is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    First,
    /// Sent once after a refresh; a 401 here is final
    Retried,
}

struct Reply {
    status: u16,
    body: Vec<u8>,
}

pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenStore>,
    session: Arc<AuthSession>,
    navigator: Arc<dyn Navigator>,
    refresh_guard: tokio::sync::Mutex<()>,
    /// Bumped every time the session is torn down
    expirations: AtomicU64,
}

impl HttpClient {
    pub fn new(
        config: &ClientConfig,
        tokens: Arc<TokenStore>,
        session: Arc<AuthSession>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for injection in &config.default_headers {
            if let Some((name, value)) = parse_header(&injection.name, &injection.value) {
                headers.insert(name, value);
            }
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(Error::from_transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            session,
            navigator,
            refresh_guard: tokio::sync::Mutex::new(()),
            expirations: AtomicU64::new(0),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, None, RequestOptions::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        self.request(Method::GET, path, None, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = to_body(body)?;
        self.request(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// POST with no request body, for action endpoints like `publish/`.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::POST, path, None, RequestOptions::default())
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = to_body(body)?;
        self.request(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = to_body(body)?;
        self.request(Method::PATCH, path, Some(body), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, None, RequestOptions::default())
            .await
    }

    /// Send one logical call through the auth pipeline and decode the body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> Result<T> {
        let bytes = self.execute(method, path, body.as_ref(), &options).await?;
        decode(&bytes)
    }

    /// Send without a bearer token and without 401 handling.
    ///
    /// Used by the credential endpoints (login, register), where a 401 means
    /// the credentials were wrong, not that a token went stale.
    pub(crate) async fn send_public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let reply = self
            .dispatch(
                &method,
                path,
                body.as_ref(),
                &RequestOptions::default(),
                None,
                Attempt::First,
            )
            .await?;
        decode(&finish(reply)?)
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<Vec<u8>> {
        let epoch = self.expirations.load(Ordering::Acquire);
        let sent_with = self.tokens.access();

        let reply = self
            .dispatch(&method, path, body, options, sent_with.as_deref(), Attempt::First)
            .await?;
        if reply.status != 401 {
            return finish(reply);
        }

        debug!("401 on first attempt");
        let token = self.recover(sent_with.as_deref(), epoch).await?;

        let retry = self
            .dispatch(&method, path, body, options, Some(&token), Attempt::Retried)
            .await?;
        if retry.status == 401 {
            warn!("401 after refresh, giving up");
        }
        finish(retry)
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        token: Option<&str>,
        attempt: Attempt,
    ) -> Result<Reply> {
        let url = endpoint_url(&self.base_url, path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(options.headers.clone());
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                let err = Error::from_transport(e);
                let kind = if matches!(err, Error::Timeout(_)) {
                    "timeout"
                } else {
                    "connect"
                };
                metrics::record_transport_error(method.as_str(), kind);
                warn!(error = %err, ?attempt, "request failed");
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            let err = Error::from_transport(e);
            metrics::record_transport_error(method.as_str(), "body");
            err
        })?;
        metrics::record_request(method.as_str(), status, started.elapsed());
        debug!(status, ?attempt, bytes = body.len(), "response received");

        Ok(Reply {
            status,
            body: body.to_vec(),
        })
    }

    /// Obtain a usable access token after a 401, or end the session.
    async fn recover(&self, stale: Option<&str>, epoch: u64) -> Result<String> {
        let _guard = self.refresh_guard.lock().await;

        if let Some(current) = self.tokens.access()
            && stale != Some(current.as_str())
        {
            debug!("access token already replaced by a concurrent call");
            metrics::record_refresh("shared");
            return Ok(current);
        }

        if self.expirations.load(Ordering::Acquire) != epoch {
            debug!("session ended by a concurrent call");
            return Err(Error::SessionExpired);
        }

        let Some(refresh) = self.tokens.refresh() else {
            warn!("no refresh token stored, ending session");
            metrics::record_refresh("missing");
            self.expire();
            return Err(recruit_auth::Error::MissingRefreshToken.into());
        };

        match refresh_access_token(&self.http, &self.base_url, &refresh).await {
            Ok(fresh) => {
                let rotated = fresh.refresh.is_some();
                self.tokens.set_access(fresh.access.clone());
                if let Some(next) = fresh.refresh {
                    self.tokens.set_refresh(next);
                }
                metrics::record_refresh("success");
                info!(rotated, "access token refreshed");
                Ok(fresh.access)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, ending session");
                metrics::record_refresh("failure");
                self.expire();
                Err(Error::RefreshFailed(e))
            }
        }
    }

    /// Drop both tokens and the identity, then send the user to login.
    fn expire(&self) {
        self.tokens.clear();
        self.session.clear_identity();
        self.expirations.fetch_add(1, Ordering::AcqRel);
        self.navigator.navigate(&Route::login());
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn finish(reply: Reply) -> Result<Vec<u8>> {
    if (200..300).contains(&reply.status) {
        Ok(reply.body)
    } else {
        Err(Error::from_status(reply.status, &reply.body))
    }
}

/// Decode a 2xx body. An empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let bytes = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}

/// Validate an identifier before it is spliced into a path.
pub(crate) fn path_segment(id: &str) -> Result<&str> {
    if id.is_empty() || id.contains(['/', '?', '#']) {
        return Err(Error::InvalidRequest(format!("invalid identifier: {id:?}")));
    }
    Ok(id)
}
