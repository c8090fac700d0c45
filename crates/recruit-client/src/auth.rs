//! Session flows: login, registration, logout and rehydration
//!
//! Tokens and identity are always updated together here. A successful
//! login or registration stores the token pair and sets the identity
//! before returning; logout clears both whatever the backend answers.

use common::Secret;
use recruit_auth::constants::{
    CURRENT_USER_ENDPOINT, LOGIN_ENDPOINT, LOGOUT_ENDPOINT, REGISTER_ENDPOINT,
};
use recruit_auth::{TokenPair, password};
use recruit_session::{Identity, Route};
use reqwest::Method;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::HttpClient;
use crate::error::{Error, Result};

fn expose_secret<S: Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose())
}

/// Body of login and registration responses.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: Identity,
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Role-specific part of a registration.
///
/// Administrators are created by the backend, never by self-registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum RoleProfile {
    Candidate {
        #[serde(skip_serializing_if = "Option::is_none")]
        bio: Option<String>,
        skills: Vec<String>,
        experience_years: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        location: Option<String>,
    },
    Recruiter {
        company_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        company_description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        industry: Option<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: Secret<String>,
    #[serde(serialize_with = "expose_secret")]
    pub password_confirm: Secret<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

impl RegisterRequest {
    /// Local checks the backend would reject anyway.
    pub fn validate(&self) -> Result<()> {
        if !self.email.contains('@') {
            return Err(Error::InvalidRequest(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        let unmet = password::unmet_rules(self.password.expose());
        if !unmet.is_empty() {
            return Err(Error::InvalidRequest(format!(
                "password needs {}",
                unmet.join(", ")
            )));
        }
        if !self.password.matches(self.password_confirm.expose()) {
            return Err(Error::InvalidRequest("passwords do not match".into()));
        }
        if let RoleProfile::Recruiter { company_name, .. } = &self.profile
            && company_name.trim().is_empty()
        {
            return Err(Error::InvalidRequest("company name is required".into()));
        }
        Ok(())
    }
}

/// Split a comma-separated skill list as typed by a user.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl HttpClient {
    pub async fn login(&self, email: &str, password: &Secret<String>) -> Result<AuthResponse> {
        let body = serde_json::to_value(LoginRequest {
            email,
            password: password.expose(),
        })
        .map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let response: AuthResponse = self
            .send_public(Method::POST, LOGIN_ENDPOINT, Some(body))
            .await?;
        self.establish(&response)?;
        info!(role = %response.user.role, "signed in");
        Ok(response)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;
        let body =
            serde_json::to_value(request).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        let response: AuthResponse = self
            .send_public(Method::POST, REGISTER_ENDPOINT, Some(body))
            .await?;
        self.establish(&response)?;
        info!(role = %response.user.role, "registered");
        Ok(response)
    }

    /// Store tokens and identity from an auth response, then land on the
    /// user's dashboard.
    fn establish(&self, response: &AuthResponse) -> Result<()> {
        let Some(tokens) = &response.tokens else {
            return Err(Error::Decode("auth response carried no tokens".into()));
        };
        self.tokens()
            .set_pair(tokens.access.clone(), tokens.refresh.clone());
        self.session().set_identity(response.user.clone());
        self.navigator().navigate(&response.user.role.dashboard());
        Ok(())
    }

    /// End the session. Local state is cleared even when the backend call
    /// fails; the refresh token is only sent if one is stored.
    pub async fn logout(&self) {
        if let Some(refresh) = self.tokens().refresh() {
            let outcome = self
                .post::<serde_json::Value, _>(LOGOUT_ENDPOINT, &json!({ "refresh": refresh }))
                .await;
            match outcome {
                Ok(_) => debug!("backend acknowledged logout"),
                Err(e @ (Error::RefreshFailed(_) | Error::SessionExpired)) => {
                    // The pipeline already cleared state and navigated.
                    debug!(error = %e, "session was already gone at logout");
                    return;
                }
                Err(e) => warn!(error = %e, "logout call failed, clearing local session anyway"),
            }
        }
        self.tokens().clear();
        self.session().clear_identity();
        self.navigator().navigate(&Route::login());
        info!("signed out");
    }

    /// Fetch the signed-in user and make it the session identity.
    pub async fn current_user(&self) -> Result<Identity> {
        let user: Identity = self.get(CURRENT_USER_ENDPOINT).await?;
        self.session().set_identity(user.clone());
        Ok(user)
    }

    /// Rebuild the session identity from stored tokens.
    ///
    /// Returns `Ok(None)` when there is nothing to restore or the stored
    /// tokens no longer work; in the latter case the pipeline has already
    /// cleared them.
    pub async fn rehydrate(&self) -> Result<Option<Identity>> {
        if !self.tokens().has_tokens() {
            debug!("no stored tokens, starting anonymous");
            return Ok(None);
        }
        match self.current_user().await {
            Ok(user) => {
                info!(role = %user.role, "session restored from stored tokens");
                Ok(Some(user))
            }
            Err(e) if e.requires_login() => {
                info!(error = %e, "stored tokens no longer valid");
                self.tokens().clear();
                self.session().clear_identity();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
