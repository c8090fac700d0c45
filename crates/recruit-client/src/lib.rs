//! Authenticated REST client for the Recruitsss backend
//!
//! Every call goes through one pipeline (`HttpClient::request`): attach the
//! stored access token, send with a fixed timeout, and on a first-attempt
//! 401 refresh the access token once and retry once. If the refresh cannot
//! happen the stored tokens and the session identity are dropped and the
//! navigator is sent to the login page.
//!
//! Request lifecycle:
//! 1. `TokenStore::access()` → `Authorization: Bearer <token>`
//! 2. 2xx → decoded body returned to the caller
//! 3. 401 (first attempt) → single-flight refresh → retry once
//! 4. refresh impossible → tokens cleared, identity cleared, navigate to login
//! 5. anything else → error returned unchanged
//!
//! Endpoint groups (`jobs`, `applications`, `notifications`, `payments`,
//! `users`) and the auth flows are thin typed wrappers over the pipeline.

pub mod applications;
pub mod auth;
pub mod client;
pub mod error;
pub mod jobs;
pub mod metrics;
pub mod models;
pub mod notifications;
pub mod payments;
pub mod users;

#[cfg(test)]
mod mock;

pub use applications::ApplicationQuery;
pub use auth::{AuthResponse, RegisterRequest, RoleProfile, parse_skills};
pub use client::{Attempt, ClientConfig, HeaderInjection, HttpClient, RequestOptions};
pub use error::{Error, Result};
pub use jobs::{JobQuery, NewJobOffer};
pub use models::*;
pub use users::ProfileUpdate;
