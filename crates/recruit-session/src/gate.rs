//! Per-page authorization check run when a page mounts
//!
//! Decision table for a gated route:
//!
//! | visitor                  | outcome                                   |
//! |--------------------------|-------------------------------------------|
//! | anonymous                | login, with `?redirect=<path>` if enabled |
//! | signed in, wrong role    | per `MismatchPolicy`                      |
//! | signed in, allowed       | render                                    |
//!
//! The check runs once per mount. A logout elsewhere is picked up the next
//! time a page mounts, not live.

use serde::Deserialize;
use tracing::{debug, info};

use crate::identity::Identity;
use crate::navigator::Navigator;
use crate::routes::{Access, Route};
use crate::session::AuthSession;

/// Where a signed-in visitor with the wrong role is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum MismatchPolicy {
    /// Back to the login page
    #[default]
    #[serde(rename = "login")]
    Login,
    /// To the dashboard of the visitor's own role
    #[serde(rename = "dashboard")]
    OwnDashboard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Page may render. Carries the identity when someone is signed in.
    Render(Option<Identity>),
    Redirect(Route),
}

#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    on_mismatch: MismatchPolicy,
    carry_return_path: bool,
}

impl Default for RoleGate {
    fn default() -> Self {
        Self {
            on_mismatch: MismatchPolicy::Login,
            carry_return_path: true,
        }
    }
}

impl RoleGate {
    pub fn new(on_mismatch: MismatchPolicy, carry_return_path: bool) -> Self {
        Self {
            on_mismatch,
            carry_return_path,
        }
    }

    pub fn on_mismatch(&self) -> MismatchPolicy {
        self.on_mismatch
    }

    /// Decide whether `route` may render for the current session.
    pub fn check(&self, session: &AuthSession, route: &Route) -> GateDecision {
        let identity = session.identity();
        let required = route.access();

        if required == Access::Public {
            return GateDecision::Render(identity);
        }

        let Some(identity) = identity else {
            let return_to = self.carry_return_path.then(|| route.path());
            debug!(path = %route, "anonymous visit to gated page");
            return GateDecision::Redirect(Route::Login { return_to });
        };

        match required {
            Access::Role(role) if identity.role != role => {
                debug!(
                    path = %route,
                    required = %role,
                    actual = %identity.role,
                    "role mismatch"
                );
                let target = match self.on_mismatch {
                    MismatchPolicy::Login => Route::login(),
                    MismatchPolicy::OwnDashboard => identity.role.dashboard(),
                };
                GateDecision::Redirect(target)
            }
            _ => GateDecision::Render(Some(identity)),
        }
    }

    /// Mount `route`: check, and perform the redirect through `navigator`
    /// when the visitor may not see the page.
    pub fn mount(
        &self,
        session: &AuthSession,
        route: &Route,
        navigator: &dyn Navigator,
    ) -> GateDecision {
        let decision = self.check(session, route);
        if let GateDecision::Redirect(target) = &decision {
            info!(from = %route, to = %target, "page gate redirect");
            navigator.navigate(target);
        }
        decision
    }

    /// Mount `route` and run `page` only when it may render.
    ///
    /// Returns `None` when the visitor was redirected; `page` has not run.
    pub fn enter<T>(
        &self,
        session: &AuthSession,
        route: &Route,
        navigator: &dyn Navigator,
        page: impl FnOnce(Option<&Identity>) -> T,
    ) -> Option<T> {
        match self.mount(session, route, navigator) {
            GateDecision::Render(identity) => Some(page(identity.as_ref())),
            GateDecision::Redirect(_) => None,
        }
    }
}
