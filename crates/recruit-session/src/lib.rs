//! Session identity and role-gated navigation
//!
//! `AuthSession` is the single source of truth for who is signed in.
//! `RoleGate` compares a route's declared `Access` against that identity
//! when a page mounts and redirects through a `Navigator` when the visitor
//! may not see it. None of these are process-wide singletons: callers build
//! them and pass them to whatever needs them.

pub mod gate;
pub mod identity;
pub mod navigator;
pub mod routes;
pub mod session;

pub use gate::{GateDecision, MismatchPolicy, RoleGate};
pub use identity::{Identity, Role, UnknownRole, UserStatus};
pub use navigator::{NavigationLog, Navigator};
pub use routes::{Access, Route};
pub use session::AuthSession;
