//! Authenticated user identity as served by `/users/me/`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::Route;

/// Account role. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Candidate,
    Recruiter,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "CANDIDATE",
            Role::Recruiter => "RECRUITER",
            Role::Admin => "ADMIN",
        }
    }

    /// Landing page after login for this role.
    pub fn dashboard(&self) -> Route {
        Route::Dashboard(*self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0} (expected candidate, recruiter or admin)")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "candidate" => Ok(Role::Candidate),
            "recruiter" => Ok(Role::Recruiter),
            "admin" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserStatus {
    Pending,
    #[default]
    Active,
    Suspended,
    Deleted,
}

fn default_true() -> bool {
    true
}

/// The signed-in user.
///
/// Timestamps are kept as the backend's ISO-8601 strings; nothing in the
/// client does date arithmetic on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
}

impl Identity {
    /// Name to show in the UI, falling back to the email address.
    pub fn display_name(&self) -> String {
        if !self.full_name.trim().is_empty() {
            return self.full_name.clone();
        }
        let joined = format!("{} {}", self.first_name, self.last_name);
        let joined = joined.trim();
        if joined.is_empty() {
            self.email.clone()
        } else {
            joined.to_string()
        }
    }

    /// Active account that has not been suspended or deleted.
    pub fn is_active_account(&self) -> bool {
        self.is_active && self.status == UserStatus::Active
    }
}

#[cfg(test)]
pub(crate) fn sample(role: Role) -> Identity {
    Identity {
        id: Uuid::nil(),
        email: "ada@example.com".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        full_name: "Ada Lovelace".into(),
        phone: None,
        role,
        status: UserStatus::Active,
        email_verified: true,
        is_active: true,
        created_at: None,
        last_login_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_user() {
        let json = r#"{
            "id": "7d0f4b8e-3c1a-4f7e-9b2d-1a2b3c4d5e6f",
            "email": "recruiter@acme.test",
            "first_name": "Grace",
            "last_name": "Hopper",
            "full_name": "Grace Hopper",
            "phone": "+33600000000",
            "role": "RECRUITER",
            "status": "ACTIVE",
            "email_verified": false,
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-02T10:00:00Z",
            "is_active": true
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.role, Role::Recruiter);
        assert_eq!(identity.status, UserStatus::Active);
        assert_eq!(identity.phone.as_deref(), Some("+33600000000"));
        assert!(identity.is_active_account());
    }

    #[test]
    fn minimal_user_gets_defaults() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000000","email":"a@b.c","role":"ADMIN"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.status, UserStatus::Active);
        assert!(identity.is_active);
        assert_eq!(identity.display_name(), "a@b.c");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let json = r#"{"id":"00000000-0000-0000-0000-000000000000","email":"a@b.c","role":"OWNER"}"#;
        assert!(serde_json::from_str::<Identity>(json).is_err());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("candidate".parse::<Role>().unwrap(), Role::Candidate);
        assert_eq!("RECRUITER".parse::<Role>().unwrap(), Role::Recruiter);
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("owner"));
    }

    #[test]
    fn suspended_account_is_not_active() {
        let mut identity = sample(Role::Candidate);
        identity.status = UserStatus::Suspended;
        assert!(!identity.is_active_account());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut identity = sample(Role::Candidate);
        assert_eq!(identity.display_name(), "Ada Lovelace");
        identity.full_name.clear();
        identity.first_name = "Ada".into();
        identity.last_name.clear();
        assert_eq!(identity.display_name(), "Ada");
    }
}
