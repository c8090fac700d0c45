//! Application routes and the access each one declares

use std::fmt;

use crate::identity::Role;

/// Who may mount a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No gate at all
    Public,
    /// Any signed-in role
    Authenticated,
    /// Signed in with exactly this role
    Role(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Login page, optionally carrying the path to return to afterwards
    Login { return_to: Option<String> },
    Register,
    Jobs,
    JobDetail(String),
    JobCreate,
    Applications,
    Notifications,
    Payments,
    CandidateProfile,
    RecruiterProfile,
    Dashboard(Role),
    AdminUsers,
    AdminJobs,
    AdminPayments,
}

impl Route {
    /// Plain login route with no return path.
    pub fn login() -> Self {
        Route::Login { return_to: None }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Home
            | Route::Login { .. }
            | Route::Register
            | Route::Jobs
            | Route::JobDetail(_) => Access::Public,
            Route::Applications | Route::Notifications => Access::Authenticated,
            Route::JobCreate | Route::Payments | Route::RecruiterProfile => {
                Access::Role(Role::Recruiter)
            }
            Route::CandidateProfile => Access::Role(Role::Candidate),
            Route::Dashboard(role) => Access::Role(*role),
            Route::AdminUsers | Route::AdminJobs | Route::AdminPayments => {
                Access::Role(Role::Admin)
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".into(),
            Route::Login { return_to: None } => "/auth/login".into(),
            Route::Login {
                return_to: Some(path),
            } => format!("/auth/login?redirect={path}"),
            Route::Register => "/auth/register".into(),
            Route::Jobs => "/jobs".into(),
            Route::JobDetail(id) => format!("/jobs/{id}"),
            Route::JobCreate => "/jobs/create".into(),
            Route::Applications => "/applications".into(),
            Route::Notifications => "/notifications".into(),
            Route::Payments => "/payments".into(),
            Route::CandidateProfile => "/profile/candidate".into(),
            Route::RecruiterProfile => "/profile/recruiter".into(),
            Route::Dashboard(Role::Candidate) => "/dashboard/candidate".into(),
            Route::Dashboard(Role::Recruiter) => "/dashboard/recruiter".into(),
            Route::Dashboard(Role::Admin) => "/dashboard/admin".into(),
            Route::AdminUsers => "/admin/users".into(),
            Route::AdminJobs => "/admin/jobs".into(),
            Route::AdminPayments => "/admin/payments".into(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_carries_return_path() {
        let route = Route::Login {
            return_to: Some("/jobs/42".into()),
        };
        assert_eq!(route.path(), "/auth/login?redirect=/jobs/42");
        assert_eq!(Route::login().path(), "/auth/login");
    }

    #[test]
    fn role_pages_declare_their_role() {
        assert_eq!(Route::JobCreate.access(), Access::Role(Role::Recruiter));
        assert_eq!(Route::AdminPayments.access(), Access::Role(Role::Admin));
        assert_eq!(Route::CandidateProfile.access(), Access::Role(Role::Candidate));
        assert_eq!(
            Route::Dashboard(Role::Candidate).access(),
            Access::Role(Role::Candidate)
        );
    }

    #[test]
    fn browsing_jobs_is_public() {
        assert_eq!(Route::Jobs.access(), Access::Public);
        assert_eq!(Route::JobDetail("7".into()).access(), Access::Public);
        assert_eq!(Route::login().access(), Access::Public);
    }

    #[test]
    fn display_matches_path() {
        assert_eq!(Route::Dashboard(Role::Admin).to_string(), "/dashboard/admin");
        assert_eq!(Role::Recruiter.dashboard().to_string(), "/dashboard/recruiter");
    }
}
