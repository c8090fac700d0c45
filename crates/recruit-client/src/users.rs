//! Profile updates and the administrator's user listing

use recruit_session::{Identity, Role};
use serde::{Deserialize, Serialize};

use crate::client::{HttpClient, RequestOptions};
use crate::error::Result;
use crate::models::Listing;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// `update_profile` answers with the user, bare or wrapped with a message.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileResponse {
    Wrapped { user: Identity },
    Bare(Identity),
}

impl HttpClient {
    /// Update the signed-in user and refresh the session identity with the
    /// backend's answer.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity> {
        let response: ProfileResponse = self.put("/users/update_profile/", update).await?;
        let user = match response {
            ProfileResponse::Wrapped { user } | ProfileResponse::Bare(user) => user,
        };
        self.session().set_identity(user.clone());
        Ok(user)
    }

    pub async fn users(&self, role: Option<Role>, page: Option<u32>) -> Result<Listing<Identity>> {
        let options = RequestOptions::new()
            .query_opt("role", role.map(|r| r.as_str()))
            .query_opt("page", page);
        self.get_with("/users/", options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{harness, user_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn profile_update_refreshes_session_identity() {
        let h = harness(|r| {
            let mut user = user_json("CANDIDATE");
            user["first_name"] = r.body["first_name"].clone();
            (StatusCode::OK, json!({"user": user, "message": "Profile updated"}))
        })
        .await;
        h.tokens.set_pair("at", "rt");

        let user = h
            .client
            .update_profile(&ProfileUpdate {
                first_name: Some("Grace".into()),
                ..ProfileUpdate::default()
            })
            .await
            .unwrap();

        assert_eq!(user.first_name, "Grace");
        assert_eq!(h.session.identity().unwrap().first_name, "Grace");
        let call = &h.backend.calls()[0];
        assert_eq!(call.method, "PUT");
        assert_eq!(call.body, json!({"first_name": "Grace"}));
    }

    #[tokio::test]
    async fn bare_profile_response_is_accepted() {
        let h = harness(|_| (StatusCode::OK, user_json("RECRUITER"))).await;
        h.tokens.set_pair("at", "rt");

        let user = h
            .client
            .update_profile(&ProfileUpdate::default())
            .await
            .unwrap();
        assert_eq!(user.role, Role::Recruiter);
    }

    #[tokio::test]
    async fn admin_user_listing_filters_by_role() {
        let h = harness(|_| {
            (
                StatusCode::OK,
                json!({"count": 1, "results": [user_json("RECRUITER")]}),
            )
        })
        .await;
        h.tokens.set_pair("at", "rt");

        let users = h.client.users(Some(Role::Recruiter), Some(2)).await.unwrap();

        assert_eq!(users.items()[0].role, Role::Recruiter);
        assert_eq!(h.backend.calls()[0].query.as_deref(), Some("role=RECRUITER&page=2"));
    }
}
