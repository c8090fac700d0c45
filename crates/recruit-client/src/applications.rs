//! Job applications, from both sides of the table
//!
//! Candidates apply and withdraw; recruiters move an application along
//! (viewed, shortlisted, interview, accepted or rejected). Which transitions
//! are legal is decided by the backend.

use serde::Serialize;
use serde_json::json;

use crate::client::{HttpClient, RequestOptions, path_segment};
use crate::error::Result;
use crate::models::{Ack, Application, ApplicationStatus, Listing, wire_name};

#[derive(Debug, Clone, Default)]
pub struct ApplicationQuery {
    pub status: Option<ApplicationStatus>,
    pub job_offer: Option<String>,
    pub page: Option<u32>,
}

impl ApplicationQuery {
    fn options(&self) -> RequestOptions {
        RequestOptions::new()
            .query_opt("status", self.status.as_ref().and_then(wire_name))
            .query_opt("job_offer", self.job_offer.as_deref())
            .query_opt("page", self.page)
    }
}

#[derive(Serialize)]
struct NewApplication<'a> {
    job_offer: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover_letter: Option<&'a str>,
}

impl HttpClient {
    /// Applications visible to the caller: their own as a candidate, those
    /// to their offers as a recruiter.
    pub async fn applications(&self, query: &ApplicationQuery) -> Result<Listing<Application>> {
        self.get_with("/applications/", query.options()).await
    }

    pub async fn my_applications(&self) -> Result<Listing<Application>> {
        self.get("/applications/my_applications/").await
    }

    pub async fn application(&self, id: &str) -> Result<Application> {
        self.get(&format!("/applications/{}/", path_segment(id)?))
            .await
    }

    pub async fn apply(&self, job_id: &str, cover_letter: Option<&str>) -> Result<Application> {
        let body = NewApplication {
            job_offer: path_segment(job_id)?,
            cover_letter,
        };
        self.post("/applications/", &body).await
    }

    pub async fn withdraw_application(&self, id: &str) -> Result<Ack> {
        self.application_action(id, "withdraw").await
    }

    pub async fn mark_application_viewed(&self, id: &str) -> Result<Ack> {
        self.application_action(id, "mark_viewed").await
    }

    pub async fn shortlist_application(&self, id: &str) -> Result<Ack> {
        self.application_action(id, "shortlist").await
    }

    pub async fn accept_application(&self, id: &str) -> Result<Ack> {
        self.application_action(id, "accept").await
    }

    pub async fn reject_application(&self, id: &str) -> Result<Ack> {
        self.application_action(id, "reject").await
    }

    /// `interview_date` is passed through as given (ISO-8601 expected).
    pub async fn schedule_interview(&self, id: &str, interview_date: &str) -> Result<Ack> {
        self.post(
            &format!("/applications/{}/schedule_interview/", path_segment(id)?),
            &json!({ "interview_date": interview_date }),
        )
        .await
    }

    pub async fn annotate_application(&self, id: &str, notes: &str) -> Result<Application> {
        self.patch(
            &format!("/applications/{}/", path_segment(id)?),
            &json!({ "recruiter_notes": notes }),
        )
        .await
    }

    async fn application_action(&self, id: &str, action: &str) -> Result<Ack> {
        self.post_empty(&format!("/applications/{}/{action}/", path_segment(id)?))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::harness;
    use axum::http::StatusCode;
    use serde_json::Value;

    fn application_json(status: &str) -> Value {
        json!({"id": "a1", "job_offer": "j1", "status": status})
    }

    #[tokio::test]
    async fn apply_sends_job_and_letter() {
        let h = harness(|_| (StatusCode::CREATED, application_json("SUBMITTED"))).await;
        h.tokens.set_pair("at", "rt");

        let app = h.client.apply("j1", Some("Hello")).await.unwrap();

        assert_eq!(app.status, ApplicationStatus::Submitted);
        assert_eq!(
            h.backend.calls()[0].body,
            json!({"job_offer": "j1", "cover_letter": "Hello"})
        );
    }

    #[tokio::test]
    async fn recruiter_actions_hit_action_routes() {
        let h = harness(|_| (StatusCode::OK, json!({"message": "done"}))).await;
        h.tokens.set_pair("at", "rt");

        h.client.mark_application_viewed("a1").await.unwrap();
        h.client.shortlist_application("a1").await.unwrap();
        h.client
            .schedule_interview("a1", "2026-11-02T10:00:00Z")
            .await
            .unwrap();
        h.client.accept_application("a1").await.unwrap();
        h.client.reject_application("a2").await.unwrap();
        h.client.withdraw_application("a3").await.unwrap();

        assert_eq!(
            h.backend.routes(),
            vec![
                "POST /applications/a1/mark_viewed/",
                "POST /applications/a1/shortlist/",
                "POST /applications/a1/schedule_interview/",
                "POST /applications/a1/accept/",
                "POST /applications/a2/reject/",
                "POST /applications/a3/withdraw/",
            ]
        );
        assert_eq!(
            h.backend.calls()[2].body["interview_date"],
            "2026-11-02T10:00:00Z"
        );
    }

    #[tokio::test]
    async fn listing_filters_by_status() {
        let h = harness(|_| (StatusCode::OK, json!([application_json("SHORTLISTED")]))).await;
        h.tokens.set_pair("at", "rt");

        let listing = h
            .client
            .applications(&ApplicationQuery {
                status: Some(ApplicationStatus::Shortlisted),
                ..ApplicationQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(listing.items()[0].status.label(), "Shortlisted");
        assert_eq!(h.backend.calls()[0].query.as_deref(), Some("status=SHORTLISTED"));
    }

    #[tokio::test]
    async fn notes_are_patched() {
        let h = harness(|_| (StatusCode::OK, application_json("VIEWED"))).await;
        h.tokens.set_pair("at", "rt");

        h.client
            .annotate_application("a1", "strong profile")
            .await
            .unwrap();

        let call = &h.backend.calls()[0];
        assert_eq!(call.method, "PATCH");
        assert_eq!(call.body["recruiter_notes"], "strong profile");
    }
}
