//! Job offers and saved jobs

use serde::Serialize;
use serde_json::{Value, json};

use crate::client::{HttpClient, RequestOptions, path_segment};
use crate::error::Result;
use crate::models::{
    Ack, ContractType, ExperienceLevel, JobOffer, JobStatus, Listing, SalaryPeriod, SavedJob,
    wire_name,
};

/// Filters for the public job listing.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub contract_type: Option<ContractType>,
    pub experience_level: Option<ExperienceLevel>,
    pub is_remote: Option<bool>,
    pub status: Option<JobStatus>,
    pub page: Option<u32>,
}

impl JobQuery {
    fn options(&self) -> RequestOptions {
        RequestOptions::new()
            .query_opt("search", self.search.as_deref())
            .query_opt("location", self.location.as_deref())
            .query_opt("contract_type", self.contract_type.as_ref().and_then(wire_name))
            .query_opt(
                "experience_level",
                self.experience_level.as_ref().and_then(wire_name),
            )
            .query_opt("is_remote", self.is_remote)
            .query_opt("status", self.status.as_ref().and_then(wire_name))
            .query_opt("page", self.page)
    }
}

/// Payload for creating a job offer. Created offers start as drafts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJobOffer {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_period: Option<SalaryPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_remote: bool,
    pub skills_required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
}

impl HttpClient {
    pub async fn jobs(&self, query: &JobQuery) -> Result<Listing<JobOffer>> {
        self.get_with("/jobs/", query.options()).await
    }

    pub async fn job(&self, id: &str) -> Result<JobOffer> {
        self.get(&format!("/jobs/{}/", path_segment(id)?)).await
    }

    /// Offers owned by the signed-in recruiter, drafts included.
    pub async fn my_jobs(&self) -> Result<Listing<JobOffer>> {
        self.get("/jobs/my_jobs/").await
    }

    pub async fn create_job(&self, job: &NewJobOffer) -> Result<JobOffer> {
        self.post("/jobs/", job).await
    }

    /// Partial update; only the fields present in `changes` are touched.
    pub async fn update_job(&self, id: &str, changes: &Value) -> Result<JobOffer> {
        self.patch(&format!("/jobs/{}/", path_segment(id)?), changes)
            .await
    }

    pub async fn publish_job(&self, id: &str) -> Result<Ack> {
        self.post_empty(&format!("/jobs/{}/publish/", path_segment(id)?))
            .await
    }

    pub async fn close_job(&self, id: &str) -> Result<Ack> {
        self.post_empty(&format!("/jobs/{}/close/", path_segment(id)?))
            .await
    }

    pub async fn saved_jobs(&self) -> Result<Listing<SavedJob>> {
        self.get("/saved-jobs/").await
    }

    pub async fn save_job(&self, job_id: &str) -> Result<SavedJob> {
        let job_id = path_segment(job_id)?;
        self.post("/saved-jobs/", &json!({ "job_offer": job_id }))
            .await
    }

    /// Remove a bookmark by its saved-job id, not the job id.
    pub async fn unsave_job(&self, saved_id: &str) -> Result<()> {
        self.delete(&format!("/saved-jobs/{}/", path_segment(saved_id)?))
            .await
    }
}
