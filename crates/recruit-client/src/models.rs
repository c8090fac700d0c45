//! Backend resources as the client reads them
//!
//! Display-only shapes: the client never enforces transitions between the
//! status values below, the backend does. Unknown fields are ignored and
//! most fields default so that a partial serializer output still decodes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Decimal fields arrive as JSON strings (`"1500.00"`) from the backend's
/// serializers, or as numbers from hand-written views. Accept both.
fn lenient_decimal<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Wire spelling of a unit variant, e.g. `ContractType::Cdi` is `"CDI"`.
pub(crate) fn wire_name<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value) {
        Ok(Value::String(name)) => Some(name),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContractType {
    Cdi,
    Cdd,
    Freelance,
    Internship,
    Apprenticeship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExperienceLevel {
    Junior,
    Intermediate,
    Senior,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Draft,
    Published,
    Closed,
    Archived,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SalaryPeriod {
    Hourly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterInfo {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: String,
    #[serde(default)]
    pub recruiter: Option<String>,
    #[serde(default)]
    pub recruiter_info: Option<RecruiterInfo>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub salary_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub salary_max: Option<f64>,
    #[serde(default)]
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub salary_period: Option<SalaryPeriod>,
    #[serde(default)]
    pub contract_type: Option<ContractType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub applications_count: u64,
    #[serde(default)]
    pub days_remaining: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl JobOffer {
    pub fn company(&self) -> Option<&str> {
        self.recruiter_info
            .as_ref()
            .map(|info| info.company_name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// `"1500 - 2500 EUR"`, `"from 1500 EUR"`, or `None` when unpublished.
    pub fn salary_range(&self) -> Option<String> {
        let currency = self.salary_currency.as_deref().unwrap_or("");
        let range = match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) => format!("{min} - {max}"),
            (Some(min), None) => format!("from {min}"),
            (None, Some(max)) => format!("up to {max}"),
            (None, None) => return None,
        };
        Some(format!("{range} {currency}").trim_end().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    Viewed,
    Shortlisted,
    InterviewScheduled,
    Rejected,
    Accepted,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "Submitted",
            ApplicationStatus::Viewed => "Viewed",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::InterviewScheduled => "Interview scheduled",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Accepted, rejected and withdrawn applications never change again.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Accepted | ApplicationStatus::Withdrawn
        )
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_completeness: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub candidate: Option<String>,
    #[serde(default)]
    pub candidate_info: Option<CandidateInfo>,
    #[serde(default)]
    pub job_offer: Option<String>,
    #[serde(default)]
    pub job_info: Option<JobInfo>,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub recruiter_notes: Option<String>,
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub applied_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    AccountCreated,
    ApplicationSubmitted,
    ApplicationStatusChanged,
    NewMessage,
    JobMatch,
    PasswordReset,
    PaymentReminder,
    InterviewScheduled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Email,
    Whatsapp,
    InApp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub channel: Option<NotificationChannel>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Manual,
    MobileMoney,
    Stripe,
    WhatsappBusiness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(default)]
    pub recruiter: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub amount: Option<f64>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub refund_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: String,
    #[serde(default)]
    pub job_offer: Option<String>,
    #[serde(default)]
    pub job_details: Option<JobOffer>,
    #[serde(default)]
    pub saved_at: Option<String>,
}

/// Page envelope of the backend's paginated list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A list endpoint's body: paginated envelope or bare array, depending on
/// the view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Page(Paginated<T>),
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Page(page) => &page.results,
            Listing::Items(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Page(page) => page.results,
            Listing::Items(items) => items,
        }
    }

    /// Total across all pages when the backend reports it.
    pub fn total(&self) -> u64 {
        match self {
            Listing::Page(page) => page.count,
            Listing::Items(items) => items.len() as u64,
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self, Listing::Page(Paginated { next: Some(_), .. }))
    }
}

/// `{"message": "..."}` acknowledgements from action endpoints.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Ack {
    #[serde(default, alias = "detail")]
    pub message: Option<String>,
}
