//! In-app notifications

use serde::Deserialize;

use crate::client::{HttpClient, RequestOptions, path_segment};
use crate::error::Result;
use crate::models::{Ack, Listing, Notification};

/// Body of `/notifications/unread/`. Older backends answer `count`.
#[derive(Debug, Deserialize)]
struct UnreadCount {
    #[serde(default, alias = "count")]
    unread_count: u64,
}

impl HttpClient {
    pub async fn notifications(&self, unread_only: bool) -> Result<Listing<Notification>> {
        let options = RequestOptions::new().query_opt("read", unread_only.then_some(false));
        self.get_with("/notifications/", options).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<Ack> {
        self.post_empty(&format!("/notifications/{}/mark_read/", path_segment(id)?))
            .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<Ack> {
        self.post_empty("/notifications/mark_all_read/").await
    }

    /// Unread count; a body without a count reads as zero.
    pub async fn unread_notification_count(&self) -> Result<u64> {
        let body: Option<UnreadCount> = self.get("/notifications/unread/").await?;
        Ok(body.map(|b| b.unread_count).unwrap_or(0))
    }
}
