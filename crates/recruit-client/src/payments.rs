//! Recruiter subscription payments

use crate::client::{HttpClient, RequestOptions};
use crate::error::Result;
use crate::models::{Listing, Payment, PaymentStatus, wire_name};

impl HttpClient {
    /// Payments made by the signed-in recruiter.
    pub async fn my_payments(&self) -> Result<Listing<Payment>> {
        self.get("/payments/my_payments/").await
    }

    /// All payments, for administrators.
    pub async fn payments(&self, status: Option<PaymentStatus>) -> Result<Listing<Payment>> {
        let options =
            RequestOptions::new().query_opt("status", status.as_ref().and_then(wire_name));
        self.get_with("/payments/", options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::harness;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn admin_listing_filters_by_status() {
        let h = harness(|_| {
            (
                StatusCode::OK,
                json!({"count": 1, "results": [{"id": "p1", "amount": "10.00", "currency": "EUR", "status": "PENDING"}]}),
            )
        })
        .await;
        h.tokens.set_pair("at", "rt");

        let listing = h.client.payments(Some(PaymentStatus::Pending)).await.unwrap();

        assert_eq!(listing.items()[0].amount, Some(10.0));
        assert_eq!(h.backend.calls()[0].query.as_deref(), Some("status=PENDING"));
    }

    #[tokio::test]
    async fn recruiter_sees_own_payments() {
        let h = harness(|_| (StatusCode::OK, json!([]))).await;
        h.tokens.set_pair("at", "rt");

        let listing = h.client.my_payments().await.unwrap();

        assert_eq!(listing.total(), 0);
        assert_eq!(h.backend.routes(), vec!["GET /payments/my_payments/"]);
    }
}
