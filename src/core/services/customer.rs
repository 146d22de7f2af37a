use crate::core::api::{with_fallback, ApiClient};
use crate::domain::dto::{
    BookingRequest, CarSearch, IssueRequest, MaintenanceRequestPayload, QuoteRequest,
    ReviewRequest, StatusPatch,
};
use crate::utils::error::{Result, RoadReadyError};
use serde_json::Value;

/// Everything a signed-in customer (and, for maintenance, an agent) can call.
#[derive(Clone, Debug)]
pub struct CustomerService {
    api: ApiClient,
}

impl CustomerService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // Cars / brands

    pub async fn get_brands(&self) -> Result<Value> {
        with_fallback(self.api.get("CarBrands"), self.api.get("Brands")).await
    }

    pub async fn get_cars(&self) -> Result<Value> {
        self.api.get("Cars").await
    }

    pub async fn search_cars(&self, body: &CarSearch) -> Result<Value> {
        with_fallback(
            self.api.post("Cars/search", body),
            self.api.post("Cars/search-availability", body),
        )
        .await
    }

    pub async fn get_locations(&self) -> Result<Value> {
        self.api.get("Locations").await
    }

    // Bookings

    pub async fn get_my_bookings(&self) -> Result<Value> {
        with_fallback(self.api.get("Bookings/mine"), self.api.get("Bookings/my")).await
    }

    /// Tries the status patch, then `PATCH …/cancel`, then `POST …/cancel`.
    ///
    /// When all three fail the error carries the most recent HTTP status available.
    pub async fn cancel_booking(&self, booking_id: i64) -> Result<Value> {
        let e1 = match self
            .api
            .patch(
                &format!("Bookings/{}/status", booking_id),
                &StatusPatch::new("Cancelled"),
            )
            .await
        {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };
        let e2 = match self
            .api
            .patch_empty(&format!("Bookings/{}/cancel", booking_id))
            .await
        {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };
        let e3 = match self
            .api
            .post_empty(&format!("Bookings/{}/cancel", booking_id))
            .await
        {
            Ok(body) => return Ok(body),
            Err(e) => e,
        };

        let status = e3.status().or_else(|| e2.status()).or_else(|| e1.status());
        tracing::warn!(
            "❌ Cancel booking {} failed on all routes ({}; {}; {})",
            booking_id,
            e1,
            e2,
            e3
        );
        Err(RoadReadyError::CancelFailed { status })
    }

    pub async fn get_quote(&self, car_id: i64, from_utc: &str, to_utc: &str) -> Result<Value> {
        let body = QuoteRequest {
            car_id,
            from_utc: from_utc.to_string(),
            to_utc: to_utc.to_string(),
        };
        self.api.post("Bookings/quote", &body).await
    }

    pub async fn create_booking(&self, payload: &BookingRequest) -> Result<Value> {
        self.api.post("Bookings", payload).await
    }

    // Booking issues

    pub async fn get_my_issues(&self) -> Result<Value> {
        with_fallback(
            self.api.get("BookingIssues/mine"),
            self.api.get("BookingIssues/my"),
        )
        .await
    }

    pub async fn get_all_issues(&self) -> Result<Value> {
        self.api.get("BookingIssues").await
    }

    pub async fn create_issue(&self, payload: &IssueRequest) -> Result<Value> {
        self.api.post("BookingIssues", payload).await
    }

    pub async fn get_booking_issues(&self, booking_id: i64) -> Result<Value> {
        self.api
            .get(&format!("BookingIssues/booking/{}", booking_id))
            .await
    }

    pub async fn update_issue_status(&self, issue_id: i64, status: &str) -> Result<Value> {
        self.api
            .patch(
                &format!("BookingIssues/{}/status", issue_id),
                &StatusPatch::new(status),
            )
            .await
    }

    // Reviews

    pub async fn create_review(&self, payload: &ReviewRequest) -> Result<Value> {
        self.api.post("Reviews", payload).await
    }

    pub async fn get_car_reviews(&self, car_id: i64) -> Result<Value> {
        self.api.get(&format!("Reviews/car/{}", car_id)).await
    }

    pub async fn get_car_rating(&self, car_id: i64) -> Result<Value> {
        self.api.get(&format!("Reviews/car/{}/avg", car_id)).await
    }

    // Maintenance

    pub async fn create_maintenance_request(
        &self,
        payload: &MaintenanceRequestPayload,
    ) -> Result<Value> {
        self.api.post("MaintenanceRequests", payload).await
    }

    pub async fn get_open_maintenance(&self) -> Result<Value> {
        self.api.get("MaintenanceRequests/open").await
    }

    pub async fn get_maintenance_for_car(&self, car_id: i64) -> Result<Value> {
        self.api
            .get(&format!("MaintenanceRequests/car/{}", car_id))
            .await
    }

    pub async fn get_my_maintenance(&self) -> Result<Value> {
        self.api.get("MaintenanceRequests/mine").await
    }

    pub async fn resolve_maintenance(&self, request_id: i64) -> Result<Value> {
        self.api
            .patch_empty(&format!("MaintenanceRequests/{}/resolve", request_id))
            .await
    }
}
