use crate::core::api::{with_fallback, ApiClient};
use crate::domain::dto::{BrandRequest, CarDto, CarStatusPatch};
use crate::utils::error::Result;
use serde_json::Value;

/// Fleet administration: cars and their lookup tables.
#[derive(Clone, Debug)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn get_cars(&self) -> Result<Value> {
        self.api.get("Cars").await
    }

    pub async fn get_car(&self, car_id: i64) -> Result<Value> {
        self.api.get(&format!("Cars/{}", car_id)).await
    }

    pub async fn create_car(&self, dto: &CarDto) -> Result<Value> {
        self.api.post("Cars", dto).await
    }

    pub async fn update_car(&self, car_id: i64, dto: &CarDto) -> Result<Value> {
        self.api.put(&format!("Cars/{}", car_id), dto).await
    }

    pub async fn delete_car(&self, car_id: i64) -> Result<Value> {
        self.api.delete(&format!("Cars/{}", car_id)).await
    }

    pub async fn set_car_status(&self, car_id: i64, status_id: i64) -> Result<Value> {
        self.api
            .patch(&format!("Cars/{}/status", car_id), &CarStatusPatch { status_id })
            .await
    }

    pub async fn get_brands(&self) -> Result<Value> {
        self.api.get("CarBrands").await
    }

    pub async fn create_brand(&self, brand_name: &str) -> Result<Value> {
        let body = BrandRequest {
            brand_name: brand_name.trim().to_string(),
        };
        with_fallback(
            self.api.post("CarBrands", &body),
            self.api.post("Brands", &body),
        )
        .await
    }

    pub async fn get_car_statuses(&self) -> Result<Value> {
        self.api.get("CarStatuses").await
    }
}
