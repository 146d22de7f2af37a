use crate::core::api::ApiClient;
use crate::domain::dto::{LoginRequest, RegisterRequest};
use crate::utils::error::Result;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn login(&self, model: &LoginRequest) -> Result<Value> {
        self.api.post("Authentication/login", model).await
    }

    pub async fn register(&self, model: &RegisterRequest) -> Result<Value> {
        self.api.post("Authentication/register", model).await
    }
}
