use crate::core::api::ApiClient;
use crate::utils::error::Result;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn me(&self) -> Result<Value> {
        self.api.get("Users/me").await
    }

    pub async fn all_users(&self) -> Result<Value> {
        self.api.get("Users").await
    }
}
