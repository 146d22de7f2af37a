use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, RoadReadyError};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Shared HTTP client for the RoadReady API.
///
/// Paths are relative to the base URL (`Cars`, `Bookings/9/cancel`). Clones share
/// the bearer token, so a login through one handle authenticates every service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&normalized)?,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut slot = self.token.write().unwrap_or_else(|e| e.into_inner());
        *slot = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn post_empty(&self, path: &str) -> Result<Value> {
        self.send(Method::POST, path, None).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        self.send(Method::PATCH, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn patch_empty(&self, path: &str) -> Result<Value> {
        self.send(Method::PATCH, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = self.base_url.join(path)?;
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("📡 {} {} -> {}", method, url, status);

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            return Ok(match serde_json::from_str(&text) {
                Ok(json) => json,
                Err(_) => Value::String(text),
            });
        }

        if status.as_u16() == 401 {
            tracing::warn!("🔒 Session expired or not authorized for {}", path);
        }

        let message = error_message(&text).unwrap_or_else(|| {
            format!("Request failed with status code {}", status.as_u16())
        });
        Err(RoadReadyError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

/// Pulls the human-readable message out of an error body (`message`, `Message` or `error`).
pub fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    ["message", "Message", "error"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Runs `primary`; if it fails for any reason, runs `fallback` instead.
///
/// Used where deployments expose the same resource under different route names.
pub async fn with_fallback<T, P, F>(primary: P, fallback: F) -> Result<T>
where
    P: Future<Output = Result<T>>,
    F: Future<Output = Result<T>>,
{
    match primary.await {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::debug!("↩️ Primary endpoint failed ({}), trying fallback", e);
            fallback.await
        }
    }
}
