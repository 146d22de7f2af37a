use crate::utils::error::Result;
use async_trait::async_trait;

/// String key-value storage, the shape of a browser's localStorage/sessionStorage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn session_file(&self) -> Option<&str>;
}

/// A screen that loads its data per tab.
#[async_trait]
pub trait Dashboard: Send + Sync {
    type Tab: Copy + Send + Sync + std::fmt::Debug;

    fn active_tab(&self) -> Self::Tab;

    /// Fetches whatever `tab` shows and makes it the active tab.
    async fn load_tab(&mut self, tab: Self::Tab) -> Result<()>;
}
