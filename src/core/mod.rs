pub mod api;
pub mod images;
pub mod mappers;
pub mod routing;
pub mod services;
pub mod session;

pub use crate::domain::ports::{ConfigProvider, Dashboard, KeyValueStore};
pub use crate::utils::error::Result;
pub use api::ApiClient;
pub use routing::{Access, Route};
pub use session::{AuthSession, LoginOutcome};
