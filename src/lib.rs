pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{LocalStorage, SessionStorage, TomlConfig};

pub use app::App;
pub use core::{api::ApiClient, session::AuthSession};
pub use utils::error::{Result, RoadReadyError};
