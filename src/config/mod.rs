pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub mod args;

#[cfg(feature = "cli")]
pub use args::{AgentCommand, CliConfig, Command, FleetCommand};
pub use cli::{LocalStorage, SessionStorage};
pub use toml_config::TomlConfig;
