pub mod account;
pub mod admin_fleet;
pub mod agent_dashboard;
pub mod booking;
#[cfg(feature = "cli")]
pub mod commands;
pub mod customer_dashboard;

use crate::config::cli::{LocalStorage, SessionStorage};
use crate::config::toml_config::TomlConfig;
use crate::core::api::ApiClient;
use crate::core::routing::Route;
use crate::core::services::{AdminService, AuthService, CustomerService, UserService};
use crate::core::session::AuthSession;
use crate::domain::ports::{ConfigProvider, KeyValueStore};
use crate::utils::error::Result;

pub use admin_fleet::AdminFleet;
pub use agent_dashboard::{AgentDashboard, AgentTab};
pub use booking::BookingFlow;
pub use customer_dashboard::{CustomerDashboard, CustomerTab};

/// Every service wired to one API client and one session.
pub struct App {
    pub session: AuthSession,
    pub auth: AuthService,
    pub users: UserService,
    pub admin: AdminService,
    pub customer: CustomerService,
}

impl App {
    /// Remembered logins go to the configured session file, if any.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let persistent: Box<dyn KeyValueStore> = match config.session_file() {
            Some(file) => Box::new(LocalStorage::new(file)),
            None => Box::new(SessionStorage::new()),
        };
        Self::with_stores(config, persistent, Box::new(SessionStorage::new()))
    }

    pub fn with_stores<C: ConfigProvider>(
        config: &C,
        persistent: Box<dyn KeyValueStore>,
        ephemeral: Box<dyn KeyValueStore>,
    ) -> Result<Self> {
        let api = ApiClient::from_config(config)?;
        tracing::debug!("API base URL: {}", api.base_url());

        Ok(Self {
            auth: AuthService::new(api.clone()),
            users: UserService::new(api.clone()),
            admin: AdminService::new(api.clone()),
            customer: CustomerService::new(api.clone()),
            session: AuthSession::new(api, persistent, ephemeral),
        })
    }

    pub fn customer_dashboard(&self) -> Result<CustomerDashboard> {
        self.session.require(Route::CustomerDashboard)?;
        Ok(CustomerDashboard::new(
            self.customer.clone(),
            self.session.user_id(),
        ))
    }

    pub fn agent_dashboard(&self) -> Result<AgentDashboard> {
        self.session.require(Route::AgentDashboard)?;
        Ok(AgentDashboard::new(self.customer.clone(), self.admin.clone()))
    }

    pub fn admin_fleet(&self) -> Result<AdminFleet> {
        self.session.require(Route::AdminDashboard)?;
        Ok(AdminFleet::new(self.admin.clone(), self.customer.clone()))
    }
}
