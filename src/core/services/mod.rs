//! Thin wrappers over the REST endpoints. They return the raw JSON body;
//! callers normalize it with [`crate::core::mappers`].

pub mod admin;
pub mod auth;
pub mod customer;
pub mod user;

pub use admin::AdminService;
pub use auth::AuthService;
pub use customer::CustomerService;
pub use user::UserService;
