pub mod auth;
pub mod client_config;
pub mod health;
pub mod roles;
