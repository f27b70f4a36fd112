mod auth;
mod common;
mod config;
mod roles;

pub use auth::{AuthEnvelope, LoginRequest};
pub use common::{HealthResponse, KeysResponse, WarningsResponse};
pub use config::{ClientConfigRequest, ClientConfigResponse};
pub use roles::{RoleRequest, RoleResponse};
