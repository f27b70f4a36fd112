//! Application services and ports.

#![forbid(unsafe_code)]

mod client_config_service;
mod identity_ports;
mod login_service;
mod role_service;
mod storage_ports;

#[cfg(test)]
mod test_support;

pub use client_config_service::{CLIENT_CONFIG_KEY, ClientConfigInput, ClientConfigService};
pub use identity_ports::{IdentityVerifier, LoginProof, LoginStrategy, RoleNameResolver};
pub use login_service::{LoginInput, LoginService, LoginSettings, LoginStage, SignedHeaderInput};
pub use role_service::{ROLE_KEY_PREFIX, RoleInput, RoleService, RoleWriteOutcome};
pub use storage_ports::StorageBackend;
