//! Login and renewal for callers proving a provider role identity.
//!
//! A login walks a fixed sequence of [`LoginStage`]s. Each stage either
//! advances or ends the attempt with an error; no partial credential is
//! ever produced.

use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::sync::Arc;

use camgate_core::{AppError, AppResult};
use camgate_domain::{AccessKey, Arn, IssuedCredential, RoleName, RoleRecord};

use crate::{
    ClientConfigService, IdentityVerifier, LoginStrategy, RoleNameResolver, RoleService,
};

mod input;
mod login;
mod renew;


pub use input::{LoginInput, SignedHeaderInput};

/// Progress of a single login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    /// Request accepted for processing.
    Received,
    /// Required fields are present and decoded.
    InputValidated,
    /// The provider confirmed the caller's identity.
    IdentityVerified,
    /// The acting role name is known.
    RoleResolved,
    /// The role record was loaded.
    RoleLoaded,
    /// Network-origin restrictions passed.
    NetworkChecked,
    /// The caller belongs to the role's bound identity.
    MembershipChecked,
    /// The credential was built.
    CredentialIssued,
}

impl LoginStage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::InputValidated => "input_validated",
            Self::IdentityVerified => "identity_verified",
            Self::RoleResolved => "role_resolved",
            Self::RoleLoaded => "role_loaded",
            Self::NetworkChecked => "network_checked",
            Self::MembershipChecked => "membership_checked",
            Self::CredentialIssued => "credential_issued",
        }
    }
}

impl Display for LoginStage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Login behavior chosen by the operator.
#[derive(Debug, Clone)]
pub struct LoginSettings {
    /// Strategies callers may use.
    pub enabled_strategies: Vec<LoginStrategy>,
    /// Access key for role-id lookups when no client configuration is stored.
    pub fallback_access_key: Option<AccessKey>,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            enabled_strategies: vec![LoginStrategy::SignedRequest],
            fallback_access_key: None,
        }
    }
}

/// Application service issuing and renewing credentials.
#[derive(Clone)]
pub struct LoginService {
    role_service: RoleService,
    client_config_service: ClientConfigService,
    identity_verifier: Arc<dyn IdentityVerifier>,
    role_name_resolver: Arc<dyn RoleNameResolver>,
    settings: LoginSettings,
}

impl LoginService {
    /// Creates a new login service.
    #[must_use]
    pub fn new(
        role_service: RoleService,
        client_config_service: ClientConfigService,
        identity_verifier: Arc<dyn IdentityVerifier>,
        role_name_resolver: Arc<dyn RoleNameResolver>,
        settings: LoginSettings,
    ) -> Self {
        Self {
            role_service,
            client_config_service,
            identity_verifier,
            role_name_resolver,
            settings,
        }
    }

    async fn load_bound_role(&self, name: &RoleName) -> AppResult<RoleRecord> {
        self.role_service
            .load_role(name)
            .await?
            .ok_or_else(|| AppError::RoleNotFound(name.to_string()))
    }
}

fn ensure_member(caller_arn: &Arn, role: &RoleRecord) -> AppResult<()> {
    if caller_arn.is_member_of(role.arn()) {
        return Ok(());
    }

    Err(AppError::IdentityRoleMismatch {
        caller_arn: caller_arn.to_string(),
        role_name: role.name().to_string(),
    })
}

fn advance(stage: &mut LoginStage, next: LoginStage) {
    *stage = next;
    tracing::debug!(stage = %next, "login stage reached");
}
