//! Role registry: named bindings from a provider role to local policies.

use std::sync::Arc;
use std::time::Duration;

use camgate_core::{AppError, AppResult};
use camgate_domain::{RoleName, RoleRecord};

use crate::StorageBackend;

mod write;


/// Storage prefix of role records.
pub const ROLE_KEY_PREFIX: &str = "role/";

/// Fields accepted by a role create or update.
///
/// `None` keeps the stored value on update and uses the default on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleInput {
    /// Provider role identity string.
    pub arn: Option<String>,
    /// Policies granted to logins through this role.
    pub policies: Option<Vec<String>>,
    /// Default lease duration.
    pub ttl: Option<Duration>,
    /// Maximum lease lifetime.
    pub max_ttl: Option<Duration>,
    /// Renewal period.
    pub period: Option<Duration>,
    /// CIDR blocks logins must originate from.
    pub bound_cidrs: Option<Vec<String>>,
}

/// Result of a successful role write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleWriteOutcome {
    /// Non-fatal issues the operator should know about.
    pub warnings: Vec<String>,
}

/// Application service for role administration and lookup.
#[derive(Clone)]
pub struct RoleService {
    storage: Arc<dyn StorageBackend>,
    system_max_lease_ttl: Duration,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, system_max_lease_ttl: Duration) -> Self {
        Self {
            storage,
            system_max_lease_ttl,
        }
    }

    /// Returns the role stored under `name`, or `None` when absent.
    pub async fn read_role(&self, name: &str) -> AppResult<Option<RoleRecord>> {
        let name = RoleName::new(name)?;
        self.load_role(&name).await
    }

    /// Returns whether a role is stored under `name`.
    pub async fn role_exists(&self, name: &str) -> AppResult<bool> {
        Ok(self.read_role(name).await?.is_some())
    }

    /// Deletes a role. Deleting a missing role succeeds.
    pub async fn delete_role(&self, name: &str) -> AppResult<()> {
        let name = RoleName::new(name)?;
        self.storage.delete(role_key(&name).as_str()).await?;
        tracing::info!(role = %name, "role deleted");
        Ok(())
    }

    /// Lists role names alphabetically.
    pub async fn list_roles(&self) -> AppResult<Vec<String>> {
        let mut names = self.storage.list(ROLE_KEY_PREFIX).await?;
        names.sort();
        Ok(names)
    }

    pub(crate) async fn load_role(&self, name: &RoleName) -> AppResult<Option<RoleRecord>> {
        let Some(bytes) = self.storage.get(role_key(name).as_str()).await? else {
            return Ok(None);
        };

        serde_json::from_slice(bytes.as_slice())
            .map(Some)
            .map_err(|error| AppError::Internal(format!("failed to decode role '{name}': {error}")))
    }
}

fn role_key(name: &RoleName) -> String {
    format!("{ROLE_KEY_PREFIX}{name}")
}
