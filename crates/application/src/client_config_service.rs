//! Operator-managed provider access key used for role-id lookups.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use camgate_core::{AppError, AppResult};
use camgate_domain::ClientConfig;

use crate::StorageBackend;


/// Storage key of the client configuration.
pub const CLIENT_CONFIG_KEY: &str = "config/client";

/// Fields accepted by a client configuration write.
#[derive(Debug, Clone, Default)]
pub struct ClientConfigInput {
    /// Access key id.
    pub secret_id: Option<String>,
    /// Access key secret.
    pub secret_key: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct StoredClientConfig {
    secret_id: String,
    secret_key: String,
}

/// Application service for the `config/client` entry.
#[derive(Clone)]
pub struct ClientConfigService {
    storage: Arc<dyn StorageBackend>,
}

impl ClientConfigService {
    /// Creates a new client configuration service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Returns the stored configuration, if any.
    pub async fn read_config(&self) -> AppResult<Option<ClientConfig>> {
        let Some(bytes) = self.storage.get(CLIENT_CONFIG_KEY).await? else {
            return Ok(None);
        };

        let stored: StoredClientConfig = serde_json::from_slice(bytes.as_slice()).map_err(|error| {
            AppError::Internal(format!("failed to decode client configuration: {error}"))
        })?;

        ClientConfig::new(stored.secret_id, stored.secret_key).map(Some)
    }

    /// Stores a new configuration, replacing any previous one.
    pub async fn create_config(&self, input: ClientConfigInput) -> AppResult<()> {
        let secret_id = input
            .secret_id
            .ok_or_else(|| AppError::MissingField("secret_id".to_owned()))?;
        let secret_key = input
            .secret_key
            .ok_or_else(|| AppError::MissingField("secret_key".to_owned()))?;

        self.store(ClientConfig::new(secret_id, secret_key)?).await
    }

    /// Updates the stored configuration. Absent fields keep their values.
    pub async fn update_config(&self, input: ClientConfigInput) -> AppResult<()> {
        let current = self.read_config().await?.ok_or_else(|| {
            AppError::NotFound("no client configuration exists to update".to_owned())
        })?;

        let secret_id = input
            .secret_id
            .unwrap_or_else(|| current.access_key().secret_id().to_owned());
        let secret_key = input
            .secret_key
            .unwrap_or_else(|| current.access_key().secret_key().expose_secret().clone());

        self.store(ClientConfig::new(secret_id, secret_key)?).await
    }

    /// Removes the configuration. Removing a missing entry succeeds.
    pub async fn delete_config(&self) -> AppResult<()> {
        self.storage.delete(CLIENT_CONFIG_KEY).await?;
        tracing::info!("client configuration deleted");
        Ok(())
    }

    async fn store(&self, config: ClientConfig) -> AppResult<()> {
        let stored = StoredClientConfig {
            secret_id: config.access_key().secret_id().to_owned(),
            secret_key: config.access_key().secret_key().expose_secret().clone(),
        };
        let bytes = serde_json::to_vec(&stored).map_err(|error| {
            AppError::Internal(format!("failed to encode client configuration: {error}"))
        })?;

        self.storage.put(CLIENT_CONFIG_KEY, bytes).await?;
        tracing::info!(secret_id = %config.access_key().secret_id(), "client configuration written");
        Ok(())
    }
}
