use std::sync::Arc;

use camgate_application::{
    ClientConfigService, LoginService, LoginSettings, RoleService, StorageBackend,
};
use camgate_core::AppError;
use camgate_domain::AccessKey;
use camgate_infrastructure::{
    HttpTransport, InMemoryStorage, PostgresStorage, ReqwestTransport, TencentCamRoleResolver,
    TencentIdentityVerifier,
};

use secrecy::ExposeSecret;

use crate::api_config::{ApiConfig, StorageConfig};
use crate::state::AppState;

use super::database::connect_and_migrate;

pub async fn build_app_state(config: &ApiConfig) -> Result<AppState, AppError> {
    let storage: Arc<dyn StorageBackend> = match &config.storage {
        StorageConfig::Memory => Arc::new(InMemoryStorage::new()),
        StorageConfig::Postgres { database_url } => {
            Arc::new(PostgresStorage::new(connect_and_migrate(database_url).await?))
        }
    };

    let transport: Arc<dyn HttpTransport> =
        Arc::new(ReqwestTransport::new(config.identity_http_timeout)?);
    let fallback_access_key = config
        .fallback_credentials
        .as_ref()
        .map(|credentials| {
            AccessKey::new(
                credentials.secret_id.as_str(),
                credentials.secret_key.expose_secret().as_str(),
            )
        })
        .transpose()?;

    let role_service = RoleService::new(storage.clone(), config.system_max_lease_ttl);
    let client_config_service = ClientConfigService::new(storage);
    let login_service = LoginService::new(
        role_service.clone(),
        client_config_service.clone(),
        Arc::new(TencentIdentityVerifier::new(transport.clone())),
        Arc::new(TencentCamRoleResolver::new(
            transport,
            config.cam_region.clone(),
        )),
        LoginSettings {
            enabled_strategies: config.login_strategies.clone(),
            fallback_access_key,
        },
    );

    Ok(AppState {
        role_service,
        client_config_service,
        login_service,
        admin_token: config.admin_token.clone(),
        trust_forwarded_for: config.trust_forwarded_for,
    })
}
