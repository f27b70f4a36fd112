use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use camgate_application::RoleNameResolver;
use camgate_core::{AppError, AppResult};
use camgate_domain::AccessKey;

use crate::tencent_api::{CAM_API_VERSION, CAM_HOST, CAM_SERVICE, decode_response};
use crate::{HttpRequest, HttpTransport, Tc3Signer};

const GET_ROLE_ACTION: &str = "GetRole";

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetRoleResponse {
    role_info: Option<RoleInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RoleInfo {
    #[serde(default)]
    role_name: String,
}

/// Resolves role ids to names with the account management `GetRole` action.
#[derive(Clone)]
pub struct TencentCamRoleResolver {
    transport: Arc<dyn HttpTransport>,
    signer: Tc3Signer,
    region: String,
}

impl TencentCamRoleResolver {
    /// Creates a resolver calling the account management API in `region`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, region: impl Into<String>) -> Self {
        Self {
            transport,
            signer: Tc3Signer::new(CAM_SERVICE, CAM_HOST, CAM_API_VERSION),
            region: region.into(),
        }
    }
}

#[async_trait]
impl RoleNameResolver for TencentCamRoleResolver {
    async fn resolve_role_name(&self, access_key: &AccessKey, role_id: &str) -> AppResult<String> {
        let body = serde_json::to_vec(&serde_json::json!({ "RoleId": role_id }))
            .map_err(|error| AppError::Internal(format!("failed to encode GetRole request: {error}")))?;
        let headers = self.signer.sign(
            access_key,
            GET_ROLE_ACTION,
            Some(self.region.as_str()),
            body.as_slice(),
            chrono::Utc::now().timestamp(),
        )?;

        let response = self
            .transport
            .post(HttpRequest {
                url: self.signer.endpoint()?,
                headers,
                body,
            })
            .await?;

        let role_name = decode_response::<GetRoleResponse>(GET_ROLE_ACTION, response)?
            .role_info
            .map(|info| info.role_name)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AppError::Verification(format!("role id '{role_id}' did not resolve to a role name"))
            })?;

        tracing::debug!(role_id, role_name = %role_name, "resolved provider role");
        Ok(role_name)
    }
}
