use camgate_application::ClientConfigInput;
use camgate_domain::ClientConfig;
use serde::{Deserialize, Serialize};

/// Incoming client configuration payload.
#[derive(Debug, Default, Deserialize)]
pub struct ClientConfigRequest {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
}

/// API representation of the client configuration. The secret key is never returned.
#[derive(Debug, Serialize)]
pub struct ClientConfigResponse {
    pub secret_id: String,
}

impl From<ClientConfigRequest> for ClientConfigInput {
    fn from(value: ClientConfigRequest) -> Self {
        Self {
            secret_id: value.secret_id,
            secret_key: value.secret_key,
        }
    }
}

impl From<ClientConfig> for ClientConfigResponse {
    fn from(value: ClientConfig) -> Self {
        Self {
            secret_id: value.access_key().secret_id().to_owned(),
        }
    }
}
