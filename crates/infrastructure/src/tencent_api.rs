//! Response envelope shared by the provider's JSON APIs.
//!
//! Every answer is wrapped as `{"Response": {...}}`. Failures keep HTTP 200
//! and carry `{"Response": {"Error": {"Code", "Message"}, "RequestId"}}`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use camgate_core::{AppError, AppResult};

use crate::HttpResponse;

/// Security token service API version.
pub const STS_API_VERSION: &str = "2018-08-13";
/// Security token service signing name.
pub const STS_SERVICE: &str = "sts";
/// Account management service host.
pub const CAM_HOST: &str = "cam.tencentcloudapi.com";
/// Account management API version.
pub const CAM_API_VERSION: &str = "2019-01-16";
/// Account management signing name.
pub const CAM_SERVICE: &str = "cam";
/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "na-ashburn";

#[derive(Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "Response")]
    response: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Decodes the payload of a provider response for `action`.
pub(crate) fn decode_response<T>(action: &str, response: HttpResponse) -> AppResult<T>
where
    T: DeserializeOwned,
{
    if response.status != 200 {
        let body = String::from_utf8_lossy(response.body.as_slice()).into_owned();
        tracing::debug!(action, status = response.status, body = %body, "provider returned non-success status");
        return Err(AppError::Upstream {
            status: response.status,
            body,
        });
    }

    let envelope: ResponseEnvelope =
        serde_json::from_slice(response.body.as_slice()).map_err(|error| {
            AppError::Verification(format!("failed to decode {action} response: {error}"))
        })?;

    if let Some(error) = envelope.response.get("Error") {
        let error = ApiErrorBody::deserialize(error).map_err(|decode_error| {
            AppError::Verification(format!("failed to decode {action} error: {decode_error}"))
        })?;
        return Err(AppError::Verification(format!(
            "{action} failed with {}: {}",
            error.code, error.message
        )));
    }

    serde_json::from_value(envelope.response).map_err(|error| {
        AppError::Verification(format!("failed to decode {action} response: {error}"))
    })
}
