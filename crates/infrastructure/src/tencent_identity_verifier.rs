use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use camgate_application::{IdentityVerifier, LoginProof};
use camgate_core::AppResult;
use camgate_domain::{
    CALLER_IDENTITY_ACTION, CallerCredentials, CallerIdentity, IDENTITY_SERVICE_HOST,
    SignedIdentityRequest,
};

use crate::tencent_api::{STS_API_VERSION, STS_SERVICE, decode_response};
use crate::{HttpRequest, HttpResponse, HttpTransport, Tc3Signer};


const CALLER_IDENTITY_PAYLOAD: &[u8] = b"{}";

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CallerIdentityResponse {
    #[serde(default)]
    arn: String,
    #[serde(default)]
    account_id: String,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    principal_id: String,
    #[serde(rename = "Type", default)]
    identity_type: String,
    #[serde(default)]
    request_id: String,
}

impl From<CallerIdentityResponse> for CallerIdentity {
    fn from(value: CallerIdentityResponse) -> Self {
        Self {
            arn: value.arn,
            account_id: value.account_id,
            user_id: value.user_id,
            principal_id: value.principal_id,
            identity_type: value.identity_type,
            request_id: value.request_id,
        }
    }
}

/// Verifies callers through the provider's `GetCallerIdentity` action.
///
/// Signed requests are replayed verbatim. Raw credentials are used to sign
/// a fresh request. Nothing is retried.
#[derive(Clone)]
pub struct TencentIdentityVerifier {
    transport: Arc<dyn HttpTransport>,
    signer: Tc3Signer,
}

impl TencentIdentityVerifier {
    /// Creates a verifier sending through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            signer: Tc3Signer::new(STS_SERVICE, IDENTITY_SERVICE_HOST, STS_API_VERSION),
        }
    }

    async fn replay(&self, request: &SignedIdentityRequest) -> AppResult<HttpResponse> {
        tracing::debug!(url = %request.url(), "replaying signed identity request");
        self.transport
            .post(HttpRequest {
                url: request.url().clone(),
                headers: request.headers().to_vec(),
                body: request.body().to_vec(),
            })
            .await
    }

    async fn call_with_credentials(&self, credentials: &CallerCredentials) -> AppResult<HttpResponse> {
        let headers = self.signer.sign(
            &credentials.access_key,
            CALLER_IDENTITY_ACTION,
            Some(credentials.region.as_str()),
            CALLER_IDENTITY_PAYLOAD,
            chrono::Utc::now().timestamp(),
        )?;

        tracing::debug!(
            secret_id = credentials.access_key.secret_id(),
            region = credentials.region.as_str(),
            "calling identity endpoint with caller credentials"
        );
        self.transport
            .post(HttpRequest {
                url: self.signer.endpoint()?,
                headers,
                body: CALLER_IDENTITY_PAYLOAD.to_vec(),
            })
            .await
    }
}

#[async_trait]
impl IdentityVerifier for TencentIdentityVerifier {
    async fn verify(&self, proof: &LoginProof) -> AppResult<CallerIdentity> {
        let response = match proof {
            LoginProof::SignedRequest(request) => self.replay(request).await?,
            LoginProof::Credentials(credentials) => self.call_with_credentials(credentials).await?,
        };

        let claim: CallerIdentity =
            decode_response::<CallerIdentityResponse>(CALLER_IDENTITY_ACTION, response)?.into();
        claim.ensure_supported()?;

        Ok(claim)
    }
}
