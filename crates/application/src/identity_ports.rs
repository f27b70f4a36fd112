use std::fmt::{Display, Formatter};
use std::str::FromStr;

use async_trait::async_trait;

use camgate_core::{AppError, AppResult};
use camgate_domain::{AccessKey, CallerCredentials, CallerIdentity, SignedIdentityRequest};

/// Ways a caller can prove its provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStrategy {
    /// The caller pre-signs a `GetCallerIdentity` call that is replayed.
    SignedRequest,
    /// The caller hands over an access key and camgate signs the call.
    Credentials,
}

impl LoginStrategy {
    /// Returns the stable configuration name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SignedRequest => "signed_request",
            Self::Credentials => "credentials",
        }
    }
}

impl Display for LoginStrategy {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for LoginStrategy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "signed_request" => Ok(Self::SignedRequest),
            "credentials" => Ok(Self::Credentials),
            other => Err(AppError::Validation(format!(
                "unknown login strategy '{other}'"
            ))),
        }
    }
}

/// Decoded identity proof submitted with a login.
#[derive(Debug, Clone)]
pub enum LoginProof {
    /// Caller-signed request to replay.
    SignedRequest(SignedIdentityRequest),
    /// Caller credentials to sign a fresh request with.
    Credentials(CallerCredentials),
}

impl LoginProof {
    /// Returns which strategy produced this proof.
    #[must_use]
    pub fn strategy(&self) -> LoginStrategy {
        match self {
            Self::SignedRequest(_) => LoginStrategy::SignedRequest,
            Self::Credentials(_) => LoginStrategy::Credentials,
        }
    }
}

/// Port that turns an identity proof into a provider-verified claim.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Performs the identity round trip. Never retried.
    async fn verify(&self, proof: &LoginProof) -> AppResult<CallerIdentity>;
}

/// Port that maps a provider role id to the role's name.
#[async_trait]
pub trait RoleNameResolver: Send + Sync {
    /// Looks up the name of `role_id`, authenticating with `access_key`.
    async fn resolve_role_name(&self, access_key: &AccessKey, role_id: &str) -> AppResult<String>;
}
