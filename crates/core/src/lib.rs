//! Shared primitives for all Rust crates in camgate.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across camgate crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Error categories produced by login, renewal and role administration.
///
/// Every variant is terminal for the current operation. None of them is
/// retried inside camgate; retry policy belongs to the host.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required request field was absent or empty.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A request field could not be decoded.
    #[error("failed to decode '{field}': {reason}")]
    Decode {
        /// Name of the offending field.
        field: String,
        /// Decoder failure description.
        reason: String,
    },

    /// An identity string could not be parsed.
    #[error("invalid arn: {0}")]
    InvalidArn(String),

    /// A verified identity is of a kind not accepted as a login proof.
    #[error("unsupported arn type: {0}")]
    UnsupportedArnType(String),

    /// A role binding names an identity that cannot bind a role.
    #[error("invalid role arn: {0}")]
    InvalidRoleArn(String),

    /// A forwarded request targets an endpoint or action that is not trusted.
    #[error("identity request rejected: {0}")]
    EndpointRejected(String),

    /// The identity round trip failed or produced an unusable claim.
    #[error("identity verification failed: {0}")]
    Verification(String),

    /// The identity endpoint answered with a non-success status.
    ///
    /// The body is retained for diagnostics but never rendered.
    #[error("identity endpoint returned status {status}")]
    Upstream {
        /// HTTP status returned by the provider.
        status: u16,
        /// Raw response body returned by the provider.
        body: String,
    },

    /// A call to an external collaborator timed out.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The verified caller identity type is not accepted.
    #[error("caller identity type '{0}' is not supported")]
    UnsupportedIdentityType(String),

    /// The role named by a login or renewal does not exist.
    #[error("role '{0}' not found")]
    RoleNotFound(String),

    /// A role write configured a ttl above its max ttl.
    #[error("ttl of {ttl_seconds}s exceeds max ttl of {max_ttl_seconds}s")]
    TtlExceedsMaxTtl {
        /// Requested ttl in seconds.
        ttl_seconds: u64,
        /// Configured max ttl in seconds.
        max_ttl_seconds: u64,
    },

    /// Network-origin policy rejected the caller.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The caller's identity is not a member of the role's bound identity.
    #[error("the caller's arn '{caller_arn}' does not match the arn bound to role '{role_name}'")]
    IdentityRoleMismatch {
        /// Identity presented by the caller.
        caller_arn: String,
        /// Role the caller attempted to use.
        role_name: String,
    },

    /// A previously issued credential lacks a metadata entry.
    #[error("credential metadata is missing '{0}'")]
    MissingMetadata(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated for an administrative surface.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
