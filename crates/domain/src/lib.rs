//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod arn;
mod claim;
mod credentials;
mod issued_credential;
mod lease;
mod network;
mod role;
mod signed_request;

pub use arn::{ARN_PROVIDER_PREFIX, ARN_SERVICE_CAM, ARN_SERVICE_STS, Arn, ArnKind, ArnParseError};
pub use claim::{CallerIdentity, SUPPORTED_IDENTITY_TYPE};
pub use credentials::{AccessKey, CallerCredentials, ClientConfig};
pub use issued_credential::{
    IssuedCredential, METADATA_ACCOUNT_ID, METADATA_ARN, METADATA_ARN_ROLE_NAME,
    METADATA_IDENTITY_TYPE, METADATA_PRINCIPAL_ID, METADATA_REQUEST_ID, METADATA_ROLE_ID,
    METADATA_ROLE_NAME, METADATA_USER_ID,
};
pub use lease::{LeaseParams, parse_duration};
pub use network::BoundCidrs;
pub use role::{RoleName, RoleRecord, validate_role_binding};
pub use signed_request::{
    ACTION_HEADER, CALLER_IDENTITY_ACTION, IDENTITY_SERVICE_HOST, SignedIdentityRequest,
};
