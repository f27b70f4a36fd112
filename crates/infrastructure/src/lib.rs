//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_transport;
mod in_memory_storage;
mod postgres_storage;
mod tc3_signer;
mod tencent_api;
mod tencent_cam_role_resolver;
mod tencent_identity_verifier;

#[cfg(test)]
mod test_support;

pub use http_transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use in_memory_storage::InMemoryStorage;
pub use postgres_storage::PostgresStorage;
pub use tc3_signer::{TC3_ALGORITHM, Tc3Signer};
pub use tencent_api::{
    CAM_API_VERSION, CAM_HOST, CAM_SERVICE, DEFAULT_REGION, STS_API_VERSION, STS_SERVICE,
};
pub use tencent_cam_role_resolver::TencentCamRoleResolver;
pub use tencent_identity_verifier::TencentIdentityVerifier;
