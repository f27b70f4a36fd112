use std::collections::BTreeMap;

use camgate_application::{LoginInput, SignedHeaderInput};
use camgate_domain::IssuedCredential;
use serde::{Deserialize, Serialize};

/// Incoming login payload. The populated fields select the strategy.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub role: Option<String>,
    pub request_url: Option<String>,
    pub signed_header: Option<SignedHeaderRequest>,
    pub request_body: Option<String>,
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub token: Option<String>,
    pub region: Option<String>,
}

/// Signed headers as a JSON object or as that object encoded in a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignedHeaderRequest {
    Map(BTreeMap<String, HeaderValueRequest>),
    Encoded(String),
}

/// One header value or several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HeaderValueRequest {
    One(String),
    Many(Vec<String>),
}

/// Credential envelope shared by login responses and renewal requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthEnvelope {
    pub auth: IssuedCredential,
}

impl From<LoginRequest> for LoginInput {
    fn from(value: LoginRequest) -> Self {
        Self {
            role: value.role,
            request_url: value.request_url,
            signed_header: value.signed_header.map(SignedHeaderInput::from),
            request_body: value.request_body,
            secret_id: value.secret_id,
            secret_key: value.secret_key,
            token: value.token,
            region: value.region,
        }
    }
}

impl From<SignedHeaderRequest> for SignedHeaderInput {
    fn from(value: SignedHeaderRequest) -> Self {
        match value {
            SignedHeaderRequest::Encoded(encoded) => Self::Encoded(encoded),
            SignedHeaderRequest::Map(headers) => Self::Map(
                headers
                    .into_iter()
                    .map(|(name, values)| {
                        let values = match values {
                            HeaderValueRequest::One(value) => vec![value],
                            HeaderValueRequest::Many(values) => values,
                        };
                        (name, values)
                    })
                    .collect(),
            ),
        }
    }
}
