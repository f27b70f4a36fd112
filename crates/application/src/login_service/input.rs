use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use url::Url;

use camgate_core::{AppError, AppResult, NonEmptyString};
use camgate_domain::{AccessKey, CallerCredentials, SignedIdentityRequest};

use crate::LoginProof;

/// Signed headers as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignedHeaderInput {
    /// A JSON object, either verbatim or base64-encoded.
    Encoded(String),
    /// Header names mapped to one or more values.
    Map(Vec<(String, Vec<String>)>),
}

/// Raw login fields. The populated fields select the strategy.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    /// Role to log in as. Defaults to the caller's provider role name.
    pub role: Option<String>,
    /// Base64 of the signed request url.
    pub request_url: Option<String>,
    /// Headers of the signed request.
    pub signed_header: Option<SignedHeaderInput>,
    /// Base64 of the signed request body.
    pub request_body: Option<String>,
    /// Caller access key id.
    pub secret_id: Option<String>,
    /// Caller access key secret.
    pub secret_key: Option<String>,
    /// Caller session token.
    pub token: Option<String>,
    /// Region for the identity call.
    pub region: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl LoginInput {
    /// Splits the input into the requested role and a decoded proof.
    pub(crate) fn into_proof(self) -> AppResult<(Option<String>, LoginProof)> {
        let role = self
            .role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_owned);

        let uses_signed_request = self.request_url.is_some() || self.signed_header.is_some();
        let uses_credentials = self.secret_id.is_some() || self.secret_key.is_some();

        let proof = if uses_signed_request {
            LoginProof::SignedRequest(self.decode_signed_request()?)
        } else if uses_credentials {
            LoginProof::Credentials(self.decode_credentials()?)
        } else {
            return Err(AppError::MissingField("request_url".to_owned()));
        };

        Ok((role, proof))
    }

    fn decode_signed_request(self) -> AppResult<SignedIdentityRequest> {
        let encoded_url = required(self.request_url, "request_url")?;
        let url_text = decode_base64_text("request_url", encoded_url.as_str())?;
        let url = Url::parse(url_text.as_str()).map_err(|error| AppError::Decode {
            field: "request_url".to_owned(),
            reason: error.to_string(),
        })?;

        let headers = match self.signed_header {
            Some(SignedHeaderInput::Map(entries)) => flatten_headers(entries),
            Some(SignedHeaderInput::Encoded(text)) => decode_header_text(text.as_str())?,
            None => Vec::new(),
        };
        if headers.is_empty() {
            return Err(AppError::MissingField("signed_header".to_owned()));
        }

        let body = match self.request_body.filter(|body| !body.trim().is_empty()) {
            Some(encoded) => decode_base64("request_body", encoded.as_str())?,
            None => Vec::new(),
        };

        SignedIdentityRequest::new(url, headers, body)
    }

    fn decode_credentials(self) -> AppResult<CallerCredentials> {
        let secret_id = required(self.secret_id, "secret_id")?;
        let secret_key = required(self.secret_key, "secret_key")?;
        let region = required(self.region, "region")?;

        Ok(CallerCredentials {
            access_key: AccessKey::new(secret_id, secret_key)?.with_token(self.token),
            region: NonEmptyString::new(region)?,
        })
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::MissingField(field.to_owned()))
}

fn decode_base64(field: &str, value: &str) -> AppResult<Vec<u8>> {
    STANDARD
        .decode(value.trim())
        .map_err(|error| AppError::Decode {
            field: field.to_owned(),
            reason: format!("invalid base64: {error}"),
        })
}

fn decode_base64_text(field: &str, value: &str) -> AppResult<String> {
    String::from_utf8(decode_base64(field, value)?).map_err(|error| AppError::Decode {
        field: field.to_owned(),
        reason: format!("invalid utf-8: {error}"),
    })
}

fn decode_header_text(text: &str) -> AppResult<Vec<(String, String)>> {
    let json = if text.trim_start().starts_with('{') {
        text.to_owned()
    } else {
        decode_base64_text("signed_header", text)?
    };

    let entries: BTreeMap<String, HeaderValues> =
        serde_json::from_str(json.as_str()).map_err(|error| AppError::Decode {
            field: "signed_header".to_owned(),
            reason: format!("invalid header object: {error}"),
        })?;

    Ok(entries
        .into_iter()
        .flat_map(|(name, values)| {
            let values = match values {
                HeaderValues::One(value) => vec![value],
                HeaderValues::Many(values) => values,
            };
            values.into_iter().map(move |value| (name.clone(), value))
        })
        .collect())
}

fn flatten_headers(entries: Vec<(String, Vec<String>)>) -> Vec<(String, String)> {
    entries
        .into_iter()
        .flat_map(|(name, values)| values.into_iter().map(move |value| (name.clone(), value)))
        .collect()
}
