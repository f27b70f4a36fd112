//! TC3-HMAC-SHA256 signing for provider API calls.

use chrono::DateTime;
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use url::Url;

use camgate_core::{AppError, AppResult};
use camgate_domain::AccessKey;

type HmacSha256 = Hmac<Sha256>;

/// Signature algorithm name.
pub const TC3_ALGORITHM: &str = "TC3-HMAC-SHA256";

const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-type;host";
const REQUEST_SCOPE_TERMINATOR: &str = "tc3_request";

/// Signs JSON POST calls to one provider service.
#[derive(Debug, Clone)]
pub struct Tc3Signer {
    service: String,
    host: String,
    version: String,
}

impl Tc3Signer {
    /// Creates a signer for `service` served at `host` with API `version`.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        host: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            host: host.into(),
            version: version.into(),
        }
    }

    /// Returns the service endpoint.
    pub fn endpoint(&self) -> AppResult<Url> {
        Url::parse(format!("https://{}/", self.host).as_str())
            .map_err(|error| AppError::Internal(format!("invalid endpoint host '{}': {error}", self.host)))
    }

    /// Returns the full header set for calling `action` with `payload`.
    ///
    /// `timestamp` is in Unix seconds and also determines the credential scope date.
    pub fn sign(
        &self,
        access_key: &AccessKey,
        action: &str,
        region: Option<&str>,
        payload: &[u8],
        timestamp: i64,
    ) -> AppResult<Vec<(String, String)>> {
        let authorization = self.authorization(access_key, payload, timestamp)?;

        let mut headers = vec![
            ("Authorization".to_owned(), authorization),
            ("Content-Type".to_owned(), CONTENT_TYPE.to_owned()),
            ("Host".to_owned(), self.host.clone()),
            ("X-TC-Action".to_owned(), action.to_owned()),
            ("X-TC-Timestamp".to_owned(), timestamp.to_string()),
            ("X-TC-Version".to_owned(), self.version.clone()),
        ];
        if let Some(region) = region.filter(|region| !region.is_empty()) {
            headers.push(("X-TC-Region".to_owned(), region.to_owned()));
        }
        if let Some(token) = access_key.token() {
            headers.push(("X-TC-Token".to_owned(), token.to_owned()));
        }

        Ok(headers)
    }

    fn authorization(
        &self,
        access_key: &AccessKey,
        payload: &[u8],
        timestamp: i64,
    ) -> AppResult<String> {
        let date = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| AppError::Internal(format!("timestamp {timestamp} is out of range")))?
            .format("%Y-%m-%d")
            .to_string();

        let canonical_request = format!(
            "POST\n/\n\ncontent-type:{CONTENT_TYPE}\nhost:{}\n\n{SIGNED_HEADERS}\n{}",
            self.host,
            hex::encode(Sha256::digest(payload))
        );
        let credential_scope = format!("{date}/{}/{REQUEST_SCOPE_TERMINATOR}", self.service);
        let string_to_sign = format!(
            "{TC3_ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let secret_date = hmac_sha256(
            format!("TC3{}", access_key.secret_key().expose_secret()).as_bytes(),
            date.as_bytes(),
        )?;
        let secret_service = hmac_sha256(secret_date.as_slice(), self.service.as_bytes())?;
        let secret_signing =
            hmac_sha256(secret_service.as_slice(), REQUEST_SCOPE_TERMINATOR.as_bytes())?;
        let signature = hex::encode(hmac_sha256(
            secret_signing.as_slice(),
            string_to_sign.as_bytes(),
        )?);

        Ok(format!(
            "{TC3_ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            access_key.secret_id()
        ))
    }
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> AppResult<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|error| AppError::Internal(format!("invalid signing key: {error}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use camgate_domain::AccessKey;

    use super::Tc3Signer;

    const TIMESTAMP: i64 = 1_551_113_065;

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn signs_caller_identity_request() {
        let signer = Tc3Signer::new("sts", "sts.tencentcloudapi.com", "2018-08-13");
        let headers = AccessKey::new("AKIDEXAMPLE", "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE").and_then(
            |key| signer.sign(&key, "GetCallerIdentity", Some("ap-guangzhou"), b"{}", TIMESTAMP),
        );
        assert!(headers.is_ok());

        if let Ok(headers) = headers {
            assert_eq!(
                header(&headers, "Authorization"),
                Some(
                    "TC3-HMAC-SHA256 Credential=AKIDEXAMPLE/2019-02-25/sts/tc3_request, \
                     SignedHeaders=content-type;host, \
                     Signature=201687ea76b82b9e3764e1f21e95c8dd999ee014e1aff455d4a9f4e6b5baf91a"
                )
            );
            assert_eq!(header(&headers, "X-TC-Action"), Some("GetCallerIdentity"));
            assert_eq!(header(&headers, "X-TC-Timestamp"), Some("1551113065"));
            assert_eq!(header(&headers, "X-TC-Region"), Some("ap-guangzhou"));
            assert_eq!(header(&headers, "X-TC-Token"), None);
        }
    }

    #[test]
    fn signature_covers_service_and_payload() {
        let signer = Tc3Signer::new("cam", "cam.tencentcloudapi.com", "2019-01-16");
        let headers = AccessKey::new("AKIDEXAMPLE", "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE")
            .map(|key| key.with_token(Some("session-token".to_owned())))
            .and_then(|key| {
                signer.sign(
                    &key,
                    "GetRole",
                    None,
                    br#"{"RoleId":"4611686018427418890"}"#,
                    TIMESTAMP,
                )
            });
        assert!(headers.is_ok());

        if let Ok(headers) = headers {
            assert!(header(&headers, "Authorization").is_some_and(|value| value.ends_with(
                "Signature=d5b608e213f1ff553a3d7fdb27136b64815c2d170882b9730aea9e63a0266f33"
            )));
            assert_eq!(header(&headers, "X-TC-Token"), Some("session-token"));
            assert_eq!(header(&headers, "X-TC-Region"), None);
        }
    }
}
