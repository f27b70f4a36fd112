//! Pre-signed identity requests forwarded on behalf of a caller.
//!
//! A caller signs a `GetCallerIdentity` call with its own credentials and
//! hands camgate the pieces. camgate replays the call and trusts the answer,
//! so the endpoint and action are pinned before anything is sent.

use camgate_core::{AppError, AppResult};
use url::Url;

/// Host of the provider's security token service.
pub const IDENTITY_SERVICE_HOST: &str = "sts.tencentcloudapi.com";

/// Provider action that answers with the caller's identity.
pub const CALLER_IDENTITY_ACTION: &str = "GetCallerIdentity";

/// Header carrying the provider action.
pub const ACTION_HEADER: &str = "X-TC-Action";

const HOST_HEADER: &str = "Host";

/// A signed `GetCallerIdentity` request that passed endpoint pinning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIdentityRequest {
    url: Url,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl SignedIdentityRequest {
    /// Validates and wraps a caller-signed request.
    ///
    /// The url must use `https` and point at [`IDENTITY_SERVICE_HOST`] with no
    /// userinfo or explicit port, and the action header must name
    /// [`CALLER_IDENTITY_ACTION`].
    pub fn new(url: Url, headers: Vec<(String, String)>, body: Vec<u8>) -> AppResult<Self> {
        if url.scheme() != "https" {
            return Err(AppError::EndpointRejected(format!(
                "expected \"https\" url scheme but received \"{}\"",
                url.scheme()
            )));
        }

        let actions: Vec<&str> = header_values(&headers, ACTION_HEADER).collect();
        match actions.as_slice() {
            [action] if *action == CALLER_IDENTITY_ACTION => {}
            [] => {
                return Err(AppError::EndpointRejected(format!(
                    "missing {ACTION_HEADER} header"
                )));
            }
            _ => {
                return Err(AppError::EndpointRejected(format!(
                    "expected a single {ACTION_HEADER} header of \"{CALLER_IDENTITY_ACTION}\""
                )));
            }
        }

        if url.host_str() != Some(IDENTITY_SERVICE_HOST) {
            return Err(AppError::EndpointRejected(format!(
                "expected host \"{IDENTITY_SERVICE_HOST}\" but received \"{}\"",
                url.host_str().unwrap_or_default()
            )));
        }

        if url.port().is_some() || !url.username().is_empty() || url.password().is_some() {
            return Err(AppError::EndpointRejected(
                "identity url must not carry a port or userinfo".to_owned(),
            ));
        }

        if header_values(&headers, HOST_HEADER)
            .any(|host| !host.trim().eq_ignore_ascii_case(IDENTITY_SERVICE_HOST))
        {
            return Err(AppError::EndpointRejected(format!(
                "{HOST_HEADER} header must be \"{IDENTITY_SERVICE_HOST}\""
            )));
        }

        Ok(Self { url, headers, body })
    }

    /// Returns the target url.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns header name/value pairs in the order supplied.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        self.headers.as_slice()
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        self.body.as_slice()
    }
}

fn header_values<'a>(
    headers: &'a [(String, String)],
    name: &'a str,
) -> impl Iterator<Item = &'a str> + 'a {
    headers
        .iter()
        .filter(move |(header, _)| header.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use camgate_core::AppError;
    use url::Url;

    use super::SignedIdentityRequest;

    fn headers(action: &str) -> Vec<(String, String)> {
        vec![
            ("X-TC-Action".to_owned(), action.to_owned()),
            ("Host".to_owned(), "sts.tencentcloudapi.com".to_owned()),
        ]
    }

    fn build(url: &str, headers: Vec<(String, String)>) -> Result<SignedIdentityRequest, AppError> {
        let url = Url::parse(url).map_err(|error| AppError::Validation(error.to_string()))?;
        SignedIdentityRequest::new(url, headers, b"{}".to_vec())
    }

    #[test]
    fn accepts_pinned_request() {
        let request = build("https://sts.tencentcloudapi.com/", headers("GetCallerIdentity"));
        assert!(request.is_ok());

        if let Ok(request) = request {
            assert_eq!(request.body(), b"{}");
            assert_eq!(request.headers().len(), 2);
        }
    }

    #[test]
    fn rejects_plain_http() {
        assert!(matches!(
            build("http://sts.tencentcloudapi.com/", headers("GetCallerIdentity")),
            Err(AppError::EndpointRejected(_))
        ));
    }

    #[test]
    fn rejects_other_actions() {
        assert!(matches!(
            build("https://sts.tencentcloudapi.com/", headers("AssumeRole")),
            Err(AppError::EndpointRejected(_))
        ));
        assert!(matches!(
            build("https://sts.tencentcloudapi.com/", Vec::new()),
            Err(AppError::EndpointRejected(_))
        ));

        let mut doubled = headers("GetCallerIdentity");
        doubled.push(("x-tc-action".to_owned(), "AssumeRole".to_owned()));
        assert!(matches!(
            build("https://sts.tencentcloudapi.com/", doubled),
            Err(AppError::EndpointRejected(_))
        ));
    }

    #[test]
    fn action_value_must_match_exactly() {
        for action in ["getcalleridentity", "GETCALLERIDENTITY", "  GetCallerIdentity  "] {
            assert!(
                matches!(
                    build("https://sts.tencentcloudapi.com/", headers(action)),
                    Err(AppError::EndpointRejected(_))
                ),
                "{action:?} should be rejected"
            );
        }

        let mut renamed = vec![("x-tc-action".to_owned(), "GetCallerIdentity".to_owned())];
        renamed.push(("host".to_owned(), "sts.tencentcloudapi.com".to_owned()));
        assert!(build("https://sts.tencentcloudapi.com/", renamed).is_ok());
    }

    #[test]
    fn rejects_foreign_hosts() {
        for url in [
            "https://sts.tencentcloudapi.com.example.org/",
            "https://example.org/",
            "https://sts.tencentcloudapi.com:8443/",
            "https://user@sts.tencentcloudapi.com/",
        ] {
            assert!(
                matches!(
                    build(url, headers("GetCallerIdentity")),
                    Err(AppError::EndpointRejected(_))
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_mismatched_host_header() {
        let mut spoofed = headers("GetCallerIdentity");
        spoofed.push(("host".to_owned(), "example.org".to_owned()));

        assert!(matches!(
            build("https://sts.tencentcloudapi.com/", spoofed),
            Err(AppError::EndpointRejected(_))
        ));
    }
}
