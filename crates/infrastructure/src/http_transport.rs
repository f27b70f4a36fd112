use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use camgate_core::{AppError, AppResult};

/// Outgoing POST request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Target url.
    pub url: Url,
    /// Header name/value pairs, sent in order.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: Vec<u8>,
}

/// Response status and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body.
    pub body: Vec<u8>,
}

/// Replaceable HTTP client used for provider calls.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a POST request and returns the response without following redirects.
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse>;
}

/// `reqwest`-backed transport.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a per-request timeout.
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let mut builder = self.http_client.post(request.url.clone());
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("content-length")
                || name.eq_ignore_ascii_case("transfer-encoding")
            {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(|error| transport_error(&request.url, error))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| transport_error(&request.url, error))?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn transport_error(url: &Url, error: reqwest::Error) -> AppError {
    let host = url.host_str().unwrap_or_default();
    if error.is_timeout() {
        return AppError::Timeout(format!("request to {host} timed out"));
    }

    AppError::Verification(format!("request to {host} failed: {error}"))
}
