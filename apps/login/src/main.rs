//! camgate login helper.
//!
//! Signs a `GetCallerIdentity` request with local provider credentials and
//! submits it to camgate as a forwarded-request login. The issued credential
//! is printed to stdout as JSON.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camgate_core::{AppError, AppResult};
use camgate_domain::{AccessKey, CALLER_IDENTITY_ACTION, IDENTITY_SERVICE_HOST};
use camgate_infrastructure::{DEFAULT_REGION, STS_API_VERSION, STS_SERVICE, Tc3Signer};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CALLER_IDENTITY_PAYLOAD: &[u8] = b"{}";

#[derive(Debug, Clone)]
struct LoginConfig {
    camgate_addr: String,
    role_name: Option<String>,
    region: String,
    secret_id: String,
    secret_key: SecretString,
    token: Option<SecretString>,
}

#[derive(Debug, Serialize)]
struct ForwardedLoginRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    request_url: String,
    signed_header: BTreeMap<String, String>,
    request_body: String,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = LoginConfig::load()?;
    let access_key = AccessKey::new(
        config.secret_id.as_str(),
        config.secret_key.expose_secret().as_str(),
    )?
    .with_token(
        config
            .token
            .as_ref()
            .map(|token| token.expose_secret().clone()),
    );
    let login_request = build_login_request(
        &access_key,
        config.role_name.clone(),
        config.region.as_str(),
        chrono::Utc::now().timestamp(),
    )?;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    info!(
        camgate_addr = %config.camgate_addr,
        role = config.role_name.as_deref().unwrap_or("<provider role>"),
        region = %config.region,
        "submitting login"
    );

    let credential = submit_login(&http_client, config.camgate_addr.as_str(), &login_request).await?;
    let rendered = serde_json::to_string_pretty(&credential)
        .map_err(|error| AppError::Internal(format!("failed to render credential: {error}")))?;
    println!("{rendered}");

    Ok(())
}

impl LoginConfig {
    fn load() -> AppResult<Self> {
        let camgate_addr = env::var("CAMGATE_ADDR")
            .unwrap_or_else(|_| "http://127.0.0.1:8200".to_owned())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            camgate_addr,
            role_name: optional_non_empty_env("ROLE_NAME"),
            region: optional_non_empty_env("REGION").unwrap_or_else(|| DEFAULT_REGION.to_owned()),
            secret_id: required_env("TENCENTCLOUD_SECRET_ID")?,
            secret_key: SecretString::new(required_env("TENCENTCLOUD_SECRET_KEY")?),
            token: optional_non_empty_env("TENCENTCLOUD_TOKEN").map(SecretString::new),
        })
    }
}

fn build_login_request(
    access_key: &AccessKey,
    role: Option<String>,
    region: &str,
    timestamp: i64,
) -> AppResult<ForwardedLoginRequest> {
    let signer = Tc3Signer::new(STS_SERVICE, IDENTITY_SERVICE_HOST, STS_API_VERSION);
    let headers = signer.sign(
        access_key,
        CALLER_IDENTITY_ACTION,
        Some(region),
        CALLER_IDENTITY_PAYLOAD,
        timestamp,
    )?;

    Ok(ForwardedLoginRequest {
        role,
        request_url: STANDARD.encode(signer.endpoint()?.as_str()),
        signed_header: headers.into_iter().collect(),
        request_body: STANDARD.encode(CALLER_IDENTITY_PAYLOAD),
    })
}

async fn submit_login(
    http_client: &reqwest::Client,
    camgate_addr: &str,
    login_request: &ForwardedLoginRequest,
) -> AppResult<Value> {
    let endpoint = format!("{camgate_addr}/v1/auth/login");
    let response = http_client
        .post(endpoint)
        .json(login_request)
        .send()
        .await
        .map_err(|error| AppError::Internal(format!("failed to call camgate login: {error}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<body unavailable>".to_owned());
        return Err(AppError::Unauthorized(format!(
            "camgate login returned status {}: {body}",
            status.as_u16()
        )));
    }

    response.json::<Value>().await.map_err(|error| {
        AppError::Internal(format!("failed to parse camgate login response body: {error}"))
    })
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_env(name: &str) -> AppResult<String> {
    optional_non_empty_env(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
