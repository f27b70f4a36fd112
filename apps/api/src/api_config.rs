use std::env;
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use camgate_application::LoginStrategy;
use camgate_core::AppError;
use camgate_infrastructure::DEFAULT_REGION;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;
const DEFAULT_IDENTITY_HTTP_TIMEOUT_SECONDS: u64 = 90;
const DEFAULT_SYSTEM_MAX_LEASE_TTL_SECONDS: u64 = 32 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    Postgres { database_url: String },
}

impl Display for StorageConfig {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => formatter.write_str("memory"),
            Self::Postgres { .. } => formatter.write_str("postgres"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FallbackCredentials {
    pub secret_id: String,
    pub secret_key: SecretString,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub api_host: String,
    pub api_port: u16,
    pub admin_token: String,
    pub storage: StorageConfig,
    pub login_strategies: Vec<LoginStrategy>,
    pub identity_http_timeout: Duration,
    pub system_max_lease_ttl: Duration,
    pub fallback_credentials: Option<FallbackCredentials>,
    pub cam_region: String,
    pub trust_forwarded_for: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let admin_token = required_non_empty_env("ADMIN_TOKEN")?;
        if admin_token.len() < MIN_ADMIN_TOKEN_LENGTH {
            return Err(AppError::Validation(format!(
                "ADMIN_TOKEN must be at least {MIN_ADMIN_TOKEN_LENGTH} characters"
            )));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8200);

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "memory".to_owned())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StorageConfig::Memory,
            "postgres" => StorageConfig::Postgres {
                database_url: required_non_empty_env("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let login_strategies = parse_login_strategies(
            env::var("LOGIN_STRATEGIES")
                .unwrap_or_else(|_| LoginStrategy::SignedRequest.to_string())
                .as_str(),
        )?;

        let identity_http_timeout = Duration::from_secs(seconds_env(
            "IDENTITY_HTTP_TIMEOUT_SECONDS",
            DEFAULT_IDENTITY_HTTP_TIMEOUT_SECONDS,
        )?);
        let system_max_lease_ttl = Duration::from_secs(seconds_env(
            "SYSTEM_MAX_LEASE_TTL_SECONDS",
            DEFAULT_SYSTEM_MAX_LEASE_TTL_SECONDS,
        )?);

        let fallback_credentials = fallback_credentials(
            optional_non_empty_env("TENCENTCLOUD_SECRET_ID"),
            optional_non_empty_env("TENCENTCLOUD_SECRET_KEY"),
        )?;

        let cam_region =
            optional_non_empty_env("CAM_REGION").unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let trust_forwarded_for = env::var("TRUST_FORWARDED_FOR")
            .unwrap_or_else(|_| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            migrate_only,
            api_host,
            api_port,
            admin_token,
            storage,
            login_strategies,
            identity_http_timeout,
            system_max_lease_ttl,
            fallback_credentials,
            cam_region,
            trust_forwarded_for,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_login_strategies(value: &str) -> Result<Vec<LoginStrategy>, AppError> {
    let mut strategies = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let strategy = LoginStrategy::from_str(entry).map_err(|error| {
            AppError::Validation(format!("invalid LOGIN_STRATEGIES entry: {error}"))
        })?;
        if !strategies.contains(&strategy) {
            strategies.push(strategy);
        }
    }

    if strategies.is_empty() {
        return Err(AppError::Validation(
            "LOGIN_STRATEGIES must enable at least one strategy".to_owned(),
        ));
    }

    Ok(strategies)
}

fn fallback_credentials(
    secret_id: Option<String>,
    secret_key: Option<String>,
) -> Result<Option<FallbackCredentials>, AppError> {
    match (secret_id, secret_key) {
        (Some(secret_id), Some(secret_key)) => Ok(Some(FallbackCredentials {
            secret_id,
            secret_key: SecretString::new(secret_key),
        })),
        (None, None) => Ok(None),
        _ => Err(AppError::Validation(
            "TENCENTCLOUD_SECRET_ID and TENCENTCLOUD_SECRET_KEY must be set together".to_owned(),
        )),
    }
}

fn seconds_env(name: &str, default: u64) -> Result<u64, AppError> {
    match optional_non_empty_env(name) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        None => Ok(default),
    }
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    optional_non_empty_env(name)
        .ok_or_else(|| AppError::Validation(format!("{name} is required and cannot be empty")))
}
