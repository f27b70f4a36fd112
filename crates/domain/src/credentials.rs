//! Provider access keys held by callers and by camgate itself.

use camgate_core::{AppResult, NonEmptyString};
use secrecy::{ExposeSecret, SecretString};

/// Access key a request is signed with.
#[derive(Debug, Clone)]
pub struct AccessKey {
    secret_id: NonEmptyString,
    secret_key: SecretString,
    token: Option<SecretString>,
}

impl AccessKey {
    /// Creates a permanent access key.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> AppResult<Self> {
        let secret_key = NonEmptyString::new(secret_key)?;
        Ok(Self {
            secret_id: NonEmptyString::new(secret_id)?,
            secret_key: SecretString::new(secret_key.into()),
            token: None,
        })
    }

    /// Attaches a session token. An empty token is ignored.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::new);
        self
    }

    /// Returns the public key id.
    #[must_use]
    pub fn secret_id(&self) -> &str {
        self.secret_id.as_str()
    }

    /// Returns the signing key.
    #[must_use]
    pub fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Returns the session token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret().as_str())
    }
}

/// Raw caller credentials submitted for server-side verification.
#[derive(Debug, Clone)]
pub struct CallerCredentials {
    /// Caller's access key.
    pub access_key: AccessKey,
    /// Provider region the identity call is made in.
    pub region: NonEmptyString,
}

/// Operator-configured access key used for provider lookups.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    access_key: AccessKey,
}

impl ClientConfig {
    /// Creates a client configuration.
    pub fn new(secret_id: impl Into<String>, secret_key: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            access_key: AccessKey::new(secret_id, secret_key)?,
        })
    }

    /// Returns the configured access key.
    #[must_use]
    pub fn access_key(&self) -> &AccessKey {
        &self.access_key
    }
}
