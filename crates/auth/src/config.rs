//! Signing configuration, injected into the token issuer/validator at
//! construction.

use chrono::Duration;
use thiserror::Error;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Longest lifetime a token may be configured with (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const JWT_TTL_VAR: &str = "JWT_TTL_SECS";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            reason: reason.into(),
        }
    }
}

/// Symmetric HMAC secret. Never empty; never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::invalid(JWT_SECRET_VAR, "secret must not be empty"));
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: SigningSecret,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: SigningSecret, token_ttl: Duration) -> Result<Self, ConfigError> {
        if token_ttl <= Duration::zero() {
            return Err(ConfigError::invalid(JWT_TTL_VAR, "ttl must be positive"));
        }
        if token_ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
            return Err(ConfigError::invalid(
                JWT_TTL_VAR,
                format!("ttl must be at most {MAX_TOKEN_TTL_SECS} seconds"),
            ));
        }
        Ok(Self { secret, token_ttl })
    }

    /// Load from the process environment.
    ///
    /// `JWT_SECRET` is required. `JWT_TTL_SECS` defaults to
    /// [`DEFAULT_TOKEN_TTL_SECS`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup (the environment in production, a
    /// map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_VAR)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_VAR))?;

        let ttl_secs = match lookup(JWT_TTL_VAR) {
            None => DEFAULT_TOKEN_TTL_SECS,
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| ConfigError::invalid(JWT_TTL_VAR, e.to_string()))?,
        };

        let token_ttl =
            Duration::try_seconds(ttl_secs).ok_or_else(|| ConfigError::invalid(JWT_TTL_VAR, "out of range"))?;

        Self::new(SigningSecret::new(secret)?, token_ttl)
    }
}
