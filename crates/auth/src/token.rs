//! HS256 token issuing and validation.
//!
//! The secret and TTL come from an [`AuthConfig`] handed in at construction;
//! nothing here reads the environment. Validation pins the algorithm to
//! HS256 and evaluates expiry against the caller's clock, so a token is only
//! as good as its `exp` at the moment it is presented.

use chrono::{DateTime, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use uuid::Uuid;

use ledger_core::AccountNumber;

use crate::claims::{validate_claims, IdentityClaims, TokenValidationError};
use crate::config::AuthConfig;

/// Why a presented token was not accepted.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidToken {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not verify")]
    BadSignature,

    #[error("token uses an unexpected signing algorithm")]
    WrongAlgorithm,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token time window is invalid")]
    InvalidTimeWindow,
}

impl From<TokenValidationError> for InvalidToken {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => InvalidToken::Expired,
            TokenValidationError::NotYetValid => InvalidToken::NotYetValid,
            TokenValidationError::InvalidTimeWindow => InvalidToken::InvalidTimeWindow,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("invalid token: {0}")]
    Invalid(#[from] InvalidToken),
}

/// Issues tokens bound to an account number.
pub trait JwtIssuer: Send + Sync {
    fn issue(&self, account_number: AccountNumber, now: DateTime<Utc>) -> Result<String, TokenError>;
}

/// Verifies a presented token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, TokenError>;
}

/// Symmetric (HMAC-SHA256) issuer + validator sharing one secret.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl Hs256Jwt {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller-supplied clock in `validate`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.token_ttl,
        }
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

impl JwtIssuer for Hs256Jwt {
    fn issue(&self, account_number: AccountNumber, now: DateTime<Utc>) -> Result<String, TokenError> {
        // `iat`/`exp` travel as whole seconds; anchor the window there so the
        // decoded expiry is exactly `iat + ttl`.
        let now = now.trunc_subsecs(0);
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token expiry overflows".to_string()))?;

        let claims = IdentityClaims {
            account_number,
            issued_at: now,
            expires_at,
            token_id: Uuid::now_v7(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, TokenError> {
        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                let reason = classify(e.kind());
                tracing::debug!(error = %e, %reason, "token rejected during decode");
                reason
            })?;

        validate_claims(&data.claims, now).map_err(InvalidToken::from)?;
        Ok(data.claims)
    }
}

fn classify(kind: &ErrorKind) -> InvalidToken {
    match kind {
        ErrorKind::InvalidSignature => InvalidToken::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName | ErrorKind::MissingAlgorithm => {
            InvalidToken::WrongAlgorithm
        }
        ErrorKind::ExpiredSignature => InvalidToken::Expired,
        ErrorKind::ImmatureSignature => InvalidToken::NotYetValid,
        _ => InvalidToken::Malformed,
    }
}
