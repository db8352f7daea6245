//! `ledger-auth`: identity tokens and the resource-binding check.
//!
//! No HTTP and no storage here: this crate signs and
//! verifies claims, and decides whether verified claims own a given account
//! number. Fetching that account is the caller's job.

pub mod authorize;
pub mod claims;
pub mod config;
pub mod token;

pub use authorize::{authorize_account_access, AuthzError};
pub use claims::{validate_claims, IdentityClaims, TokenValidationError};
pub use config::{AuthConfig, ConfigError, SigningSecret, DEFAULT_TOKEN_TTL_SECS, MAX_TOKEN_TTL_SECS};
pub use token::{Hs256Jwt, InvalidToken, JwtIssuer, JwtValidator, TokenError};
