//! Authorization gate for account-addressed routes.
//!
//! Evaluation is a chain that stops at the first failure:
//! extract token -> verify -> parse path id -> load account -> bind.
//! Every failure becomes the same [`Denied`]; the specific [`DenialReason`]
//! is logged for operators and never rendered to the caller.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use thiserror::Error;

use ledger_auth::{authorize_account_access, JwtValidator};
use ledger_core::{Account, AccountId};
use ledger_infra::{AccountStore, StoreError};

use crate::app::errors;

/// Header carrying the identity token on protected routes.
pub const TOKEN_HEADER: &str = "x-jwt-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingToken,
    InvalidToken,
    InvalidResourceId,
    ResourceNotFound,
    StoreUnavailable,
    StoreTimeout,
    SubjectMismatch,
}

/// Uniform authorization failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("access denied")]
pub struct Denied {
    reason: DenialReason,
}

impl Denied {
    pub fn reason(&self) -> DenialReason {
        self.reason
    }
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        errors::access_denied()
    }
}

fn deny(reason: DenialReason, detail: impl core::fmt::Display) -> Denied {
    tracing::warn!(?reason, %detail, "access denied");
    Denied { reason }
}

/// Read the token header. Missing, non-UTF-8 and blank values all count as absent.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[derive(Clone)]
pub struct AccessGate {
    validator: Arc<dyn JwtValidator>,
    store: Arc<dyn AccountStore>,
    store_timeout: Duration,
}

impl AccessGate {
    pub fn new(validator: Arc<dyn JwtValidator>, store: Arc<dyn AccountStore>, store_timeout: Duration) -> Self {
        Self {
            validator,
            store,
            store_timeout,
        }
    }

    /// Decide whether `token` may act on the account addressed by `raw_id`.
    ///
    /// On success returns the resolved account so the handler does not need
    /// a second lookup.
    pub async fn evaluate(&self, token: Option<&str>, raw_id: &str, now: DateTime<Utc>) -> Result<Account, Denied> {
        let token = token.ok_or_else(|| deny(DenialReason::MissingToken, "no token header"))?;

        let claims = self
            .validator
            .validate(token, now)
            .map_err(|e| deny(DenialReason::InvalidToken, e))?;

        let id: AccountId = raw_id
            .parse()
            .map_err(|e| deny(DenialReason::InvalidResourceId, e))?;

        let account = match tokio::time::timeout(self.store_timeout, self.store.get_account_by_id(id)).await {
            Ok(Ok(account)) => account,
            Ok(Err(e @ StoreError::NotFound(_))) => return Err(deny(DenialReason::ResourceNotFound, e)),
            Ok(Err(e)) => return Err(deny(DenialReason::StoreUnavailable, e)),
            Err(_) => {
                return Err(deny(
                    DenialReason::StoreTimeout,
                    format_args!("account {id} lookup exceeded {:?}", self.store_timeout),
                ));
            }
        };

        authorize_account_access(&claims, account.number()).map_err(|e| deny(DenialReason::SubjectMismatch, e))?;

        tracing::debug!(account_id = %account.id(), "access granted");
        Ok(account)
    }
}
