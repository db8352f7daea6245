//! Request/response bodies. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use ledger_core::{Account, AccountId};

use crate::app::errors::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,
    pub last_name: String,
}

/// A freshly opened account together with the token that grants access to it.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAccountResponse {
    pub account: Account,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_account: i64,
    pub amount: i64,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount <= 0 {
            return Err(ApiError::validation("amount must be positive"));
        }
        if self.to_account <= 0 {
            return Err(ApiError::validation("toAccount must be a valid account number"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DeletedResponse {
    pub deleted: AccountId,
}
