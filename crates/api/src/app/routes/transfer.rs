use axum::{extract::rejection::JsonRejection, Json};

use crate::app::dto::TransferRequest;
use crate::app::errors::ApiError;

/// Validates the request, then reports that transfers are not available.
pub async fn transfer(body: Result<Json<TransferRequest>, JsonRejection>) -> Result<(), ApiError> {
    let Json(req) = body?;
    req.validate()?;
    tracing::info!(to_account = req.to_account, amount = req.amount, "transfer requested");
    Err(ApiError::NotImplemented("transfer is not implemented"))
}
