use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto::{CreateAccountRequest, DeletedResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::AccountContext;
use crate::gate::AccessGate;
use crate::middleware;

/// `/account` and `/account/:id`. The `:id` routes sit behind the access gate.
pub fn router(gate: AccessGate) -> Router {
    let owned = Router::new()
        .route("/account/:id", get(get_account).delete(delete_account))
        .route_layer(axum::middleware::from_fn_with_state(gate, middleware::account_owner_gate));

    Router::new()
        .route("/account", get(list_accounts).post(create_account))
        .merge(owned)
}

pub async fn list_accounts(Extension(services): Extension<AppServices>) -> Result<impl IntoResponse, ApiError> {
    let accounts = services.store.get_accounts().await?;
    Ok(Json(accounts))
}

pub async fn create_account(
    Extension(services): Extension<AppServices>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let opened = services.open_account(&body.first_name, &body.last_name).await?;
    Ok(Json(opened))
}

/// The gate already resolved the account; nothing left to look up.
pub async fn get_account(Extension(ctx): Extension<AccountContext>) -> impl IntoResponse {
    Json(ctx.into_account())
}

pub async fn delete_account(
    Extension(services): Extension<AppServices>,
    Extension(ctx): Extension<AccountContext>,
) -> Result<impl IntoResponse, ApiError> {
    let id = ctx.account_id();
    services.store.delete_account(id).await?;
    tracing::info!(account_id = %id, "account deleted");
    Ok(Json(DeletedResponse { deleted: id }))
}
