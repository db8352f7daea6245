use axum::{
    extract::{rejection::PathRejection, Path, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::context::AccountContext;
use crate::gate::{extract_token, AccessGate};

/// Route layer for `/account/:id`: only the holder of a token bound to that
/// account's number gets through.
///
/// Install with `route_layer` so the `:id` path parameter is available.
pub async fn account_owner_gate(
    State(gate): State<AccessGate>,
    path: Result<Path<String>, PathRejection>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // A missing/unparseable path param is handled as an unparseable id.
    let raw_id = path.map(|Path(id)| id).unwrap_or_default();

    let token = extract_token(req.headers()).map(str::to_owned);

    match gate.evaluate(token.as_deref(), &raw_id, Utc::now()).await {
        Ok(account) => {
            req.extensions_mut().insert(AccountContext::new(account));
            next.run(req).await
        }
        Err(denied) => denied.into_response(),
    }
}
