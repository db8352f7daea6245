use axum::{routing::{get, post}, Router};

use crate::gate::AccessGate;

pub mod accounts;
pub mod system;
pub mod transfer;

/// Router for every endpoint. Only the `/account/:id` routes are gated.
pub fn router(gate: AccessGate) -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/transfer", post(transfer::transfer))
        .merge(accounts::router(gate))
}
