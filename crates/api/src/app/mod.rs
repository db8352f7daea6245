//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store/token wiring and account opening
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(services: AppServices) -> Router {
    routes::router(services.gate()).layer(Extension(services))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use ledger_auth::{AuthConfig, SigningSecret};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::gate::TOKEN_HEADER;

    fn app() -> Router {
        let auth = AuthConfig::new(SigningSecret::new("router-secret").unwrap(), chrono::Duration::minutes(5)).unwrap();
        build_app(AppServices::in_memory(&auth))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(TOKEN_HEADER, token);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn health_is_public() {
        let (status, _) = send(&app(), request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn create_then_fetch_with_token() {
        let app = app();
        let (status, created) = send(
            &app,
            request(Method::POST, "/account", None, Some(json!({"firstName": "Ann", "lastName": "Lee"}))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let id = created["account"]["id"].as_i64().unwrap();
        let token = created["token"].as_str().unwrap();

        let (status, fetched) = send(&app, request(Method::GET, &format!("/account/{id}"), Some(token), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created["account"]);
        assert_eq!(fetched["firstName"], "Ann");
        assert_eq!(fetched["balance"], 0);
    }

    #[tokio::test]
    async fn gated_route_without_token_is_forbidden() {
        let (status, body) = send(&app(), request(Method::GET, "/account/1", None, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"error": "access denied"}));
    }

    #[tokio::test]
    async fn non_numeric_id_is_forbidden_not_bad_request() {
        let app = app();
        let (_, created) = send(
            &app,
            request(Method::POST, "/account", None, Some(json!({"firstName": "Ann", "lastName": "Lee"}))),
        )
        .await;
        let token = created["token"].as_str().unwrap();

        let (status, body) = send(&app, request(Method::GET, "/account/abc", Some(token), None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"error": "access denied"}));
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let (status, body) = send(
            &app(),
            request(Method::POST, "/account", None, Some(json!({"firstName": "", "lastName": "Lee"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("firstName"));
    }

    #[tokio::test]
    async fn transfer_validates_then_reports_not_implemented() {
        let app = app();
        let (status, _) = send(
            &app,
            request(Method::POST, "/transfer", None, Some(json!({"toAccount": 123456789, "amount": 0}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            request(Method::POST, "/transfer", None, Some(json!({"toAccount": 123456789, "amount": 5}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body, json!({"error": "transfer is not implemented"}));
    }
}
