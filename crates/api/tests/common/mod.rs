//! Shared helpers for API integration tests.
//!
//! Mirrors the router construction in `main.rs` so tests exercise the same
//! middleware stack (CORS, request ID, timeout, tracing, panic recovery)
//! that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use helpdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use helpdesk_api::config::ServerConfig;
use helpdesk_api::mailer::Mailer;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_api::storage::Storage;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router against the given pool. Attachments
/// land in a per-run temp directory; email is disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let uploads = std::env::temp_dir().join(format!("helpdesk-test-{}", uuid::Uuid::new_v4()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(Storage::new(uploads)),
        mailer: Arc::new(Mailer::disabled()),
    };

    build_app_router(state, &config)
}

/// A bearer token accepted by the test app. The subject does not need a
/// user row; the extractor only validates the signature and expiry.
pub fn auth_token() -> String {
    generate_access_token(1, "Admin", &test_config().jwt).expect("token generation")
}

/// GET without authentication.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// GET with a bearer token.
pub async fn get_auth(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a JSON body with the given method; bearer token optional.
pub async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    authed: bool,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if authed {
        builder = builder.header("authorization", format!("Bearer {}", auth_token()));
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Send a multipart form of plain text fields with a bearer token.
pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
) -> Response {
    const BOUNDARY: &str = "helpdesk-test-boundary";

    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// DELETE with a bearer token.
pub async fn delete_auth(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// PUT with a bearer token and empty body (status/take endpoints).
pub async fn put_auth(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header("authorization", format!("Bearer {}", auth_token()))
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
