//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /auth/register        -> register
/// POST /auth/login           -> login
/// POST /auth/refresh         -> refresh
/// POST /auth/renew-password  -> renew_password (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/renew-password", post(auth::renew_password))
}
