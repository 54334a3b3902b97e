//! Route definitions for the `/files` attachment endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// ```text
/// POST   /files                -> upload (multipart)
/// GET    /files/{id}           -> get_by_id (metadata)
/// DELETE /files/{id}           -> delete
/// GET    /files/{id}/download  -> download (bytes)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/files", post(files::upload))
        .route(
            "/files/{id}",
            get(files::get_by_id).delete(files::delete),
        )
        .route("/files/{id}/download", get(files::download))
}
