//! Route definitions for the `/responses` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::responses;
use crate::state::AppState;

/// ```text
/// GET    /responses                           -> list
/// POST   /responses                           -> create (multipart)
/// GET    /responses/{id}                      -> get_by_id
/// PUT    /responses/{id}                      -> update (multipart)
/// DELETE /responses/{id}                      -> delete
/// PUT    /responses/{id}/status/{status_id}   -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/responses", get(responses::list).post(responses::create))
        .route(
            "/responses/{id}",
            get(responses::get_by_id)
                .put(responses::update)
                .delete(responses::delete),
        )
        .route(
            "/responses/{id}/status/{status_id}",
            put(responses::change_status),
        )
}
