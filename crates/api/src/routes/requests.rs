//! Route definitions for the `/requests` resource and its nested comment,
//! history, and comment-count endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{comments, history, requests};
use crate::state::AppState;

/// ```text
/// GET    /requests                           -> list
/// POST   /requests                           -> create (multipart)
/// GET    /requests/filter                    -> get_filtered
/// GET    /requests/category/{category_id}    -> list_by_category
/// GET    /requests/{id}                      -> get_by_id
/// PUT    /requests/{id}                      -> update (multipart)
/// DELETE /requests/{id}                      -> delete
/// GET    /requests/{id}/detail               -> get_detail
/// GET    /requests/{id}/section/{section}    -> get_by_section
/// PUT    /requests/{id}/status/{status_id}   -> change_status
/// PUT    /requests/{id}/take/{executor_id}   -> take
/// GET    /requests/{id}/comments             -> comments::list_by_request
/// GET    /requests/{id}/history              -> history::list_by_request
/// GET    /requests/{id}/comment-count        -> comment_count
///
/// POST   /comments                           -> comments::create (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/requests", get(requests::list).post(requests::create))
        .route("/requests/filter", get(requests::get_filtered))
        .route(
            "/requests/category/{category_id}",
            get(requests::list_by_category),
        )
        .route(
            "/requests/{id}",
            get(requests::get_by_id)
                .put(requests::update)
                .delete(requests::delete),
        )
        .route("/requests/{id}/detail", get(requests::get_detail))
        .route(
            "/requests/{id}/section/{section}",
            get(requests::get_by_section),
        )
        .route(
            "/requests/{id}/status/{status_id}",
            put(requests::change_status),
        )
        .route(
            "/requests/{id}/take/{executor_id}",
            put(requests::take),
        )
        .route("/requests/{id}/comments", get(comments::list_by_request))
        .route("/requests/{id}/history", get(history::list_by_request))
        .route("/requests/{id}/comment-count", get(requests::comment_count))
        .route("/comments", post(comments::create))
}
