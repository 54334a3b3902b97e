//! Route definitions for the reference tables.

use axum::routing::get;
use axum::Router;

use crate::handlers::lookups;
use crate::state::AppState;

/// ```text
/// GET/POST        /categories          -> list, create
/// PUT/DELETE      /categories/{id}     -> update, delete
/// GET/POST        /priorities          -> list, create
/// PUT/DELETE      /priorities/{id}     -> update, delete
/// GET/POST        /request-types       -> list, create
/// PUT/DELETE      /request-types/{id}  -> update, delete
/// GET             /request-statuses    -> list
/// GET             /response-statuses   -> list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(lookups::list_categories).post(lookups::create_category),
        )
        .route(
            "/categories/{id}",
            axum::routing::put(lookups::update_category).delete(lookups::delete_category),
        )
        .route(
            "/priorities",
            get(lookups::list_priorities).post(lookups::create_priority),
        )
        .route(
            "/priorities/{id}",
            axum::routing::put(lookups::update_priority).delete(lookups::delete_priority),
        )
        .route(
            "/request-types",
            get(lookups::list_request_types).post(lookups::create_request_type),
        )
        .route(
            "/request-types/{id}",
            axum::routing::put(lookups::update_request_type).delete(lookups::delete_request_type),
        )
        .route("/request-statuses", get(lookups::list_request_statuses))
        .route("/response-statuses", get(lookups::list_response_statuses))
}
