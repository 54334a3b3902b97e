pub mod auth;
pub mod files;
pub mod health;
pub mod lookups;
pub mod reports;
pub mod requests;
pub mod responses;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/refresh                       refresh (public)
/// /auth/renew-password                renew password (requires auth)
///
/// /requests                           list, create (multipart)
/// /requests/filter                    filtered listing with status counts
/// /requests/category/{category_id}    list by category
/// /requests/{id}                      get, update (multipart), delete
/// /requests/{id}/detail               detail with response + attachment
/// /requests/{id}/section/{section}    section-scoped detail
/// /requests/{id}/status/{status_id}   change status (PUT)
/// /requests/{id}/take/{executor_id}   claim for executor (PUT)
/// /requests/{id}/comments             list comments
/// /requests/{id}/history              audit history
/// /requests/{id}/comment-count        comment count
///
/// /responses                          list, create (multipart)
/// /responses/{id}                     get, update (multipart), delete
/// /responses/{id}/status/{status_id}  change status (PUT)
///
/// /comments                           create (multipart)
///
/// /reports                            list, create
/// /reports/filter                     filtered listing
/// /reports/by-request/{request_id}    most recent report for a request
/// /reports/{id}                       get
///
/// /users                              list, create
/// /users/{id}                         get, update, delete
///
/// /categories, /priorities, /request-types   reference CRUD
/// /request-statuses, /response-statuses      read-only status lists
///
/// /files                              upload (multipart)
/// /files/{id}                         metadata, delete
/// /files/{id}/download                bytes
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(requests::router())
        .merge(responses::router())
        .merge(reports::router())
        .merge(users::router())
        .merge(lookups::router())
        .merge(files::router())
}
