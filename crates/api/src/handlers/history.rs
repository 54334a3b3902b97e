//! Handler for the request audit history.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use helpdesk_core::types::DbId;
use helpdesk_db::repositories::HistoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /requests/{id}/history
///
/// A request's audit trail, newest first.
pub async fn list_by_request(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let history = HistoryRepo::list_by_request(&state.pool, request_id).await?;
    Ok(Json(DataResponse { data: history }))
}
