//! Handlers for operational reports.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::report::CreateReport;
use helpdesk_db::repositories::ReportRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ReportFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /reports
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let reports = ReportRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /reports/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_summary(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /reports/by-request/{request_id}
///
/// The most recent report linked to a request. `data: null` means "no
/// report yet" -- callers rely on that being distinct from failure.
pub async fn get_by_request(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = ReportRepo::find_by_request_id(&state.pool, request_id).await?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /reports
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateReport>,
) -> AppResult<impl IntoResponse> {
    let created = ReportRepo::create(&state.pool, &input).await?;

    // Defensive re-read through the display projection.
    let summary = ReportRepo::find_summary(&state.pool, created.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Report could not be retrieved after save.".to_string())
        })?;

    tracing::info!(user_id = auth.user_id, report_id = created.id, "Report created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: summary })))
}

/// GET /reports/filter
pub async fn get_filtered(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ReportFilterParams>,
) -> AppResult<impl IntoResponse> {
    let page = ReportRepo::get_filtered(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: page }))
}
