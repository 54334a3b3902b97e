//! Handlers for the request lifecycle: creation, updates, status
//! transitions, executor claiming, deletion, and the filtered listing.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::json;

use helpdesk_core::error::CoreError;
use helpdesk_core::status::HISTORY_ACTION_STATUS_CHANGED;
use helpdesk_core::types::DbId;
use helpdesk_db::models::comment::CommentView;
use helpdesk_db::models::file::FileInfo;
use helpdesk_db::models::history::HistoryView;
use helpdesk_db::models::request::{
    ClaimOutcome, CreateRequest, RequestDetail, RequestSection, RequestSummary, UpdateRequest,
};
use helpdesk_db::models::response::ResponseView;
use helpdesk_db::repositories::{
    CommentRepo, FileRepo, HistoryRepo, RequestRepo, ResponseRepo, StatusRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::{collect, FormData};
use crate::middleware::auth::AuthUser;
use crate::query::RequestFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// History description recorded when a request is created.
const CREATED_DESCRIPTION: &str = "new request created";

/* --------------------------------------------------------------------------
Response shapes
-------------------------------------------------------------------------- */

/// Summary plus the resolved attachment reference.
#[derive(Debug, Serialize)]
pub struct RequestWithFile {
    #[serde(flatten)]
    pub request: RequestSummary,
    pub file: Option<FileInfo>,
}

/// Detail plus its satellite data, hydrated per section tag.
#[derive(Debug, Serialize)]
pub struct RequestSectionView {
    #[serde(flatten)]
    pub request: RequestDetail,
    pub file: Option<FileInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Option<ResponseView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryView>>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Request",
        id,
    })
}

/// Resolve the attachment reference for a request, tolerating a missing
/// metadata row (the reference is display data, not a contract).
async fn resolve_file(state: &AppState, file_id: Option<DbId>) -> Option<FileInfo> {
    let id = file_id?;
    match state.storage.fetch(&state.pool, id).await {
        Ok(info) => Some(info),
        Err(_) => None,
    }
}

/// Parse the request multipart form into its typed fields.
struct RequestForm {
    header: String,
    text: String,
    user_id: DbId,
    category_id: DbId,
    priority_id: DbId,
    type_id: DbId,
    form: FormData,
}

async fn parse_request_form(multipart: Multipart) -> AppResult<RequestForm> {
    let form = collect(multipart, "file").await?;
    Ok(RequestForm {
        header: form.required("header")?.to_string(),
        text: form.required("text")?.to_string(),
        user_id: form.required_id("userId")?,
        category_id: form.required_id("categoryId")?,
        priority_id: form.required_id("priorityId")?,
        type_id: form.required_id("typeId")?,
        form,
    })
}

/* --------------------------------------------------------------------------
Read handlers
-------------------------------------------------------------------------- */

/// GET /requests
///
/// List all active requests, newest first.
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let requests = RequestRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /requests/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = RequestRepo::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: request }))
}

/// GET /requests/category/{category_id}
pub async fn list_by_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(category_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let requests = RequestRepo::list_by_category(&state.pool, category_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /requests/{id}/detail
///
/// Request detail with its response and attachment resolved.
pub async fn get_detail(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = RequestRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let response = ResponseRepo::find_by_request_id(&state.pool, id).await?;
    let file = resolve_file(&state, detail.file_id).await;

    Ok(Json(DataResponse {
        data: RequestSectionView {
            request: detail,
            file,
            response: Some(response),
            comments: None,
            history: None,
        },
    }))
}

/// GET /requests/{id}/section/{section}
///
/// Section-scoped detail; the tag picks which satellite data to hydrate.
pub async fn get_by_section(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((id, section)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let section = RequestSection::parse(&section);

    let detail = RequestRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let file = resolve_file(&state, detail.file_id).await;

    let response = if section.includes_response() {
        Some(ResponseRepo::find_by_request_id(&state.pool, id).await?)
    } else {
        None
    };
    let comments = if section.includes_comments() {
        Some(CommentRepo::list_by_request(&state.pool, id).await?)
    } else {
        None
    };
    let history = if section.includes_history() {
        Some(HistoryRepo::list_by_request(&state.pool, id).await?)
    } else {
        None
    };

    Ok(Json(DataResponse {
        data: RequestSectionView {
            request: detail,
            file,
            response,
            comments,
            history,
        },
    }))
}

/// GET /requests/filter
///
/// Filtered, sorted, paginated listing with the per-status breakdown.
pub async fn get_filtered(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RequestFilterParams>,
) -> AppResult<impl IntoResponse> {
    let page = RequestRepo::get_filtered(&state.pool, &params.into()).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /requests/{id}/comment-count
pub async fn comment_count(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let count = RequestRepo::comment_count(&state.pool, id).await?;
    Ok(Json(json!({ "count": count })))
}

/* --------------------------------------------------------------------------
Write handlers
-------------------------------------------------------------------------- */

/// POST /requests  (multipart)
///
/// Create a request. An attachment, when present, is uploaded before the
/// row is written so the file id lands on the insert.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = parse_request_form(multipart).await?;

    let file_id = match &form.form.file {
        Some(upload) => {
            let stored = state
                .storage
                .upload(&state.pool, &upload.file_name, &upload.content_type, &upload.bytes)
                .await?;
            Some(stored.id)
        }
        None => None,
    };

    let created = RequestRepo::create(
        &state.pool,
        &CreateRequest {
            header: form.header,
            text: form.text,
            user_id: form.user_id,
            category_id: form.category_id,
            priority_id: form.priority_id,
            type_id: form.type_id,
            file_id,
        },
    )
    .await?;

    // Defensive re-read: the row must be visible through the read path.
    let summary = RequestRepo::find_summary(&state.pool, created.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Request could not be retrieved after save.".to_string())
        })?;

    let file = resolve_file(&state, created.file_id).await;

    HistoryRepo::append(
        &state.pool,
        created.id,
        created.user_id,
        HISTORY_ACTION_STATUS_CHANGED,
        CREATED_DESCRIPTION,
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        request_id = created.id,
        "Request created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RequestWithFile {
                request: summary,
                file,
            },
        }),
    ))
}

/// PUT /requests/{id}  (multipart)
///
/// Field-level diffed update. A no-op form (nothing changed, no new file)
/// returns the current row untouched. A new attachment supersedes the old
/// one: the old blob is removed best-effort before the new upload.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = parse_request_form(multipart).await?;

    let existing = RequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let modified = existing.user_id != form.user_id
        || existing.category_id != form.category_id
        || existing.priority_id != form.priority_id
        || existing.type_id != form.type_id
        || existing.header != form.header
        || existing.text != form.text
        || form.form.file.is_some();

    if !modified {
        tracing::info!(request_id = id, "No changes detected for request");
        let summary = RequestRepo::find_summary(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        return Ok(Json(DataResponse { data: summary }));
    }

    let file_id = match &form.form.file {
        Some(upload) => {
            if let Some(old_file_id) = existing.file_id {
                state.storage.delete_superseded(&state.pool, old_file_id).await;
            }
            let stored = state
                .storage
                .upload(&state.pool, &upload.file_name, &upload.content_type, &upload.bytes)
                .await?;
            Some(stored.id)
        }
        None => existing.file_id,
    };

    RequestRepo::update(
        &state.pool,
        id,
        &UpdateRequest {
            header: form.header,
            text: form.text,
            user_id: form.user_id,
            category_id: form.category_id,
            priority_id: form.priority_id,
            type_id: form.type_id,
            file_id,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = auth.user_id, request_id = id, "Request updated");

    let summary = RequestRepo::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /requests/{id}
///
/// Soft-delete the request and its response; the attachment metadata is
/// retired too. Comments and history survive for audit.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let cascade = RequestRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(file_id) = cascade.file_id {
        FileRepo::soft_delete(&state.pool, file_id).await?;
        tracing::info!(file_id, "Attachment metadata marked deleted");
    }

    tracing::info!(user_id = auth.user_id, request_id = id, "Request deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /requests/{id}/status/{new_status_id}
///
/// Transition the request's status. Closing (6) also closes the linked
/// report when one exists. Exactly one history row is appended.
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, new_status_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    if !StatusRepo::request_status_exists(&state.pool, new_status_id).await? {
        return Err(AppError::Core(CoreError::BadRequest(format!(
            "Status with ID {new_status_id} does not exist."
        ))));
    }

    let label = RequestRepo::change_status(&state.pool, id, new_status_id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(
        user_id = auth.user_id,
        request_id = id,
        new_status_id,
        action = label,
        "Request status changed"
    );
    Ok(Json(json!({ "message": "Status changed", "action": label })))
}

/// PUT /requests/{id}/take/{executor_id}
///
/// Claim a request for an executor. First claim wins; the conditional
/// update makes concurrent claims race-free.
pub async fn take(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, executor_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    match RequestRepo::claim(&state.pool, id, executor_id).await? {
        ClaimOutcome::Claimed => {
            tracing::info!(
                user_id = auth.user_id,
                request_id = id,
                executor_id,
                "Request taken"
            );
            Ok(Json(json!({ "message": "Request successfully taken" })))
        }
        ClaimOutcome::AlreadyTaken => Err(AppError::Core(CoreError::BadRequest(
            "This request is already taken by another user".to_string(),
        ))),
        ClaimOutcome::NotFound => Err(not_found(id)),
    }
}
