//! Handlers for request responses (the at-most-one formal resolution
//! record on a request).

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::file::FileInfo;
use helpdesk_db::models::response::{CreateResponse, ResponseView, UpdateResponse};
use helpdesk_db::repositories::{RequestRepo, ResponseRepo, StatusRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::{collect, FormData};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// View plus the resolved attachment reference.
#[derive(Debug, Serialize)]
pub struct ResponseWithFile {
    #[serde(flatten)]
    pub response: ResponseView,
    pub file: Option<FileInfo>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Response",
        id,
    })
}

struct ResponseForm {
    text: String,
    request_id: DbId,
    status_id: DbId,
    user_id: DbId,
    form: FormData,
}

async fn parse_response_form(multipart: Multipart) -> AppResult<ResponseForm> {
    let form = collect(multipart, "file").await?;
    Ok(ResponseForm {
        text: form.required("text")?.to_string(),
        request_id: form.required_id("requestId")?,
        status_id: form.required_id("statusId")?,
        user_id: form.required_id("userId")?,
        form,
    })
}

/// GET /responses
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let responses = ResponseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: responses }))
}

/// GET /responses/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let response = ResponseRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /responses  (multipart)
///
/// Create the response for a request. A response on a still-New request
/// settles it to Completed in the same transaction.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = parse_response_form(multipart).await?;

    RequestRepo::find_by_id(&state.pool, form.request_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id: form.request_id,
        }))?;

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

    let created = ResponseRepo::create(
        &state.pool,
        &CreateResponse {
            text: form.text,
            request_id: form.request_id,
            status_id: form.status_id,
            user_id: form.user_id,
            file_id,
        },
    )
    .await?;

    // Defensive re-read through the display projection.
    let view = ResponseRepo::find_view(&state.pool, created.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("Response could not be retrieved after save.".to_string())
        })?;

    let file = match created.file_id {
        Some(file_id) => state.storage.fetch(&state.pool, file_id).await.ok(),
        None => None,
    };

    tracing::info!(
        user_id = auth.user_id,
        response_id = created.id,
        request_id = created.request_id,
        "Response created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ResponseWithFile {
                response: view,
                file,
            },
        }),
    ))
}

/// PUT /responses/{id}  (multipart)
///
/// Diffed update; a new attachment supersedes the old one best-effort.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = parse_response_form(multipart).await?;

    let existing = ResponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let modified = existing.user_id != form.user_id
        || existing.request_id != form.request_id
        || existing.status_id != form.status_id
        || existing.text != form.text
        || form.form.file.is_some();

    if !modified {
        tracing::info!(response_id = id, "No changes detected for response");
        let view = ResponseRepo::find_view(&state.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        return Ok(Json(DataResponse { data: view }));
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

    ResponseRepo::update(
        &state.pool,
        id,
        &UpdateResponse {
            text: form.text,
            request_id: form.request_id,
            status_id: form.status_id,
            user_id: form.user_id,
            file_id,
        },
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = auth.user_id, response_id = id, "Response updated");

    let view = ResponseRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /responses/{id}/status/{new_status_id}
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, new_status_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    // The response must exist before the status id is validated, so a
    // missing row surfaces as 404 rather than 400.
    ResponseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !StatusRepo::response_status_exists(&state.pool, new_status_id).await? {
        return Err(AppError::Core(CoreError::BadRequest(format!(
            "Status with ID {new_status_id} does not exist."
        ))));
    }

    ResponseRepo::update_status(&state.pool, id, new_status_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        response_id = id,
        new_status_id,
        "Response status changed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /responses/{id}
///
/// Soft-delete the response; its attachment blob and metadata go with it.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let file_id = ResponseRepo::soft_delete(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if let Some(file_id) = file_id {
        state.storage.delete_superseded(&state.pool, file_id).await;
    }

    tracing::info!(user_id = auth.user_id, response_id = id, "Response deleted");
    Ok(StatusCode::NO_CONTENT)
}
