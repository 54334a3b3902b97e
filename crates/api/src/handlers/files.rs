//! Handlers for attachment upload, metadata, download, and deletion.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use helpdesk_core::types::DbId;
use helpdesk_db::models::file::FileInfo;

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::collect;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::Storage;

/// POST /files  (multipart, single `file` part)
pub async fn upload(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = collect(multipart, "file").await?;
    let upload = form
        .file
        .ok_or_else(|| AppError::BadRequest("Missing file part".to_string()))?;

    let stored = state
        .storage
        .upload(&state.pool, &upload.file_name, &upload.content_type, &upload.bytes)
        .await?;

    tracing::info!(user_id = auth.user_id, file_id = stored.id, "File uploaded via API");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: FileInfo {
                id: stored.id,
                file_name: stored.file_name,
                url: Storage::public_url(stored.id),
            },
        }),
    ))
}

/// GET /files/{id}
///
/// Attachment metadata (name + download URL).
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let info = state.storage.fetch(&state.pool, id).await?;
    Ok(Json(DataResponse { data: info }))
}

/// GET /files/{id}/download
///
/// The attachment bytes with its original name and content type.
pub async fn download(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (file, bytes) = state.storage.download(&state.pool, id).await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    Ok((headers, bytes))
}

/// DELETE /files/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.storage.delete(&state.pool, id).await?;
    tracing::info!(user_id = auth.user_id, file_id = id, "File deleted via API");
    Ok(StatusCode::NO_CONTENT)
}
