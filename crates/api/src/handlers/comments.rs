//! Handlers for request comments. Comments are append-only threaded notes,
//! distinct from the formal response.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::comment::{CommentView, CreateComment};
use helpdesk_db::models::file::FileInfo;
use helpdesk_db::repositories::{CommentRepo, RequestRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::multipart::collect;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// View plus the resolved attachment reference.
#[derive(Debug, Serialize)]
pub struct CommentWithAttachment {
    #[serde(flatten)]
    pub comment: CommentView,
    pub attachment: Option<FileInfo>,
}

/// GET /requests/{id}/comments
///
/// A request's comments, newest first.
pub async fn list_by_request(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let comments = CommentRepo::list_by_request(&state.pool, request_id).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /comments  (multipart)
///
/// Add a comment, attributed to the authenticated user. An attachment is
/// uploaded before the row is written.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = collect(multipart, "file").await?;
    let text = form.required("text")?.to_string();
    let request_id = form.required_id("requestId")?;

    RequestRepo::find_by_id(&state.pool, request_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Request",
            id: request_id,
        }))?;

    let attachment_id = match &form.file {
        Some(upload) => {
            let stored = state
                .storage
                .upload(&state.pool, &upload.file_name, &upload.content_type, &upload.bytes)
                .await?;
            Some(stored.id)
        }
        None => None,
    };

    let created = CommentRepo::create(
        &state.pool,
        &CreateComment {
            text,
            request_id,
            user_id: auth.user_id,
            attachment_id,
        },
    )
    .await?;

    // Defensive re-read: the comment must come back through the list path.
    let view = CommentRepo::list_by_request(&state.pool, request_id)
        .await?
        .into_iter()
        .find(|c| c.id == created.id)
        .ok_or_else(|| {
            AppError::InternalError("Comment could not be retrieved after creation.".to_string())
        })?;

    let attachment = match created.attachment_id {
        Some(file_id) => state.storage.fetch(&state.pool, file_id).await.ok(),
        None => None,
    };

    tracing::info!(
        user_id = auth.user_id,
        comment_id = created.id,
        request_id,
        "Comment added"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CommentWithAttachment {
                comment: view,
                attachment,
            },
        }),
    ))
}
