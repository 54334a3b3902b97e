//! Handlers for the reference tables: categories, priorities, request
//! types, and the read-only status lists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::lookup::{CreateCategory, CreatePriority, CreateRequestType};
use helpdesk_db::repositories::{CategoryRepo, PriorityRepo, RequestTypeRepo, StatusRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Categories
-------------------------------------------------------------------------- */

/// GET /categories
pub async fn list_categories(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /categories
pub async fn create_category(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::create(&state.pool, &input).await?;
    tracing::info!(actor = auth.user_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /categories/{id}
pub async fn update_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /categories/{id}
pub async fn delete_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !CategoryRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Category",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Priorities
-------------------------------------------------------------------------- */

/// GET /priorities
pub async fn list_priorities(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let priorities = PriorityRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: priorities }))
}

/// POST /priorities
pub async fn create_priority(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePriority>,
) -> AppResult<impl IntoResponse> {
    let priority = PriorityRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: priority })))
}

/// PUT /priorities/{id}
pub async fn update_priority(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePriority>,
) -> AppResult<impl IntoResponse> {
    let priority = PriorityRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Priority",
            id,
        }))?;
    Ok(Json(DataResponse { data: priority }))
}

/// DELETE /priorities/{id}
pub async fn delete_priority(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !PriorityRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Priority",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Request types
-------------------------------------------------------------------------- */

/// GET /request-types
pub async fn list_request_types(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let types = RequestTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: types }))
}

/// POST /request-types
pub async fn create_request_type(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequestType>,
) -> AppResult<impl IntoResponse> {
    let request_type = RequestTypeRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request_type })))
}

/// PUT /request-types/{id}
pub async fn update_request_type(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateRequestType>,
) -> AppResult<impl IntoResponse> {
    let request_type = RequestTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "RequestType",
            id,
        }))?;
    Ok(Json(DataResponse { data: request_type }))
}

/// DELETE /request-types/{id}
pub async fn delete_request_type(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !RequestTypeRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "RequestType",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Statuses (read-only seed tables)
-------------------------------------------------------------------------- */

/// GET /request-statuses
pub async fn list_request_statuses(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let statuses = StatusRepo::list_request_statuses(&state.pool).await?;
    Ok(Json(DataResponse { data: statuses }))
}

/// GET /response-statuses
pub async fn list_response_statuses(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let statuses = StatusRepo::list_response_statuses(&state.pool).await?;
    Ok(Json(DataResponse { data: statuses }))
}
