//! Handlers for user administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::user::{CreateUser, UpdateUser};
use helpdesk_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(length(min = 3))]
    pub username: String,
    pub position: Option<String>,
    pub department: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role_id: DbId,
}

/// GET /users
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /users/{id}
pub async fn get_by_id(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_profile(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /users
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|err| AppError::Core(CoreError::Validation(err.to_string())))?;

    if UserRepo::email_exists(&state.pool, &input.email).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Email '{}' is already in use.",
            input.email
        ))));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|err| AppError::InternalError(format!("Password hashing failed: {err}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            surname: input.surname,
            username: input.username,
            position: input.position,
            department: input.department,
            mob_tel_number: None,
            office_tel_number: None,
            allow_notification: true,
            email: input.email,
            password_hash,
            profile_photo_id: None,
            role_id: input.role_id,
        },
    )
    .await?;

    let profile = UserRepo::find_profile(&state.pool, user.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("User could not be retrieved after creation.".to_string())
        })?;

    tracing::info!(actor = auth.user_id, user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// PUT /users/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    let profile = UserRepo::find_profile(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(actor = auth.user_id, user_id = id, "User updated");
    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /users/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = UserRepo::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(actor = auth.user_id, user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
