//! Authentication handlers: registration, login, token refresh, and
//! password renewal.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use helpdesk_core::error::CoreError;
use helpdesk_core::password::validate_password;
use helpdesk_core::types::{DbId, Timestamp};
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{RefreshTokenRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Role name used in token claims when a user has no role row.
const DEFAULT_ROLE: &str = "Employee";

/* --------------------------------------------------------------------------
Payloads
-------------------------------------------------------------------------- */

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub surname: String,
    #[validate(length(min = 3))]
    pub username: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub mob_tel_number: Option<String>,
    pub office_tel_number: Option<String>,
    #[serde(default = "default_allow_notification")]
    pub allow_notification: bool,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub role_id: DbId,
    /// Pre-uploaded profile photo (see `POST /files`).
    pub profile_photo_id: Option<DbId>,
}

fn default_allow_notification() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshInput {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewPasswordInput {
    pub old_password: String,
    pub new_password: String,
    pub repeat_new_password: String,
}

/// Token pair plus profile basics returned by login and refresh.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: DbId,
    pub token: String,
    pub refresh_token: String,
    pub expires: Timestamp,
    pub first_name: String,
    pub last_name: String,
    pub department: Option<String>,
}

/* --------------------------------------------------------------------------
Handlers
-------------------------------------------------------------------------- */

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
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
            mob_tel_number: input.mob_tel_number,
            office_tel_number: input.office_tel_number,
            allow_notification: input.allow_notification,
            email: input.email,
            password_hash,
            profile_photo_id: input.profile_photo_id,
            role_id: input.role_id,
        },
    )
    .await?;

    state.mailer.send_welcome(&user.email, &user.name).await;

    let profile = UserRepo::find_profile(&state.pool, user.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("User could not be retrieved after creation.".to_string())
        })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|err| AppError::Core(CoreError::Validation(err.to_string())))?;

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "User with username '{}' not found.",
                input.username
            ))
        })?;

    let verified = verify_password(&input.password, &user.password_hash)
        .map_err(|err| AppError::InternalError(format!("Password verification failed: {err}")))?;
    if !verified {
        tracing::warn!(user_id = user.id, "Login failed: invalid password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password!".to_string(),
        )));
    }

    let auth_response = issue_tokens(&state, user.id, &user.name, &user.surname, user.department.clone()).await?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(DataResponse {
        data: auth_response,
    }))
}

/// POST /auth/refresh
///
/// Rotate a refresh token: the presented token is revoked and a fresh
/// access/refresh pair is issued.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<impl IntoResponse> {
    let presented_hash = hash_refresh_token(&input.refresh_token);

    let stored = RefreshTokenRepo::find_by_hash(&state.pool, &presented_hash)
        .await?
        .filter(|t| t.is_active(Utc::now()))
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Refresh token is invalid or expired.".to_string(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, stored.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Refresh token is invalid or expired.".to_string(),
            ))
        })?;

    let auth_response =
        issue_tokens(&state, user.id, &user.name, &user.surname, user.department.clone()).await?;

    RefreshTokenRepo::revoke(
        &state.pool,
        stored.id,
        Some(&hash_refresh_token(&auth_response.refresh_token)),
    )
    .await?;

    tracing::info!(user_id = user.id, "Refresh token rotated");
    Ok(Json(DataResponse {
        data: auth_response,
    }))
}

/// POST /auth/renew-password
///
/// Change the caller's password: verify the current one, enforce the
/// policy, and reject any password already used before.
pub async fn renew_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RenewPasswordInput>,
) -> AppResult<impl IntoResponse> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let old_verified = verify_password(&input.old_password, &user.password_hash)
        .map_err(|err| AppError::InternalError(format!("Password verification failed: {err}")))?;
    if !old_verified {
        return Err(AppError::Core(CoreError::Validation(
            "The previous password is incorrect.".to_string(),
        )));
    }

    validate_password(&input.new_password).map_err(AppError::Core)?;

    if input.new_password != input.repeat_new_password {
        return Err(AppError::Core(CoreError::Validation(
            "The new passwords do not match.".to_string(),
        )));
    }

    // Reject reuse of the current or any archived password.
    let mut known_hashes = UserRepo::password_history(&state.pool, user.id).await?;
    known_hashes.push(user.password_hash.clone());
    for hash in &known_hashes {
        let reused = verify_password(&input.new_password, hash).map_err(|err| {
            AppError::InternalError(format!("Password verification failed: {err}"))
        })?;
        if reused {
            return Err(AppError::Core(CoreError::Validation(
                "A previously used password cannot be reused.".to_string(),
            )));
        }
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|err| AppError::InternalError(format!("Password hashing failed: {err}")))?;
    UserRepo::rotate_password(&state.pool, user.id, &user.password_hash, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password renewed");
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Issue an access/refresh token pair and persist the refresh hash.
async fn issue_tokens(
    state: &AppState,
    user_id: DbId,
    name: &str,
    surname: &str,
    department: Option<String>,
) -> AppResult<AuthResponse> {
    let role = UserRepo::primary_role(&state.pool, user_id)
        .await?
        .unwrap_or_else(|| DEFAULT_ROLE.to_string());

    let access_token = generate_access_token(user_id, &role, &state.config.jwt)
        .map_err(|err| AppError::InternalError(format!("Token generation failed: {err}")))?;

    let (refresh_token, refresh_hash) = generate_refresh_token();
    let expires_at = Utc::now() + Duration::days(state.config.jwt.refresh_token_expiry_days);
    RefreshTokenRepo::create(&state.pool, user_id, &refresh_hash, expires_at).await?;

    Ok(AuthResponse {
        user_id,
        token: access_token,
        refresh_token,
        expires: Utc::now() + Duration::minutes(state.config.jwt.access_token_expiry_mins),
        first_name: name.to_string(),
        last_name: surname.to_string(),
        department,
    })
}
