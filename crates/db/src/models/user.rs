//! User entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A user row. `password_hash` never leaves the db/auth layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub mob_tel_number: Option<String>,
    pub office_tel_number: Option<String>,
    pub allow_notification: bool,
    pub email: String,
    pub password_hash: String,
    pub profile_photo_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new user. The password arrives pre-hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub surname: String,
    pub username: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub mob_tel_number: Option<String>,
    pub office_tel_number: Option<String>,
    pub allow_notification: bool,
    pub email: String,
    pub password_hash: String,
    pub profile_photo_id: Option<DbId>,
    pub role_id: DbId,
}

/// DTO for updating a user's profile and role.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUser {
    pub name: String,
    pub surname: String,
    pub position: Option<String>,
    pub role_id: DbId,
}

/// Display projection with the user's role names resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub id: DbId,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub mob_tel_number: Option<String>,
    pub office_tel_number: Option<String>,
    pub allow_notification: bool,
    pub email: String,
    pub profile_photo_id: Option<DbId>,
    /// Comma-joined role names (`string_agg` in the query).
    pub roles: Option<String>,
}
