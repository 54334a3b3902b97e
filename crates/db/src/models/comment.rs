//! Comment models. Comments are append-only notes on a request, distinct
//! from its formal response, and are never soft-deleted.

use serde::Serialize;
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A comment row as stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    pub request_id: DbId,
    pub user_id: DbId,
    pub attachment_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub text: String,
    pub request_id: DbId,
    pub user_id: DbId,
    pub attachment_id: Option<DbId>,
}

/// Display projection with the author's profile joined.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub text: String,
    pub request_id: DbId,
    pub user_id: DbId,
    pub attachment_id: Option<DbId>,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    pub user_username: Option<String>,
    pub user_position: Option<String>,
    pub user_profile_photo_id: Option<DbId>,
}
