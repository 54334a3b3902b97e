//! Repository for the `comments` table. Append-only.

use sqlx::PgPool;

use helpdesk_core::types::DbId;

use crate::models::comment::{Comment, CommentView, CreateComment};

const COLUMNS: &str = "id, text, request_id, user_id, attachment_id, created_at";

const VIEW_COLUMNS: &str = "\
    cm.id, cm.text, cm.request_id, cm.user_id, cm.attachment_id, cm.created_at, \
    u.name AS user_name, u.surname AS user_surname, u.username AS user_username, \
    u.position AS user_position, u.profile_photo_id AS user_profile_photo_id";

/// Provides insert and list operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (text, request_id, user_id, attachment_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.text)
            .bind(input.request_id)
            .bind(input.user_id)
            .bind(input.attachment_id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a request's comments, newest first, with author profiles.
    pub async fn list_by_request(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM comments cm
             LEFT JOIN users u ON u.id = cm.user_id
             WHERE cm.request_id = $1
             ORDER BY cm.created_at DESC, cm.id DESC"
        );
        sqlx::query_as::<_, CommentView>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }
}
