//! Repository for the `request_histories` audit table. Rows are append-only
//! and immutable; there is no update or delete path.

use sqlx::PgPool;

use helpdesk_core::types::DbId;

use crate::models::history::{HistoryEntry, HistoryView};

const COLUMNS: &str = "id, request_id, user_id, action, description, created_at";

const VIEW_COLUMNS: &str = "\
    h.id, h.action, h.description, h.created_at, \
    u.name AS user_name, u.surname AS user_surname, u.position AS user_position";

/// Provides append and read operations for request history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append one audit entry. Synchronous: the row is committed before
    /// the triggering call returns.
    pub async fn append(
        pool: &PgPool,
        request_id: DbId,
        actor_user_id: DbId,
        action: &str,
        description: &str,
    ) -> Result<HistoryEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO request_histories (request_id, user_id, action, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(request_id)
            .bind(actor_user_id)
            .bind(action)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// A request's history, newest first, with actor profiles joined.
    pub async fn list_by_request(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Vec<HistoryView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM request_histories h
             LEFT JOIN users u ON u.id = h.user_id
             WHERE h.request_id = $1
             ORDER BY h.created_at DESC, h.id DESC"
        );
        sqlx::query_as::<_, HistoryView>(&query)
            .bind(request_id)
            .fetch_all(pool)
            .await
    }

    /// Number of history rows for a request.
    pub async fn count_by_request(pool: &PgPool, request_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM request_histories WHERE request_id = $1",
        )
        .bind(request_id)
        .fetch_one(pool)
        .await
    }
}
