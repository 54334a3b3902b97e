//! Repository for the `responses` table.

use sqlx::PgPool;

use helpdesk_core::status::{STATUS_COMPLETED, STATUS_NEW};
use helpdesk_core::types::DbId;

use crate::models::response::{CreateResponse, Response, ResponseView, UpdateResponse};

/// Column list for `responses` SELECT/RETURNING queries.
const COLUMNS: &str = "id, text, request_id, status_id, user_id, file_id, created_at";

/// Denormalized projection with author and status names.
const VIEW_COLUMNS: &str = "\
    rs.id, rs.text, rs.request_id, rq.text AS request_text, \
    u.name AS user_name, u.surname AS user_surname, \
    st.name AS status_name, rs.file_id, rs.created_at";

const VIEW_JOINS: &str = "\
    LEFT JOIN requests rq ON rq.id = rs.request_id \
    LEFT JOIN users u ON u.id = rs.user_id \
    LEFT JOIN response_statuses st ON st.id = rs.status_id";

/// Provides CRUD operations for responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert a new response.
    ///
    /// When the parent request is still New(1), the same transaction moves
    /// it to Completed(3): a formal answer on an untouched request settles
    /// it directly.
    pub async fn create(pool: &PgPool, input: &CreateResponse) -> Result<Response, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO responses (text, request_id, status_id, user_id, file_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, Response>(&query)
            .bind(&input.text)
            .bind(input.request_id)
            .bind(input.status_id)
            .bind(input.user_id)
            .bind(input.file_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE requests SET status_id = $3 WHERE id = $1 AND status_id = $2")
            .bind(input.request_id)
            .bind(STATUS_NEW)
            .bind(STATUS_COMPLETED)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(response)
    }

    /// Find a response by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Response>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The active response attached to a request, if any.
    pub async fn find_by_request_id(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Option<ResponseView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM responses rs {VIEW_JOINS}
             WHERE rs.request_id = $1 AND rs.deleted_at IS NULL"
        );
        sqlx::query_as::<_, ResponseView>(&query)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// View projection for a single response.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<ResponseView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM responses rs {VIEW_JOINS}
             WHERE rs.id = $1 AND rs.deleted_at IS NULL"
        );
        sqlx::query_as::<_, ResponseView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active responses, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ResponseView>, sqlx::Error> {
        let query = format!(
            "SELECT {VIEW_COLUMNS} FROM responses rs {VIEW_JOINS}
             WHERE rs.deleted_at IS NULL
             ORDER BY rs.created_at DESC, rs.id ASC"
        );
        sqlx::query_as::<_, ResponseView>(&query)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable fields of a response.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateResponse,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!(
            "UPDATE responses SET
                text = $2, request_id = $3, status_id = $4, user_id = $5, file_id = $6
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.request_id)
            .bind(input.status_id)
            .bind(input.user_id)
            .bind(input.file_id)
            .fetch_optional(pool)
            .await
    }

    /// Change only the status of a response.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE responses SET status_id = $2 WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(status_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a response. Returns its attachment id (if any) when a
    /// row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<Option<DbId>>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE responses SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING file_id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
