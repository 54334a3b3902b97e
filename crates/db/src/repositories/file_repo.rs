//! Repository for the `files` attachment-metadata table.

use sqlx::PgPool;

use helpdesk_core::types::DbId;

use crate::models::file::{CreateStoredFile, StoredFile};

const COLUMNS: &str = "id, file_name, file_path, content_type, size_bytes, uploaded_at";

/// Provides metadata operations for stored attachments.
pub struct FileRepo;

impl FileRepo {
    /// Insert a metadata row for a freshly written blob.
    pub async fn create(pool: &PgPool, input: &CreateStoredFile) -> Result<StoredFile, sqlx::Error> {
        let query = format!(
            "INSERT INTO files (file_name, file_path, content_type, size_bytes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(&input.file_name)
            .bind(&input.file_path)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .fetch_one(pool)
            .await
    }

    /// Find an attachment's metadata. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<StoredFile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM files WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, StoredFile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an attachment's metadata. Returns `true` if a row was
    /// marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE files SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
