//! Repositories for the reference tables: categories, priorities, request
//! types, and the fixed status tables.

use sqlx::PgPool;

use helpdesk_core::types::DbId;

use crate::models::lookup::{
    Category, CreateCategory, CreatePriority, CreateRequestType, Priority, RequestType, StatusRow,
};

const CATEGORY_COLUMNS: &str = "id, name, created_at";
const PRIORITY_COLUMNS: &str = "id, level, created_at";
const TYPE_COLUMNS: &str = "id, name, created_at";

/// CRUD for request categories.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query =
            format!("INSERT INTO categories (name) VALUES ($1) RETURNING {CATEGORY_COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE deleted_at IS NULL ORDER BY name ASC"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Rename a category. Returns `None` for an absent/deleted row.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2 WHERE id = $1 AND deleted_at IS NULL
             RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// CRUD for request priorities.
pub struct PriorityRepo;

impl PriorityRepo {
    pub async fn create(pool: &PgPool, input: &CreatePriority) -> Result<Priority, sqlx::Error> {
        let query =
            format!("INSERT INTO priorities (level) VALUES ($1) RETURNING {PRIORITY_COLUMNS}");
        sqlx::query_as::<_, Priority>(&query)
            .bind(&input.level)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Priority>, sqlx::Error> {
        let query = format!(
            "SELECT {PRIORITY_COLUMNS} FROM priorities WHERE deleted_at IS NULL ORDER BY id ASC"
        );
        sqlx::query_as::<_, Priority>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreatePriority,
    ) -> Result<Option<Priority>, sqlx::Error> {
        let query = format!(
            "UPDATE priorities SET level = $2 WHERE id = $1 AND deleted_at IS NULL
             RETURNING {PRIORITY_COLUMNS}"
        );
        sqlx::query_as::<_, Priority>(&query)
            .bind(id)
            .bind(&input.level)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE priorities SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// CRUD for request types.
pub struct RequestTypeRepo;

impl RequestTypeRepo {
    pub async fn create(pool: &PgPool, input: &CreateRequestType) -> Result<RequestType, sqlx::Error> {
        let query =
            format!("INSERT INTO request_types (name) VALUES ($1) RETURNING {TYPE_COLUMNS}");
        sqlx::query_as::<_, RequestType>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<RequestType>, sqlx::Error> {
        let query = format!(
            "SELECT {TYPE_COLUMNS} FROM request_types WHERE deleted_at IS NULL ORDER BY name ASC"
        );
        sqlx::query_as::<_, RequestType>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CreateRequestType,
    ) -> Result<Option<RequestType>, sqlx::Error> {
        let query = format!(
            "UPDATE request_types SET name = $2 WHERE id = $1 AND deleted_at IS NULL
             RETURNING {TYPE_COLUMNS}"
        );
        sqlx::query_as::<_, RequestType>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE request_types SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Read access to the fixed status tables.
pub struct StatusRepo;

impl StatusRepo {
    pub async fn list_request_statuses(pool: &PgPool) -> Result<Vec<StatusRow>, sqlx::Error> {
        sqlx::query_as::<_, StatusRow>("SELECT id, name FROM request_statuses ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    pub async fn list_response_statuses(pool: &PgPool) -> Result<Vec<StatusRow>, sqlx::Error> {
        sqlx::query_as::<_, StatusRow>("SELECT id, name FROM response_statuses ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Whether a response status id exists (claim precondition for the
    /// response status-change endpoint).
    pub async fn response_status_exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM response_statuses WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Whether a request status id exists.
    pub async fn request_status_exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM request_statuses WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
