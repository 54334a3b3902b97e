//! Repository for the `requests` table: lifecycle writes (create, update,
//! status transitions, executor claim, delete cascade) and the filtered
//! list query with its per-status breakdown.

use std::collections::HashMap;

use sqlx::PgPool;

use helpdesk_core::status::{transition_label, HISTORY_ACTION_STATUS_CHANGED, STATUS_CLOSED};
use helpdesk_core::types::{DbId, Timestamp};

use crate::models::filter::{clamp_page, clamp_page_size, range_end_exclusive, range_start};
use crate::models::request::{
    request_order_by, ClaimOutcome, CreateRequest, Request, RequestDetail, RequestFilter,
    RequestPage, RequestSummary, UpdateRequest,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Column list for `requests` SELECT/RETURNING queries.
const COLUMNS: &str = "\
    id, header, text, user_id, executor_id, category_id, priority_id, \
    type_id, status_id, file_id, first_operation_date, created_at";

/// Denormalized projection used by the list endpoints.
const SUMMARY_COLUMNS: &str = "\
    r.id, r.header, r.text, u.name AS user_name, u.surname AS user_surname, \
    c.name AS category_name, st.name AS status_name, p.level AS priority_level, \
    t.name AS type_name, e.name AS executor_name, e.surname AS executor_surname, \
    r.created_at, r.file_id";

/// Joins backing the denormalized projections.
const SUMMARY_JOINS: &str = "\
    LEFT JOIN users u ON u.id = r.user_id \
    LEFT JOIN categories c ON c.id = r.category_id \
    LEFT JOIN priorities p ON p.id = r.priority_id \
    LEFT JOIN request_types t ON t.id = r.type_id \
    LEFT JOIN request_statuses st ON st.id = r.status_id \
    LEFT JOIN users e ON e.id = r.executor_id";

const DETAIL_COLUMNS: &str = "\
    r.id, r.header, r.text, r.user_id, u.name AS user_name, \
    u.surname AS user_surname, u.position AS user_position, \
    u.profile_photo_id AS user_profile_photo_id, r.executor_id, \
    e.name AS executor_name, e.surname AS executor_surname, \
    r.category_id, c.name AS category_name, r.priority_id, \
    p.level AS priority_level, r.type_id, t.name AS type_name, \
    r.status_id, st.name AS status_name, r.file_id, \
    r.first_operation_date, r.created_at";

/// The attachment id released by a delete cascade, to be marked deleted
/// in the file store by the caller.
#[derive(Debug, Clone, Copy)]
pub struct DeleteCascade {
    pub file_id: Option<DbId>,
}

/// Provides lifecycle and query operations for requests.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a new request. Status is forced to New(1).
    pub async fn create(pool: &PgPool, input: &CreateRequest) -> Result<Request, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (header, text, user_id, category_id, priority_id, type_id, file_id, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 1)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(&input.header)
            .bind(&input.text)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(input.priority_id)
            .bind(input.type_id)
            .bind(input.file_id)
            .fetch_one(pool)
            .await
    }

    /// Find a request by id. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fully hydrated detail row with related names resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<RequestDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {DETAIL_COLUMNS} FROM requests r {SUMMARY_JOINS}
             WHERE r.id = $1 AND r.deleted_at IS NULL"
        );
        sqlx::query_as::<_, RequestDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Summary projection for a single request.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<RequestSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM requests r {SUMMARY_JOINS}
             WHERE r.id = $1 AND r.deleted_at IS NULL"
        );
        sqlx::query_as::<_, RequestSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active requests, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<RequestSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM requests r {SUMMARY_JOINS}
             WHERE r.deleted_at IS NULL
             ORDER BY r.created_at DESC, r.id ASC"
        );
        sqlx::query_as::<_, RequestSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// List active requests in one category, newest first.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<RequestSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM requests r {SUMMARY_JOINS}
             WHERE r.category_id = $1 AND r.deleted_at IS NULL
             ORDER BY r.created_at DESC, r.id ASC"
        );
        sqlx::query_as::<_, RequestSummary>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the mutable fields of a request.
    ///
    /// Returns `None` if no active row with the given id exists. The
    /// field-level diff that decides whether to call this at all lives in
    /// the handler.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRequest,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                header = $2, text = $3, user_id = $4, category_id = $5,
                priority_id = $6, type_id = $7, file_id = $8
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(&input.header)
            .bind(&input.text)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(input.priority_id)
            .bind(input.type_id)
            .bind(input.file_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a request, cascading to its active response in the same
    /// transaction. Comments and history rows are left untouched.
    ///
    /// Returns `None` if the request is absent or already deleted;
    /// otherwise the request's attachment id so the caller can retire the
    /// file metadata.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<Option<DeleteCascade>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let file_id: Option<Option<DbId>> = sqlx::query_scalar(
            "SELECT file_id FROM requests WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(file_id) = file_id else {
            return Ok(None);
        };

        sqlx::query(
            "UPDATE responses SET deleted_at = NOW()
             WHERE request_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE requests SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(DeleteCascade { file_id }))
    }

    /// Transition a request to a new status.
    ///
    /// Runs in one transaction: the status write, the opportunistic closure
    /// of the linked report when the new status is Closed(6), and exactly
    /// one history row. A failure in any step rolls the whole transition
    /// back, so history is never partially applied.
    ///
    /// Returns the history label, or `None` when no active request matched.
    pub async fn change_status(
        pool: &PgPool,
        request_id: DbId,
        new_status_id: DbId,
        actor_user_id: DbId,
    ) -> Result<Option<&'static str>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old_status: Option<DbId> = sqlx::query_scalar(
            "SELECT status_id FROM requests WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(old_status) = old_status else {
            return Ok(None);
        };

        sqlx::query("UPDATE requests SET status_id = $2 WHERE id = $1")
            .bind(request_id)
            .bind(new_status_id)
            .execute(&mut *tx)
            .await?;

        if new_status_id == STATUS_CLOSED {
            // A request without a report is not an error; zero rows is fine.
            sqlx::query(
                "UPDATE reports SET status_id = $2, close_date = NOW()
                 WHERE request_id = $1 AND deleted_at IS NULL",
            )
            .bind(request_id)
            .bind(new_status_id)
            .execute(&mut *tx)
            .await?;
        }

        let label = transition_label(old_status, new_status_id);
        sqlx::query(
            "INSERT INTO request_histories (request_id, user_id, action, description)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(request_id)
        .bind(actor_user_id)
        .bind(HISTORY_ACTION_STATUS_CHANGED)
        .bind(label)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(label))
    }

    /// Claim a request for an executor.
    ///
    /// A single conditional UPDATE guarded by `executor_id IS NULL` makes
    /// the claim atomic under concurrent callers; first writer wins.
    /// `first_operation_date` is only set when previously unset.
    pub async fn claim(
        pool: &PgPool,
        request_id: DbId,
        executor_id: DbId,
    ) -> Result<ClaimOutcome, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE requests SET
                executor_id = $2,
                status_id = 2,
                first_operation_date = COALESCE(first_operation_date, NOW())
             WHERE id = $1 AND deleted_at IS NULL AND executor_id IS NULL",
        )
        .bind(request_id)
        .bind(executor_id)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(ClaimOutcome::Claimed);
        }

        // Zero rows: distinguish a missing request from a lost race.
        let existing: Option<Option<DbId>> = sqlx::query_scalar(
            "SELECT executor_id FROM requests WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(request_id)
        .fetch_optional(pool)
        .await?;

        match existing {
            None => Ok(ClaimOutcome::NotFound),
            Some(_) => Ok(ClaimOutcome::AlreadyTaken),
        }
    }

    /// Filtered, sorted, paginated listing plus the per-status breakdown.
    ///
    /// The breakdown is computed over the filtered set *before* the
    /// status-equality predicate, so a view narrowed to one status still
    /// shows how the other statuses are populated.
    pub async fn get_filtered(
        pool: &PgPool,
        filter: &RequestFilter,
    ) -> Result<RequestPage, sqlx::Error> {
        let page = clamp_page(filter.page);
        let page_size = clamp_page_size(filter.page_size);
        let offset = (page - 1) * page_size;

        let (mut conditions, mut bind_values, mut bind_idx) = build_request_filter(filter);

        let counts_query = format!(
            "SELECT st.name AS status, COUNT(*)::BIGINT AS count
             FROM requests r
             LEFT JOIN request_statuses st ON st.id = r.status_id
             WHERE {}
             GROUP BY st.name",
            conditions.join(" AND ")
        );
        let count_rows: Vec<(String, i64)> =
            bind_request_values(sqlx::query_as(&counts_query), &bind_values)
                .fetch_all(pool)
                .await?;
        let status_counts: HashMap<String, i64> = count_rows.into_iter().collect();

        if let Some(status_id) = filter.status_id {
            conditions.push(format!("r.status_id = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::BigInt(status_id));
        }
        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM requests r {where_clause}");
        let total_count: i64 =
            bind_request_scalar(sqlx::query_scalar(&count_query), &bind_values)
                .fetch_one(pool)
                .await?;

        let order_by = request_order_by(
            filter.sort_field.as_deref(),
            filter.sort_direction.as_deref(),
        );
        let page_query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM requests r {SUMMARY_JOINS}
             {where_clause}
             {order_by}
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let items = bind_request_values(
            sqlx::query_as::<_, RequestSummary>(&page_query),
            &bind_values,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(RequestPage {
            items,
            total_count,
            status_counts,
        })
    }

    /// Number of comments on a request.
    pub async fn comment_count(pool: &PgPool, request_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM comments WHERE request_id = $1",
        )
        .bind(request_id)
        .fetch_one(pool)
        .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built request queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Build the filter conditions shared by the breakdown, count, and page
/// queries. The status-equality predicate is intentionally excluded; the
/// caller appends it after the breakdown query is issued.
///
/// Returns `(conditions, bind_values, next_bind_index)`. The first
/// condition is always the soft-delete guard.
fn build_request_filter(filter: &RequestFilter) -> (Vec<String>, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["r.deleted_at IS NULL".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("r.category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    if let Some(priority_id) = filter.priority_id {
        conditions.push(format!("r.priority_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(priority_id));
    }

    if let Some(executor_id) = filter.executor_id {
        conditions.push(format!("r.executor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(executor_id));
    }

    if let Some(from) = filter.from_date {
        conditions.push(format!("r.created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(range_start(from)));
    }

    if let Some(to) = filter.to_date {
        conditions.push(format!("r.created_at < ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(range_end_exclusive(to)));
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        // One placeholder reused across both columns.
        conditions.push(format!(
            "(r.header ILIKE ${bind_idx} OR r.text ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{search}%")));
    }

    (conditions, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_request_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_request_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
        }
    }
    q
}
