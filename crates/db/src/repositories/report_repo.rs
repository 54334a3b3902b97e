//! Repository for the `reports` table.
//!
//! Reports are created explicitly and closed as a side effect of their
//! linked request reaching Closed (see `RequestRepo::change_status`). The
//! filtered listing mirrors the request filter semantics but is built
//! independently because its search spans joined display fields.

use sqlx::PgPool;

use helpdesk_core::types::{DbId, Timestamp};

use crate::models::filter::{clamp_page, clamp_page_size, range_end_exclusive, range_start};
use crate::models::report::{
    report_order_by, CreateReport, Report, ReportFilter, ReportPage, ReportSummary,
};

/// Column list for `reports` SELECT/RETURNING queries.
const COLUMNS: &str = "\
    id, user_id, category_id, priority_id, type_id, status_id, executor_id, \
    request_id, first_operation_date, operation_time, planned_operation_time, \
    close_date, result, solution, communication_channel, is_routine, code, \
    created_at";

/// Denormalized projection for the list endpoints. Sender and executor are
/// formatted as full names at query time.
const SUMMARY_COLUMNS: &str = "\
    rp.id, u.name || ' ' || u.surname AS sender, c.name AS category_name, \
    st.name AS status_name, \
    CASE WHEN e.id IS NULL THEN NULL ELSE e.name || ' ' || e.surname END AS executor, \
    rp.request_id, rp.first_operation_date, rp.operation_time, rp.close_date, \
    rp.created_at";

const SUMMARY_JOINS: &str = "\
    LEFT JOIN users u ON u.id = rp.user_id \
    LEFT JOIN categories c ON c.id = rp.category_id \
    LEFT JOIN request_statuses st ON st.id = rp.status_id \
    LEFT JOIN users e ON e.id = rp.executor_id";

/// Provides create and query operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new report. Status defaults to New(1) when unset.
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports (user_id, category_id, priority_id, type_id, status_id,
                                  executor_id, request_id, first_operation_date,
                                  operation_time, planned_operation_time, result,
                                  solution, communication_channel, is_routine, code)
             VALUES ($1, $2, $3, $4, COALESCE($5, 1), $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.user_id)
            .bind(input.category_id)
            .bind(input.priority_id)
            .bind(input.type_id)
            .bind(input.status_id)
            .bind(input.executor_id)
            .bind(input.request_id)
            .bind(input.first_operation_date)
            .bind(input.operation_time)
            .bind(input.planned_operation_time)
            .bind(&input.result)
            .bind(&input.solution)
            .bind(&input.communication_channel)
            .bind(input.is_routine)
            .bind(&input.code)
            .fetch_one(pool)
            .await
    }

    /// Summary projection for a single report. Excludes soft-deleted rows.
    pub async fn find_summary(pool: &PgPool, id: DbId) -> Result<Option<ReportSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM reports rp {SUMMARY_JOINS}
             WHERE rp.id = $1 AND rp.deleted_at IS NULL"
        );
        sqlx::query_as::<_, ReportSummary>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active reports, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ReportSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM reports rp {SUMMARY_JOINS}
             WHERE rp.deleted_at IS NULL
             ORDER BY rp.created_at DESC, rp.id ASC"
        );
        sqlx::query_as::<_, ReportSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// The most recent active report linked to a request, if any.
    ///
    /// Absence is part of the contract ("no report yet"), not an error.
    pub async fn find_by_request_id(
        pool: &PgPool,
        request_id: DbId,
    ) -> Result<Option<ReportSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM reports rp {SUMMARY_JOINS}
             WHERE rp.request_id = $1 AND rp.deleted_at IS NULL
             ORDER BY rp.created_at DESC, rp.id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ReportSummary>(&query)
            .bind(request_id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered, sorted, paginated report listing.
    pub async fn get_filtered(
        pool: &PgPool,
        filter: &ReportFilter,
    ) -> Result<ReportPage, sqlx::Error> {
        let page = clamp_page(filter.page);
        let page_size = clamp_page_size(filter.page_size);
        let offset = (page - 1) * page_size;

        let (conditions, bind_values, bind_idx) = build_report_filter(filter);
        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        // The search predicate references joined columns, so the count
        // query carries the joins as well.
        let count_query = format!(
            "SELECT COUNT(*)::BIGINT FROM reports rp {SUMMARY_JOINS} {where_clause}"
        );
        let total_count: i64 = bind_report_scalar(sqlx::query_scalar(&count_query), &bind_values)
            .fetch_one(pool)
            .await?;

        let order_by = report_order_by(
            filter.sort_field.as_deref(),
            filter.sort_direction.as_deref(),
        );
        let page_query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM reports rp {SUMMARY_JOINS}
             {where_clause}
             {order_by}
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let items = bind_report_values(
            sqlx::query_as::<_, ReportSummary>(&page_query),
            &bind_values,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(ReportPage { items, total_count })
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built report queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

/// Build the WHERE conditions and bind values for a report filter.
fn build_report_filter(filter: &ReportFilter) -> (Vec<String>, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["rp.deleted_at IS NULL".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(category_id) = filter.category_id {
        conditions.push(format!("rp.category_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(category_id));
    }

    if let Some(status_id) = filter.status_id {
        conditions.push(format!("rp.status_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(status_id));
    }

    if let Some(executor_id) = filter.executor_id {
        conditions.push(format!("rp.executor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(executor_id));
    }

    if let Some(from) = filter.from_date {
        conditions.push(format!("rp.created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(range_start(from)));
    }

    if let Some(to) = filter.to_date {
        conditions.push(format!("rp.created_at < ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(range_end_exclusive(to)));
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        // Substring OR across id, sender name, category, executor name,
        // and status name, all through one reused placeholder.
        conditions.push(format!(
            "(rp.id::TEXT ILIKE ${bind_idx} \
              OR u.name || ' ' || u.surname ILIKE ${bind_idx} \
              OR c.name ILIKE ${bind_idx} \
              OR e.name || ' ' || e.surname ILIKE ${bind_idx} \
              OR st.name ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{search}%")));
    }

    (conditions, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_report_values<'q, O>(
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
fn bind_report_scalar<'q>(
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
