//! Report entity models, filter parameters, and list projections.
//!
//! A report mirrors a request's categorization plus operational metadata
//! (first-operation date, execution time, close date). It has its own
//! lifecycle: created explicitly, closed as a side effect of the linked
//! request reaching Closed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

use crate::models::filter::SortDirection;

/// A report row as stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub priority_id: Option<DbId>,
    pub type_id: Option<DbId>,
    pub status_id: DbId,
    pub executor_id: Option<DbId>,
    pub request_id: Option<DbId>,
    pub first_operation_date: Option<Timestamp>,
    pub operation_time: Option<i32>,
    pub planned_operation_time: Option<i32>,
    pub close_date: Option<Timestamp>,
    pub result: Option<String>,
    pub solution: Option<String>,
    pub communication_channel: Option<String>,
    pub is_routine: bool,
    pub code: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub user_id: DbId,
    pub category_id: DbId,
    pub priority_id: Option<DbId>,
    pub type_id: Option<DbId>,
    pub status_id: Option<DbId>,
    pub executor_id: Option<DbId>,
    pub request_id: Option<DbId>,
    pub first_operation_date: Option<Timestamp>,
    pub operation_time: Option<i32>,
    pub planned_operation_time: Option<i32>,
    pub result: Option<String>,
    pub solution: Option<String>,
    pub communication_channel: Option<String>,
    #[serde(default)]
    pub is_routine: bool,
    pub code: Option<String>,
}

/// Display projection with sender/executor/category/status names joined.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportSummary {
    pub id: DbId,
    pub sender: Option<String>,
    pub category_name: Option<String>,
    pub status_name: Option<String>,
    pub executor: Option<String>,
    pub request_id: Option<DbId>,
    pub first_operation_date: Option<Timestamp>,
    pub operation_time: Option<i32>,
    pub close_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Filter parameters for the report list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportFilter {
    pub category_id: Option<DbId>,
    pub status_id: Option<DbId>,
    pub executor_id: Option<DbId>,
    pub search: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

/// Paginated report listing.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub items: Vec<ReportSummary>,
    pub total_count: i64,
}

/// Closed set of sortable report fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSortField {
    Id,
    Sender,
    Category,
    Status,
    Executor,
    CreatedAt,
    CloseDate,
}

impl ReportSortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "sender" => Some(Self::Sender),
            "category" => Some(Self::Category),
            "status" => Some(Self::Status),
            "executor" => Some(Self::Executor),
            "createdAt" => Some(Self::CreatedAt),
            "closeDate" => Some(Self::CloseDate),
            _ => None,
        }
    }

    /// Column expression in terms of the filtered query's aliases
    /// (`rp` reports, `u` sender, `e` executor, `c` category, `st` status).
    fn sort_expr(&self) -> &'static str {
        match self {
            Self::Id => "rp.id",
            Self::Sender => "u.name",
            Self::Category => "c.name",
            Self::Status => "st.name",
            Self::Executor => "e.name",
            Self::CreatedAt => "rp.created_at",
            Self::CloseDate => "rp.close_date",
        }
    }
}

/// Build the ORDER BY clause for a report filter, with the same fallback
/// and tie-break rules as the request ordering.
pub fn report_order_by(sort_field: Option<&str>, sort_direction: Option<&str>) -> String {
    match sort_field.and_then(ReportSortField::parse) {
        Some(field) => {
            let dir = SortDirection::parse(sort_direction);
            format!(
                "ORDER BY {} {} NULLS LAST, rp.id ASC",
                field.sort_expr(),
                dir.as_sql()
            )
        }
        None => "ORDER BY rp.created_at DESC, rp.id ASC".to_string(),
    }
}
