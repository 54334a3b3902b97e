//! Shared query parameter types for API handlers.
//!
//! The list endpoints accept camelCase query keys (`fromDate`, `pageSize`,
//! `sortField`, ...); these structs translate them into the snake_case
//! filter types the repositories consume.

use chrono::NaiveDate;
use serde::Deserialize;

use helpdesk_core::types::DbId;
use helpdesk_db::models::report::ReportFilter;
use helpdesk_db::models::request::RequestFilter;

/// Query parameters for `GET /requests/filter`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilterParams {
    pub category_id: Option<DbId>,
    pub status_id: Option<DbId>,
    pub priority_id: Option<DbId>,
    pub executor_id: Option<DbId>,
    pub search: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

impl From<RequestFilterParams> for RequestFilter {
    fn from(p: RequestFilterParams) -> Self {
        RequestFilter {
            category_id: p.category_id,
            status_id: p.status_id,
            priority_id: p.priority_id,
            executor_id: p.executor_id,
            search: p.search,
            from_date: p.from_date,
            to_date: p.to_date,
            page: p.page,
            page_size: p.page_size,
            sort_field: p.sort_field,
            sort_direction: p.sort_direction,
        }
    }
}

/// Query parameters for `GET /reports/filter`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilterParams {
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

impl From<ReportFilterParams> for ReportFilter {
    fn from(p: ReportFilterParams) -> Self {
        ReportFilter {
            category_id: p.category_id,
            status_id: p.status_id,
            executor_id: p.executor_id,
            search: p.search,
            from_date: p.from_date,
            to_date: p.to_date,
            page: p.page,
            page_size: p.page_size,
            sort_field: p.sort_field,
            sort_direction: p.sort_direction,
        }
    }
}
