//! Request entity models, filter parameters, and list projections.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

use crate::models::filter::SortDirection;

// ---------------------------------------------------------------------------
// Request entity
// ---------------------------------------------------------------------------

/// A request row as stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Request {
    pub id: DbId,
    pub header: String,
    pub text: String,
    pub user_id: DbId,
    pub executor_id: Option<DbId>,
    pub category_id: DbId,
    pub priority_id: DbId,
    pub type_id: DbId,
    pub status_id: DbId,
    pub file_id: Option<DbId>,
    pub first_operation_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new request. Status is forced to New by the
/// repository; the attachment id (if any) is resolved by the caller
/// before insert.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub header: String,
    pub text: String,
    pub user_id: DbId,
    pub category_id: DbId,
    pub priority_id: DbId,
    pub type_id: DbId,
    pub file_id: Option<DbId>,
}

/// DTO for updating a request. All fields are written when a change is
/// detected; the repository performs the field-level diff.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub header: String,
    pub text: String,
    pub user_id: DbId,
    pub category_id: DbId,
    pub priority_id: DbId,
    pub type_id: DbId,
    pub file_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// List projections
// ---------------------------------------------------------------------------

/// Display projection for list endpoints, with related names denormalized.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestSummary {
    pub id: DbId,
    pub header: String,
    pub text: String,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    pub category_name: Option<String>,
    pub status_name: Option<String>,
    pub priority_level: Option<String>,
    pub type_name: Option<String>,
    pub executor_name: Option<String>,
    pub executor_surname: Option<String>,
    pub created_at: Timestamp,
    pub file_id: Option<DbId>,
}

/// Fully hydrated request detail used by the single-request endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestDetail {
    pub id: DbId,
    pub header: String,
    pub text: String,
    pub user_id: DbId,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    pub user_position: Option<String>,
    pub user_profile_photo_id: Option<DbId>,
    pub executor_id: Option<DbId>,
    pub executor_name: Option<String>,
    pub executor_surname: Option<String>,
    pub category_id: DbId,
    pub category_name: Option<String>,
    pub priority_id: DbId,
    pub priority_level: Option<String>,
    pub type_id: DbId,
    pub type_name: Option<String>,
    pub status_id: DbId,
    pub status_name: Option<String>,
    pub file_id: Option<DbId>,
    pub first_operation_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Filter parameters for the request list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
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

/// Paginated request listing with the per-status breakdown.
///
/// `status_counts` is computed before the status-equality predicate is
/// applied, so tab counters stay meaningful while one tab is selected.
#[derive(Debug, Clone, Serialize)]
pub struct RequestPage {
    pub items: Vec<RequestSummary>,
    pub total_count: i64,
    pub status_counts: HashMap<String, i64>,
}

/// Closed set of sortable request fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSortField {
    Id,
    Header,
    Username,
    Category,
    Status,
    Priority,
    Executor,
    CreatedAt,
}

impl RequestSortField {
    /// Parse a sort key. Unrecognized keys return `None`, which callers
    /// treat as "default ordering" (created-at descending).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "id" => Some(Self::Id),
            "header" => Some(Self::Header),
            "username" => Some(Self::Username),
            "category" => Some(Self::Category),
            "status" => Some(Self::Status),
            "priority" => Some(Self::Priority),
            "executor" => Some(Self::Executor),
            "createdAt" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Column expression this field sorts by, in terms of the aliases used
    /// by the filtered query (`r` requests, `u` creator, `e` executor,
    /// `c` category, `st` status, `p` priority).
    fn sort_expr(&self) -> &'static str {
        match self {
            Self::Id => "r.id",
            Self::Header => "r.header",
            Self::Username => "u.name",
            Self::Category => "c.name",
            Self::Status => "st.name",
            Self::Priority => "p.level",
            Self::Executor => "e.name",
            Self::CreatedAt => "r.created_at",
        }
    }
}

/// Build the ORDER BY clause for a request filter.
///
/// Absent or unrecognized sort fields fall back to creation time
/// descending. Every ordering carries an `r.id ASC` tie-break so repeated
/// calls over unchanged data return identical pages.
pub fn request_order_by(sort_field: Option<&str>, sort_direction: Option<&str>) -> String {
    match sort_field.and_then(RequestSortField::parse) {
        Some(field) => {
            let dir = SortDirection::parse(sort_direction);
            format!(
                "ORDER BY {} {} NULLS LAST, r.id ASC",
                field.sort_expr(),
                dir.as_sql()
            )
        }
        None => "ORDER BY r.created_at DESC, r.id ASC".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Section-scoped hydration
// ---------------------------------------------------------------------------

/// Which satellite data to hydrate alongside a request detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSection {
    /// Detail plus response and comments.
    Request,
    /// Detail plus comments and response.
    Comment,
    /// Detail plus history entries.
    History,
    /// Detail only.
    RequestInfo,
    /// Detail plus everything.
    Full,
}

impl RequestSection {
    /// Parse the path tag. Unknown tags hydrate everything, matching the
    /// catch-all branch of the section endpoint.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "request" => Self::Request,
            "comment" => Self::Comment,
            "history" => Self::History,
            "requestinfo" => Self::RequestInfo,
            _ => Self::Full,
        }
    }

    pub fn includes_response(&self) -> bool {
        matches!(self, Self::Request | Self::Comment | Self::Full)
    }

    pub fn includes_comments(&self) -> bool {
        matches!(self, Self::Request | Self::Comment | Self::Full)
    }

    pub fn includes_history(&self) -> bool {
        matches!(self, Self::History | Self::Full)
    }
}

// ---------------------------------------------------------------------------
// Claim outcome
// ---------------------------------------------------------------------------

/// Result of the atomic executor-claim update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The conditional update matched: this caller now owns the request.
    Claimed,
    /// The request exists but another executor already claimed it.
    AlreadyTaken,
    /// No active request with that id.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_field_falls_back_to_created_at_desc() {
        assert_eq!(
            request_order_by(Some("bogus"), Some("asc")),
            "ORDER BY r.created_at DESC, r.id ASC"
        );
        assert_eq!(
            request_order_by(None, None),
            "ORDER BY r.created_at DESC, r.id ASC"
        );
    }

    #[test]
    fn recognized_sort_field_respects_direction() {
        assert_eq!(
            request_order_by(Some("category"), Some("desc")),
            "ORDER BY c.name DESC NULLS LAST, r.id ASC"
        );
        assert_eq!(
            request_order_by(Some("id"), None),
            "ORDER BY r.id ASC NULLS LAST, r.id ASC"
        );
    }

    #[test]
    fn section_tags_parse_case_insensitively() {
        assert_eq!(RequestSection::parse("History"), RequestSection::History);
        assert_eq!(RequestSection::parse("requestinfo"), RequestSection::RequestInfo);
        assert_eq!(RequestSection::parse("anything-else"), RequestSection::Full);
    }
}
