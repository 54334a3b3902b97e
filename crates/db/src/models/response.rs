//! Response entity models. A request carries at most one active response.

use serde::Serialize;
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A response row as stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    pub id: DbId,
    pub text: String,
    pub request_id: DbId,
    pub status_id: DbId,
    pub user_id: DbId,
    pub file_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new response.
#[derive(Debug, Clone)]
pub struct CreateResponse {
    pub text: String,
    pub request_id: DbId,
    pub status_id: DbId,
    pub user_id: DbId,
    pub file_id: Option<DbId>,
}

/// DTO for updating a response.
#[derive(Debug, Clone)]
pub struct UpdateResponse {
    pub text: String,
    pub request_id: DbId,
    pub status_id: DbId,
    pub user_id: DbId,
    pub file_id: Option<DbId>,
}

/// Display projection with author and status names joined.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ResponseView {
    pub id: DbId,
    pub text: String,
    pub request_id: DbId,
    pub request_text: Option<String>,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    pub status_name: Option<String>,
    pub file_id: Option<DbId>,
    pub created_at: Timestamp,
}
