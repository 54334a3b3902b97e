//! Request history models. The history table is an immutable audit log:
//! rows are only ever appended, one per lifecycle event.

use serde::Serialize;
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A history row as stored.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub request_id: DbId,
    pub user_id: DbId,
    pub action: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

/// Display projection with the acting user's profile joined.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryView {
    pub id: DbId,
    pub action: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub user_name: Option<String>,
    pub user_surname: Option<String>,
    pub user_position: Option<String>,
}
