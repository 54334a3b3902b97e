//! Reference-table models: categories, priorities, request types, and the
//! fixed status/role tables.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A request category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating or renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

/// A request priority level.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Priority {
    pub id: DbId,
    pub level: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePriority {
    pub level: String,
}

/// A request type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequestType {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRequestType {
    pub name: String,
}

/// A row from one of the fixed status tables.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusRow {
    pub id: DbId,
    pub name: String,
}
