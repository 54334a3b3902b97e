//! Attachment metadata models. File bytes live on disk; rows here carry
//! the name, storage path, and content type.

use serde::Serialize;
use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

/// A stored attachment's metadata row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StoredFile {
    pub id: DbId,
    pub file_name: String,
    pub file_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploaded_at: Timestamp,
}

/// DTO for inserting a new attachment row.
#[derive(Debug, Clone)]
pub struct CreateStoredFile {
    pub file_name: String,
    pub file_path: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Public attachment reference returned inside request/response DTOs.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    pub id: DbId,
    pub file_name: String,
    pub url: String,
}
