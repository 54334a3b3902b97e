//! Local-disk attachment store.
//!
//! Blobs are written under an uploads root with uuid file names; metadata
//! lives in the `files` table. The rest of the system only ever sees the
//! opaque file id.

use std::path::PathBuf;

use uuid::Uuid;

use helpdesk_core::error::CoreError;
use helpdesk_core::types::DbId;
use helpdesk_db::models::file::{CreateStoredFile, FileInfo, StoredFile};
use helpdesk_db::repositories::FileRepo;
use helpdesk_db::DbPool;

use crate::error::{AppError, AppResult};

/// Content types accepted for upload.
const ALLOWED_CONTENT_TYPES: &[&str] = &["application/pdf", "image/jpeg", "image/png"];

/// File extensions accepted for upload (lowercase, without the dot).
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif"];

/// Attachment store rooted at a local directory.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory from the `UPLOADS_DIR` env var, default `uploads`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".into()))
    }

    /// Public download URL for an attachment id.
    pub fn public_url(id: DbId) -> String {
        format!("/api/v1/files/{id}")
    }

    /// Validate and persist an uploaded file, returning its metadata row.
    ///
    /// The blob is written first; the metadata insert only happens once the
    /// bytes are safely on disk.
    pub async fn upload(
        &self,
        pool: &DbPool,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> AppResult<StoredFile> {
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(AppError::Core(CoreError::Validation(
                "Only PDF or image files are allowed.".to_string(),
            )));
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Core(CoreError::Validation(
                "Invalid file extension. Only PDF or image files are allowed.".to_string(),
            )));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(storage_unavailable)?;

        let blob_name = format!("{}.{extension}", Uuid::new_v4());
        let blob_path = self.root.join(&blob_name);
        tokio::fs::write(&blob_path, bytes)
            .await
            .map_err(storage_unavailable)?;

        let stored = FileRepo::create(
            pool,
            &CreateStoredFile {
                file_name: file_name.to_string(),
                file_path: blob_path.to_string_lossy().into_owned(),
                content_type: content_type.to_string(),
                size_bytes: bytes.len() as i64,
            },
        )
        .await?;

        tracing::info!(
            file_id = stored.id,
            file_name = %stored.file_name,
            size_bytes = stored.size_bytes,
            "File uploaded"
        );
        Ok(stored)
    }

    /// Resolve an attachment id to its public reference.
    pub async fn fetch(&self, pool: &DbPool, id: DbId) -> AppResult<FileInfo> {
        let file = FileRepo::find_by_id(pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;
        Ok(FileInfo {
            id: file.id,
            file_name: file.file_name,
            url: Self::public_url(id),
        })
    }

    /// Read an attachment's bytes for download.
    pub async fn download(&self, pool: &DbPool, id: DbId) -> AppResult<(StoredFile, Vec<u8>)> {
        let file = FileRepo::find_by_id(pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "File", id }))?;
        let bytes = tokio::fs::read(&file.file_path).await.map_err(|err| {
            tracing::error!(error = %err, path = %file.file_path, "Failed to read stored file");
            AppError::Core(CoreError::ServiceUnavailable(
                "File could not be accessed at the moment.".to_string(),
            ))
        })?;
        Ok((file, bytes))
    }

    /// Remove an attachment: blob from disk, metadata soft-deleted.
    ///
    /// Returns `true` when a metadata row was retired.
    pub async fn delete(&self, pool: &DbPool, id: DbId) -> AppResult<bool> {
        let Some(file) = FileRepo::find_by_id(pool, id).await? else {
            return Err(AppError::Core(CoreError::NotFound { entity: "File", id }));
        };

        if let Err(err) = tokio::fs::remove_file(&file.file_path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                return Err(AppError::Core(CoreError::ServiceUnavailable(
                    "File storage is unavailable for deletion.".to_string(),
                )));
            }
        }

        let deleted = FileRepo::soft_delete(pool, id).await?;
        tracing::info!(file_id = id, "File deleted");
        Ok(deleted)
    }

    /// Best-effort deletion used when an attachment is being superseded.
    ///
    /// Failures are logged and swallowed: replacing an attachment must not
    /// fail because the old blob could not be cleaned up.
    pub async fn delete_superseded(&self, pool: &DbPool, id: DbId) {
        if let Err(err) = self.delete(pool, id).await {
            tracing::warn!(file_id = id, error = %err, "Failed to delete superseded attachment");
        }
    }
}

fn storage_unavailable(err: std::io::Error) -> AppError {
    tracing::error!(error = %err, "File storage I/O error");
    AppError::Core(CoreError::ServiceUnavailable(
        "File storage is unavailable at the moment.".to_string(),
    ))
}
