//! Multipart form parsing shared by the attachment-carrying endpoints.

use std::collections::HashMap;

use axum::extract::Multipart;

use helpdesk_core::types::DbId;

use crate::error::{AppError, AppResult};

/// An uploaded file part, fully buffered.
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus at most one file part from a multipart form.
pub struct FormData {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

/// Drain a multipart body into [`FormData`]. The part named `file_field`
/// (when present and non-empty) is treated as the attachment; every other
/// part is read as text.
pub async fn collect(mut multipart: Multipart, file_field: &str) -> AppResult<FormData> {
    let mut fields = HashMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Invalid multipart payload: {err}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::BadRequest(format!("Invalid file part: {err}")))?
                .to_vec();
            if !bytes.is_empty() {
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|err| AppError::BadRequest(format!("Invalid field '{name}': {err}")))?;
            fields.insert(name, value);
        }
    }

    Ok(FormData { fields, file })
}

impl FormData {
    /// A required text field.
    pub fn required(&self, key: &str) -> AppResult<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("Missing required field '{key}'")))
    }

    /// A required numeric id field.
    pub fn required_id(&self, key: &str) -> AppResult<DbId> {
        self.required(key)?
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Field '{key}' must be a numeric id")))
    }

    /// An optional numeric id field.
    pub fn optional_id(&self, key: &str) -> AppResult<Option<DbId>> {
        match self.fields.get(key).map(String::as_str).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("Field '{key}' must be a numeric id"))),
        }
    }
}
