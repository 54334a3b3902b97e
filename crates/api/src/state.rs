use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mailer::Mailer;
use crate::storage::Storage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: helpdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Attachment store (local disk + `files` metadata).
    pub storage: Arc<Storage>,
    /// Outbound email, disabled when SMTP is unconfigured.
    pub mailer: Arc<Mailer>,
}
