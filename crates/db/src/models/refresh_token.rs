//! Refresh-token rows. Only the SHA-256 hash of a token is stored.

use sqlx::FromRow;

use helpdesk_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub replaced_by: Option<String>,
}

impl RefreshToken {
    /// A token is usable only while unexpired and unrevoked.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
