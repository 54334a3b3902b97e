//! Repository for the `refresh_tokens` table. Tokens are stored hashed;
//! lookups take the hash, never the raw token.

use sqlx::PgPool;

use helpdesk_core::types::{DbId, Timestamp};

use crate::models::refresh_token::RefreshToken;

const COLUMNS: &str =
    "id, user_id, token_hash, expires_at, created_at, revoked_at, replaced_by";

/// Provides issue/rotate operations for refresh tokens.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Store a newly issued token hash.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Look a token up by its hash.
    pub async fn find_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_tokens WHERE token_hash = $1");
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a token and record its successor's hash.
    pub async fn revoke(
        pool: &PgPool,
        id: DbId,
        replaced_by_hash: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), replaced_by = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(replaced_by_hash)
        .execute(pool)
        .await?;
        Ok(())
    }
}
