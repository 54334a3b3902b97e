//! Repository for the `users`, `user_roles`, and `password_history` tables.

use sqlx::PgPool;

use helpdesk_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User, UserProfile};

const COLUMNS: &str = "\
    id, name, surname, username, position, department, mob_tel_number, \
    office_tel_number, allow_notification, email, password_hash, \
    profile_photo_id, created_at";

const PROFILE_COLUMNS: &str = "\
    u.id, u.name, u.surname, u.username, u.position, u.department, \
    u.mob_tel_number, u.office_tel_number, u.allow_notification, u.email, \
    u.profile_photo_id, string_agg(r.name, ',') AS roles";

const PROFILE_GROUP_BY: &str = "\
    GROUP BY u.id, u.name, u.surname, u.username, u.position, u.department, \
    u.mob_tel_number, u.office_tel_number, u.allow_notification, u.email, \
    u.profile_photo_id";

/// Provides account operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user and its role association in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (name, surname, username, position, department,
                                mob_tel_number, office_tel_number, allow_notification,
                                email, password_hash, profile_photo_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.username)
            .bind(&input.position)
            .bind(&input.department)
            .bind(&input.mob_tel_number)
            .bind(&input.office_tel_number)
            .bind(input.allow_notification)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.profile_photo_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(input.role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find an active user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by username (login path).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users WHERE username = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Whether any user (deleted or not) already holds this email.
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Profile projection for a single active user.
    pub async fn find_profile(pool: &PgPool, id: DbId) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM users u
             LEFT JOIN user_roles ur ON ur.user_id = u.id
             LEFT JOIN roles r ON r.id = ur.role_id
             WHERE u.id = $1 AND u.deleted_at IS NULL
             {PROFILE_GROUP_BY}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all active users with their role names.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {PROFILE_COLUMNS} FROM users u
             LEFT JOIN user_roles ur ON ur.user_id = u.id
             LEFT JOIN roles r ON r.id = ur.role_id
             WHERE u.deleted_at IS NULL
             {PROFILE_GROUP_BY}
             ORDER BY u.name ASC, u.id ASC"
        );
        sqlx::query_as::<_, UserProfile>(&query).fetch_all(pool).await
    }

    /// Update a user's profile fields and replace its role association.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET name = $2, surname = $3, position = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.surname)
            .bind(&input.position)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(id)
            .bind(input.role_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(user))
    }

    /// Soft-delete a user. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The first role name associated with a user, used for token claims.
    pub async fn primary_role(pool: &PgPool, user_id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM user_roles ur
             JOIN roles r ON r.id = ur.role_id
             WHERE ur.user_id = $1
             ORDER BY ur.role_id ASC
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// All prior password hashes for a user, newest first.
    pub async fn password_history(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM password_history
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Archive the current hash and store the new one, in one transaction.
    pub async fn rotate_password(
        pool: &PgPool,
        user_id: DbId,
        old_hash: &str,
        new_hash: &str,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("INSERT INTO password_history (user_id, password_hash) VALUES ($1, $2)")
            .bind(user_id)
            .bind(old_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id)
            .bind(new_hash)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
