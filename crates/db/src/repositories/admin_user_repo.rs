//! Repository for the `admin_users` table.

use muebles_core::types::DbId;
use sqlx::PgPool;

use crate::models::admin_user::{AdminUser, CreateAdminUser};

/// Column list shared across queries.
const COLUMNS: &str = "id, email, password_hash, is_active, last_login_at, created_at, updated_at";

/// Provides lookups and bootstrap inserts for admin accounts.
pub struct AdminUserRepo;

impl AdminUserRepo {
    /// Insert a new admin account, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdminUser) -> Result<AdminUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_users (email, password_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(input.email.trim())
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find an account by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<AdminUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, AdminUser>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Stamp a successful sign-in.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admin_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
