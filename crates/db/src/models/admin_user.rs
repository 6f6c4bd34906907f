//! Admin account row model and DTOs.

use muebles_core::store::AdminAccount;
use muebles_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `admin_users` table.
///
/// Carries the password hash; never serialize it into a response.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an admin account. `password_hash` is already hashed.
#[derive(Debug)]
pub struct CreateAdminUser {
    pub email: String,
    pub password_hash: String,
}

impl From<AdminUser> for AdminAccount {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password_hash: user.password_hash,
            is_active: user.is_active,
        }
    }
}
