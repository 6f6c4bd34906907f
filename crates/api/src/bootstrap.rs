//! Startup provisioning of the admin account.
//!
//! `ADMIN_EMAIL` / `ADMIN_PASSWORD` seed the first account on postgres and
//! are the only account on the memory backend.

use muebles_core::memory::StaticAdminDirectory;
use muebles_core::store::AdminAccount;
use muebles_db::models::admin_user::CreateAdminUser;
use muebles_db::repositories::AdminUserRepo;
use muebles_db::DbPool;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::ServerConfig;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bootstrap admin password rejected: {0}")]
    WeakPassword(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Credentials from the config, validated and hashed. `None` when either
/// variable is unset.
fn configured_account(config: &ServerConfig) -> Result<Option<(String, String)>, BootstrapError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(None);
    };
    validate_password_strength(password, MIN_PASSWORD_LENGTH)
        .map_err(BootstrapError::WeakPassword)?;
    let hash = hash_password(password).map_err(|e| BootstrapError::Hash(e.to_string()))?;
    Ok(Some((email.clone(), hash)))
}

/// Create the configured admin when the table is still empty.
///
/// Returns `true` if an account was created.
pub async fn ensure_admin_account(
    pool: &DbPool,
    config: &ServerConfig,
) -> Result<bool, BootstrapError> {
    if AdminUserRepo::count(pool).await? > 0 {
        return Ok(false);
    }
    let Some((email, password_hash)) = configured_account(config)? else {
        tracing::warn!("No admin account exists and ADMIN_EMAIL/ADMIN_PASSWORD are unset");
        return Ok(false);
    };

    let user = AdminUserRepo::create(
        pool,
        &CreateAdminUser {
            email,
            password_hash,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin account created");
    Ok(true)
}

/// Admin directory for the memory backend.
///
/// Empty (nobody can sign in) when no credentials are configured.
pub fn memory_admin_directory(config: &ServerConfig) -> Result<StaticAdminDirectory, BootstrapError> {
    let accounts = match configured_account(config)? {
        Some((email, password_hash)) => vec![AdminAccount {
            id: 1,
            email,
            password_hash,
            is_active: true,
        }],
        None => {
            tracing::warn!("ADMIN_EMAIL/ADMIN_PASSWORD unset; the admin panel is unreachable");
            Vec::new()
        }
    };
    Ok(StaticAdminDirectory::new(accounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;
    use crate::auth::password::verify_password;
    use crate::config::StoreBackend;
    use assert_matches::assert_matches;
    use muebles_core::store::AdminDirectory;

    fn config(email: Option<&str>, password: Option<&str>) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            store_backend: StoreBackend::Memory,
            database_url: None,
            asset_dir: "./uploads".into(),
            asset_base_url: "/assets".into(),
            max_upload_bytes: 1024,
            gallery_session_ttl_secs: 60,
            max_gallery_sessions: 8,
            jwt: JwtConfig {
                secret: "bootstrap-test".into(),
                access_token_expiry_mins: 5,
            },
            admin_email: email.map(str::to_string),
            admin_password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_memory_directory_holds_configured_admin() {
        let directory =
            memory_admin_directory(&config(Some("taller@example.com"), Some("roble-macizo")))
                .unwrap();
        let account = directory
            .find_by_email("TALLER@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(account.is_active);
        assert!(verify_password("roble-macizo", &account.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_memory_directory_empty_without_credentials() {
        let directory = memory_admin_directory(&config(Some("taller@example.com"), None)).unwrap();
        assert!(directory
            .find_by_email("taller@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_short_password_is_rejected() {
        assert_matches!(
            memory_admin_directory(&config(Some("taller@example.com"), Some("corta"))),
            Err(BootstrapError::WeakPassword(_))
        );
    }
}
