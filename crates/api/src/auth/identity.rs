//! Admin identity provider.
//!
//! Signs admins in against an [`AdminDirectory`], issues JWT access tokens,
//! revokes them on sign-out, and broadcasts a [`SessionChange`] on every
//! sign-in and sign-out.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use muebles_core::error::CoreError;
use muebles_core::roles::ROLE_ADMIN;
use muebles_core::store::AdminDirectory;
use muebles_core::types::{DbId, Timestamp};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::auth::jwt::{Claims, JwtConfig, TokenSigner};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};

/// Buffered session changes per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// The signed-in admin as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUser {
    pub id: DbId,
    pub email: String,
    pub role: String,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            role: claims.role.clone(),
        }
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub access_token: String,
    pub expires_at: Timestamp,
    pub user: SessionUser,
}

/// Published on every sign-in (`Some`) and sign-out (`None`).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChange {
    pub user: Option<SessionUser>,
}

pub struct IdentityProvider {
    directory: Arc<dyn AdminDirectory>,
    signer: TokenSigner,
    /// Revoked token ids mapped to the token expiry (Unix seconds).
    revoked: RwLock<HashMap<String, i64>>,
    changes: broadcast::Sender<SessionChange>,
}

impl IdentityProvider {
    pub fn new(directory: Arc<dyn AdminDirectory>, jwt: JwtConfig) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            directory,
            signer: TokenSigner::new(&jwt),
            revoked: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Verify credentials and open a session.
    ///
    /// Unknown email or wrong password is `Unauthorized`; a deactivated
    /// account is `Forbidden`.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let account = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !account.is_active {
            return Err(CoreError::Forbidden("Account is deactivated".into()).into());
        }

        let valid = verify_password(password, &account.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !valid {
            tracing::info!(user_id = account.id, "Admin sign-in rejected: wrong password");
            return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
        }

        if let Err(e) = self.directory.record_login(account.id).await {
            tracing::warn!(user_id = account.id, error = %e, "Failed to record admin login");
        }

        let (access_token, claims) = self
            .signer
            .issue(account.id, &account.email, ROLE_ADMIN)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
        let user = SessionUser::from(&claims);

        tracing::info!(user_id = user.id, "Admin signed in");
        self.publish(Some(user.clone()));

        Ok(Session {
            access_token,
            expires_at,
            user,
        })
    }

    /// Decode a bearer token, rejecting expired, forged and signed-out tokens.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, CoreError> {
        let claims = self
            .signer
            .verify(token)
            .map_err(|_| CoreError::Unauthorized("Invalid or expired token".into()))?;
        if self.revoked.read().await.contains_key(&claims.jti) {
            return Err(CoreError::Unauthorized("Session has been signed out".into()));
        }
        Ok(claims)
    }

    /// The session behind `token`, or `None` when there is no usable one.
    pub async fn current_session(&self, token: Option<&str>) -> Option<SessionUser> {
        let token = token?;
        self.authenticate(token)
            .await
            .ok()
            .map(|claims| SessionUser::from(&claims))
    }

    /// Revoke the token. Later requests carrying it are rejected.
    pub async fn sign_out(&self, claims: &Claims) {
        self.revoked
            .write()
            .await
            .insert(claims.jti.clone(), claims.exp);
        tracing::info!(user_id = claims.sub, "Admin signed out");
        self.publish(None);
    }

    /// Receive every later session change.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    /// Forget revocations of tokens that have expired anyway.
    pub async fn purge_revoked(&self) -> usize {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        let before = revoked.len();
        revoked.retain(|_, exp| *exp > now);
        before - revoked.len()
    }

    fn publish(&self, user: Option<SessionUser>) {
        // No subscribers is fine.
        let _ = self.changes.send(SessionChange { user });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use assert_matches::assert_matches;
    use muebles_core::memory::StaticAdminDirectory;
    use muebles_core::store::AdminAccount;

    const PASSWORD: &str = "placard-empotrado";

    fn provider() -> IdentityProvider {
        let hash = hash_password(PASSWORD).unwrap();
        let directory = StaticAdminDirectory::new(vec![
            AdminAccount {
                id: 1,
                email: "taller@example.com".into(),
                password_hash: hash.clone(),
                is_active: true,
            },
            AdminAccount {
                id: 2,
                email: "baja@example.com".into(),
                password_hash: hash,
                is_active: false,
            },
        ]);
        IdentityProvider::new(
            Arc::new(directory),
            JwtConfig {
                secret: "identity-test-secret".into(),
                access_token_expiry_mins: 60,
            },
        )
    }

    #[tokio::test]
    async fn test_sign_in_and_authenticate() {
        let identity = provider();
        let session = identity.sign_in("taller@example.com", PASSWORD).await.unwrap();
        assert_eq!(session.user.role, ROLE_ADMIN);

        let claims = identity.authenticate(&session.access_token).await.unwrap();
        assert_eq!(claims.sub, 1);
    }

    #[tokio::test]
    async fn test_wrong_credentials_are_unauthorized() {
        let identity = provider();
        assert_matches!(
            identity.sign_in("taller@example.com", "nope").await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
        assert_matches!(
            identity.sign_in("nadie@example.com", PASSWORD).await,
            Err(AppError::Core(CoreError::Unauthorized(_)))
        );
    }

    #[tokio::test]
    async fn test_deactivated_account_is_forbidden() {
        let identity = provider();
        assert_matches!(
            identity.sign_in("baja@example.com", PASSWORD).await,
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let identity = provider();
        let session = identity.sign_in("taller@example.com", PASSWORD).await.unwrap();
        let claims = identity.authenticate(&session.access_token).await.unwrap();

        identity.sign_out(&claims).await;

        assert_matches!(
            identity.authenticate(&session.access_token).await,
            Err(CoreError::Unauthorized(_))
        );
        assert!(identity
            .current_session(Some(&session.access_token))
            .await
            .is_none());
        // Not expired yet, so the revocation is kept.
        assert_eq!(identity.purge_revoked().await, 0);
    }

    #[tokio::test]
    async fn test_subscribers_see_sign_in_and_sign_out() {
        let identity = provider();
        let mut changes = identity.subscribe();

        let session = identity.sign_in("taller@example.com", PASSWORD).await.unwrap();
        let change = changes.recv().await.unwrap();
        assert_eq!(change.user.as_ref().map(|u| u.id), Some(1));

        let claims = identity.authenticate(&session.access_token).await.unwrap();
        identity.sign_out(&claims).await;
        assert_eq!(changes.recv().await.unwrap(), SessionChange { user: None });
    }
}
