//! Contracts of the backends the site talks to.
//!
//! - [`ProjectStore`] -- the project portfolio collection.
//! - [`InquiryStore`] -- contact inquiries.
//! - [`AssetStore`] -- uploaded project images.
//! - [`AdminDirectory`] -- admin accounts the identity layer signs in against.
//!
//! `muebles-db` provides PostgreSQL implementations, [`crate::memory`]
//! in-process ones and [`crate::assets`] a local-disk asset store.

use async_trait::async_trait;

use crate::inquiry::{ContactInquiry, NewInquiry};
use crate::project::{NewProject, ProjectPatch, ProjectRecord};
use crate::types::DbId;

/// Failure reported by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached at all.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error.
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Asset I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid asset name: {0}")]
    InvalidAssetName(String),

    #[error("Asset not managed by this store: {0}")]
    ForeignAsset(String),
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All projects. No ordering is guaranteed.
    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError>;

    async fn find(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError>;

    /// Insert a project; the store assigns `id`, `created_at` and `updated_at`.
    async fn create(&self, input: &NewProject) -> Result<ProjectRecord, StoreError>;

    /// Apply a patch. Returns `None` if no project has this id.
    async fn update(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<ProjectRecord>, StoreError>;

    /// Returns `true` if a project was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    /// All inquiries, newest first.
    async fn list(&self) -> Result<Vec<ContactInquiry>, StoreError>;

    /// Persist a submission with `status = "new"` and the current timestamp.
    async fn create(&self, input: &NewInquiry) -> Result<ContactInquiry, StoreError>;

    /// Returns `true` if an inquiry was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `bytes` and return the public URL they are served from.
    async fn upload(&self, bytes: Vec<u8>, suggested_name: &str) -> Result<String, StoreError>;

    /// Remove a previously uploaded asset. Returns `false` if it was already gone.
    async fn delete(&self, public_url: &str) -> Result<bool, StoreError>;
}

/// An administrator account as seen by the sign-in flow.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub id: DbId,
    pub email: String,
    /// PHC-formatted Argon2id hash.
    pub password_hash: String,
    pub is_active: bool,
}

#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Look up an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError>;

    /// Stamp a successful sign-in. Backends without login tracking ignore it.
    async fn record_login(&self, _id: DbId) -> Result<(), StoreError> {
        Ok(())
    }
}
