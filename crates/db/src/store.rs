//! Core store traits backed by PostgreSQL.

use async_trait::async_trait;
use muebles_core::inquiry::{ContactInquiry, NewInquiry};
use muebles_core::project::{NewProject, ProjectPatch, ProjectRecord};
use muebles_core::store::{
    AdminAccount, AdminDirectory, InquiryStore, ProjectStore, StoreError,
};
use muebles_core::types::DbId;

use crate::repositories::{AdminUserRepo, InquiryRepo, ProjectRepo};
use crate::DbPool;

/// Map a `sqlx` failure onto the store error taxonomy.
///
/// Connection-level failures are `Unavailable`; everything the server
/// answered is `Backend`.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: DbPool,
}

impl PgProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let rows = ProjectRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError> {
        let row = ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn create(&self, input: &NewProject) -> Result<ProjectRecord, StoreError> {
        let row = ProjectRepo::create(&self.pool, input)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<ProjectRecord>, StoreError> {
        let row = ProjectRepo::update(&self.pool, id, patch)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        ProjectRepo::delete(&self.pool, id).await.map_err(store_error)
    }
}

#[derive(Debug, Clone)]
pub struct PgInquiryStore {
    pool: DbPool,
}

impl PgInquiryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InquiryStore for PgInquiryStore {
    async fn list(&self) -> Result<Vec<ContactInquiry>, StoreError> {
        let rows = InquiryRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, input: &NewInquiry) -> Result<ContactInquiry, StoreError> {
        let input = input.clone().normalized();
        let row = InquiryRepo::create(&self.pool, &input)
            .await
            .map_err(store_error)?;
        Ok(row.into())
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        InquiryRepo::delete(&self.pool, id).await.map_err(store_error)
    }
}

#[derive(Debug, Clone)]
pub struct PgAdminDirectory {
    pool: DbPool,
}

impl PgAdminDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminDirectory for PgAdminDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let user = AdminUserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(store_error)?;
        Ok(user.map(Into::into))
    }

    async fn record_login(&self, id: DbId) -> Result<(), StoreError> {
        AdminUserRepo::record_login(&self.pool, id)
            .await
            .map_err(store_error)
    }
}
