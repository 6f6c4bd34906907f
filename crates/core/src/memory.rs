//! In-process store implementations.
//!
//! Used by the `memory` backend of the API server (demo installs without a
//! database) and by tests. Contents live for the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::inquiry::{ContactInquiry, NewInquiry, STATUS_NEW};
use crate::project::{NewProject, ProjectPatch, ProjectRecord};
use crate::seed::fallback_projects;
use crate::store::{AdminAccount, AdminDirectory, InquiryStore, ProjectStore, StoreError};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
    last_id: DbId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            last_id: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    table: RwLock<Table<ProjectRecord>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `records`. New ids continue after the
    /// highest one given.
    pub fn with_records(records: Vec<ProjectRecord>) -> Self {
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            table: RwLock::new(Table {
                rows: records,
                last_id,
            }),
        }
    }

    /// A store holding the sample projects.
    pub fn with_sample_projects() -> Self {
        Self::with_records(fallback_projects().into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn find(&self, id: DbId) -> Result<Option<ProjectRecord>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, input: &NewProject) -> Result<ProjectRecord, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let now = Utc::now();
        let record = ProjectRecord {
            id: table.last_id,
            title: input.title.trim().to_string(),
            category: input.category.id().to_string(),
            description: input.description.trim().to_string(),
            client: input.client.trim().to_string(),
            date: input.date,
            materials: input.materials.to_tokens(),
            images: input.images.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<ProjectRecord>, StoreError> {
        let mut table = self.table.write().await;
        let Some(record) = table.rows.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &patch.title {
            record.title = title.trim().to_string();
        }
        if let Some(category) = patch.category {
            record.category = category.id().to_string();
        }
        if let Some(description) = &patch.description {
            record.description = description.trim().to_string();
        }
        if let Some(client) = &patch.client {
            record.client = client.trim().to_string();
        }
        if let Some(date) = patch.date {
            record.date = date;
        }
        if let Some(materials) = &patch.materials {
            record.materials = materials.to_tokens();
        }
        record.images = patch.merged_images(&record.images);
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        Ok(table.rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Inquiries
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryInquiryStore {
    table: RwLock<Table<ContactInquiry>>,
}

impl InMemoryInquiryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InquiryStore for InMemoryInquiryStore {
    async fn list(&self) -> Result<Vec<ContactInquiry>, StoreError> {
        let mut rows = self.table.read().await.rows.clone();
        // Ids are monotonic, so they break timestamp ties in insertion order.
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn create(&self, input: &NewInquiry) -> Result<ContactInquiry, StoreError> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let input = input.clone().normalized();
        let inquiry = ContactInquiry {
            id: table.last_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            project_type: input.project_type,
            budget: input.budget,
            message: input.message,
            timestamp: Utc::now(),
            status: STATUS_NEW.to_string(),
        };
        table.rows.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|r| r.id != id);
        Ok(table.rows.len() != before)
    }
}

// ---------------------------------------------------------------------------
// Admin accounts
// ---------------------------------------------------------------------------

/// A fixed set of admin accounts.
#[derive(Debug, Default)]
pub struct StaticAdminDirectory {
    accounts: Vec<AdminAccount>,
}

impl StaticAdminDirectory {
    pub fn new(accounts: Vec<AdminAccount>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl AdminDirectory for StaticAdminDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>, StoreError> {
        let email = email.trim();
        Ok(self
            .accounts
            .iter()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }
}
