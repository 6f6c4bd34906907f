//! Project row model.

use chrono::NaiveDate;
use muebles_core::project::ProjectRecord;
use muebles_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub description: String,
    pub client: String,
    pub date: NaiveDate,
    pub materials: Vec<String>,
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            description: row.description,
            client: row.client,
            date: row.date,
            materials: row.materials,
            images: row.images,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
