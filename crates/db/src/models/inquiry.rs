//! Contact inquiry row model.

use muebles_core::inquiry::{BudgetRange, ContactInquiry, ProjectType};
use muebles_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `contact_inquiries` table.
///
/// `project_type` and `budget` are stored as their wire names.
#[derive(Debug, Clone, FromRow)]
pub struct InquiryRow {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub project_type: String,
    pub budget: Option<String>,
    pub message: String,
    pub timestamp: Timestamp,
    pub status: String,
}

impl From<InquiryRow> for ContactInquiry {
    fn from(row: InquiryRow) -> Self {
        let project_type = ProjectType::from_name(&row.project_type).unwrap_or_else(|| {
            tracing::warn!(id = row.id, project_type = %row.project_type, "Unknown inquiry project type");
            ProjectType::Other
        });
        let budget = row.budget.as_deref().and_then(|name| {
            let parsed = BudgetRange::from_name(name);
            if parsed.is_none() {
                tracing::warn!(id = row.id, budget = name, "Unknown inquiry budget range");
            }
            parsed
        });
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            project_type,
            budget,
            message: row.message,
            timestamp: row.timestamp,
            status: row.status,
        }
    }
}
