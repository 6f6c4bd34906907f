//! Repository for the `contact_inquiries` table.

use muebles_core::inquiry::NewInquiry;
use muebles_core::types::DbId;
use sqlx::PgPool;

use crate::models::inquiry::InquiryRow;

/// Column list shared across queries.
const COLUMNS: &str = "id, name, email, phone, project_type, budget, message, \"timestamp\", status";

/// Provides create/list/delete for contact inquiries.
pub struct InquiryRepo;

impl InquiryRepo {
    /// Insert an inquiry with the default `new` status. Text fields are
    /// stored as given; normalize before calling.
    pub async fn create(pool: &PgPool, input: &NewInquiry) -> Result<InquiryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_inquiries (name, email, phone, project_type, budget, message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InquiryRow>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.project_type.as_str())
            .bind(input.budget.map(|b| b.as_str()))
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// All inquiries, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<InquiryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_inquiries ORDER BY \"timestamp\" DESC, id DESC"
        );
        sqlx::query_as::<_, InquiryRow>(&query).fetch_all(pool).await
    }

    /// Delete an inquiry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
