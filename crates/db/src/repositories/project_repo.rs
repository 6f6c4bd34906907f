//! Repository for the `projects` table.

use muebles_core::project::{NewProject, ProjectPatch};
use muebles_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::ProjectRow;

/// Column list shared across queries.
const COLUMNS: &str = "id, title, category, description, client, date, \
                       materials, images, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// All projects, newest `date` first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY date DESC, id ASC");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a project, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewProject) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (title, category, description, client, date, materials, images)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(input.title.trim())
            .bind(input.category.id())
            .bind(input.description.trim())
            .bind(input.client.trim())
            .bind(input.date)
            .bind(input.materials.to_tokens())
            .bind(&input.images)
            .fetch_one(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `patch` are applied;
    /// `append_images` is concatenated after the resulting image list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &ProjectPatch,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                client = COALESCE($5, client),
                date = COALESCE($6, date),
                materials = COALESCE($7, materials),
                images = COALESCE($8, images) || $9::text[]
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(patch.title.as_deref().map(str::trim))
            .bind(patch.category.map(|c| c.id()))
            .bind(patch.description.as_deref().map(str::trim))
            .bind(patch.client.as_deref().map(str::trim))
            .bind(patch.date)
            .bind(patch.materials.as_ref().map(|m| m.to_tokens()))
            .bind(&patch.images)
            .bind(&patch.append_images)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
