//! Project records: the raw store shape, the normalized shape the gallery
//! works on, and the admin editor inputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::category::Category;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};
use crate::validation::{entries_not_blank, not_blank};

// ---------------------------------------------------------------------------
// Store shape
// ---------------------------------------------------------------------------

/// A project exactly as a [`ProjectStore`](crate::store::ProjectStore) returns it.
///
/// `category` is kept as free text: older rows carry the Spanish ids and a
/// hand-edited row may carry anything at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
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

// ---------------------------------------------------------------------------
// Normalized shape
// ---------------------------------------------------------------------------

/// One completed furniture build, normalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub client: String,
    pub date: NaiveDate,
    pub materials: Vec<String>,
    /// First entry is the cover image. Never empty.
    pub images: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Normalize a store record.
    ///
    /// Fails when the category is unknown, a required text field is blank,
    /// or there is no image to show. Material tokens are trimmed and empty
    /// ones dropped.
    pub fn from_record(record: ProjectRecord) -> Result<Self, CoreError> {
        let id = record.id;
        let category = Category::parse(&record.category).ok_or_else(|| {
            CoreError::Validation(format!(
                "project {id}: unknown category '{}'",
                record.category
            ))
        })?;

        for (field, value) in [
            ("title", &record.title),
            ("description", &record.description),
            ("client", &record.client),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "project {id}: {field} must not be blank"
                )));
            }
        }

        let images: Vec<String> = record
            .images
            .into_iter()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if images.is_empty() {
            return Err(CoreError::Validation(format!(
                "project {id}: at least one image is required"
            )));
        }

        Ok(Self {
            id,
            title: record.title.trim().to_string(),
            category,
            description: record.description.trim().to_string(),
            client: record.client.trim().to_string(),
            date: record.date,
            materials: clean_tokens(record.materials),
            images,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }

    /// The cover image URL.
    pub fn cover_image(&self) -> &str {
        &self.images[0]
    }

    /// Case-insensitive substring test on title or description.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

impl From<Project> for ProjectRecord {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            category: project.category.id().to_string(),
            description: project.description,
            client: project.client,
            date: project.date,
            materials: project.materials,
            images: project.images,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Normalize a batch of store records, skipping (and logging) the ones
/// that cannot be displayed.
pub fn normalize_records(records: Vec<ProjectRecord>) -> Vec<Project> {
    records
        .into_iter()
        .filter_map(|record| match Project::from_record(record) {
            Ok(project) => Some(project),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed project record");
                None
            }
        })
        .collect()
}

/// Order projects newest first by `date`.
///
/// The sort is stable, so projects sharing a date keep the order the
/// store returned them in.
pub fn sort_newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.date.cmp(&a.date));
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// Split the editor's comma-separated materials field into tokens.
///
/// ```
/// use muebles_core::project::parse_materials;
/// assert_eq!(parse_materials(" Roble , , Laca "), vec!["Roble", "Laca"]);
/// ```
pub fn parse_materials(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Materials as submitted by the editor: either the raw comma-separated
/// text field or an already split list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for MaterialsInput {
    fn default() -> Self {
        MaterialsInput::List(Vec::new())
    }
}

impl MaterialsInput {
    /// Trimmed, non-empty tokens in input order.
    pub fn to_tokens(&self) -> Vec<String> {
        match self {
            MaterialsInput::List(list) => clean_tokens(list.clone()),
            MaterialsInput::Text(text) => parse_materials(text),
        }
    }
}

/// At least one image, and no blank URL among them.
fn images_present(images: &[String]) -> Result<(), ValidationError> {
    if images.is_empty() {
        let mut err = ValidationError::new("images");
        err.message = Some("at least one image is required".into());
        return Err(err);
    }
    entries_not_blank(images)
}

fn materials_present(input: &MaterialsInput) -> Result<(), ValidationError> {
    if input.to_tokens().is_empty() {
        let mut err = ValidationError::new("materials");
        err.message = Some("at least one material is required".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Editor inputs
// ---------------------------------------------------------------------------

/// Admin editor payload for creating a project.
///
/// Image URLs come from a prior asset upload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProject {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    pub category: Category,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(custom(function = "not_blank"))]
    pub client: String,
    pub date: NaiveDate,
    #[serde(default)]
    #[validate(custom(function = "materials_present"))]
    pub materials: MaterialsInput,
    #[validate(custom(function = "images_present"))]
    pub images: Vec<String>,
}

/// Admin editor payload for updating a project. Absent fields are kept.
///
/// `images` replaces the whole list; `append_images` adds freshly uploaded
/// images after the existing ones.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectPatch {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    pub category: Option<Category>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub client: Option<String>,
    pub date: Option<NaiveDate>,
    #[validate(custom(function = "materials_present"))]
    pub materials: Option<MaterialsInput>,
    #[validate(custom(function = "images_present"))]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    #[validate(custom(function = "entries_not_blank"))]
    pub append_images: Vec<String>,
}

impl ProjectPatch {
    /// Resolve the image list after applying this patch to `current`.
    pub fn merged_images(&self, current: &[String]) -> Vec<String> {
        let mut images = self.images.clone().unwrap_or_else(|| current.to_vec());
        images.extend(self.append_images.iter().cloned());
        images
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_input;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn record(category: &str) -> ProjectRecord {
        ProjectRecord {
            id: 7,
            title: " Vajillero ".into(),
            category: category.into(),
            description: "Vajillero de algarrobo".into(),
            client: "Familia Sosa".into(),
            date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
            materials: vec!["Algarrobo".into(), "  ".into(), " Vidrio ".into()],
            images: vec!["/assets/a.jpg".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_record_normalizes_fields() {
        let project = Project::from_record(record("living")).unwrap();
        assert_eq!(project.category, Category::LivingRoom);
        assert_eq!(project.title, "Vajillero");
        assert_eq!(project.materials, vec!["Algarrobo", "Vidrio"]);
        assert_eq!(project.cover_image(), "/assets/a.jpg");
    }

    #[test]
    fn test_from_record_rejects_unknown_category() {
        let result = Project::from_record(record("garage"));
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("garage"));
    }

    #[test]
    fn test_from_record_rejects_missing_images() {
        let mut r = record("kitchen");
        r.images = vec!["  ".into()];
        assert_matches!(Project::from_record(r), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_normalize_records_skips_bad_rows() {
        let mut blank = record("office");
        blank.client = String::new();
        let projects = normalize_records(vec![record("office"), blank]);
        assert_eq!(projects.len(), 1);
    }

    #[test]
    fn test_sort_newest_first_is_stable() {
        let mut a = Project::from_record(record("kitchen")).unwrap();
        a.id = 1;
        let mut b = a.clone();
        b.id = 2;
        let mut c = a.clone();
        c.id = 3;
        c.date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let mut list = vec![a, b, c];
        sort_newest_first(&mut list);
        let ids: Vec<DbId> = list.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_parse_materials_drops_empty_tokens() {
        assert_eq!(
            parse_materials("MDF, Espejo,, Herrajes alemanes ,"),
            vec!["MDF", "Espejo", "Herrajes alemanes"]
        );
        assert!(parse_materials("").is_empty());
    }

    #[test]
    fn test_materials_input_accepts_text_or_list() {
        let text: MaterialsInput = serde_json::from_str("\"Nogal, Cuero\"").unwrap();
        let list: MaterialsInput = serde_json::from_str("[\"Nogal\", \" Cuero \"]").unwrap();
        assert_eq!(text.to_tokens(), list.to_tokens());
    }

    #[test]
    fn test_new_project_requires_image_and_materials() {
        let input: NewProject = serde_json::from_value(serde_json::json!({
            "title": "Rack TV",
            "category": "living-room",
            "description": "Rack flotante",
            "client": "Pérez",
            "date": "2024-05-01",
            "materials": " , ",
            "images": []
        }))
        .unwrap();
        let err = validate_input(&input).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("images") && msg.contains("materials"));
    }

    #[test]
    fn test_patch_validates_only_present_fields() {
        let patch = ProjectPatch {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(validate_input(&patch).is_err());
        assert!(validate_input(&ProjectPatch::default()).is_ok());
    }

    #[test]
    fn test_blank_image_urls_are_rejected() {
        let input: NewProject = serde_json::from_value(serde_json::json!({
            "title": "Rack TV",
            "category": "living-room",
            "description": "Rack flotante",
            "client": "Pérez",
            "date": "2024-05-01",
            "materials": "Petiribí",
            "images": ["/assets/rack.jpg", "   "]
        }))
        .unwrap();
        assert_matches!(validate_input(&input), Err(CoreError::Validation(msg)) if msg.contains("images"));

        let replace = ProjectPatch {
            images: Some(vec![" ".into()]),
            ..Default::default()
        };
        assert!(validate_input(&replace).is_err());

        let append = ProjectPatch {
            append_images: vec!["".into()],
            ..Default::default()
        };
        assert_matches!(validate_input(&append), Err(CoreError::Validation(msg)) if msg.contains("append_images"));
    }

    #[test]
    fn test_patch_merges_images() {
        let current = vec!["/a.jpg".to_string()];
        let patch = ProjectPatch {
            append_images: vec!["/b.jpg".into()],
            ..Default::default()
        };
        assert_eq!(patch.merged_images(&current), vec!["/a.jpg", "/b.jpg"]);

        let patch = ProjectPatch {
            images: Some(vec!["/c.jpg".into()]),
            append_images: vec!["/d.jpg".into()],
            ..Default::default()
        };
        assert_eq!(patch.merged_images(&current), vec!["/c.jpg", "/d.jpg"]);
    }
}
