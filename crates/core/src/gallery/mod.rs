//! The public gallery: filter/search engine plus the detail view.
//!
//! [`Gallery`] is the single owner of one gallery instance. All
//! operations except [`Gallery::load`] are synchronous transformations over
//! in-memory data.

pub mod detail;
pub mod engine;
pub mod filter;
pub mod listing;

pub use detail::{DetailState, DetailView};
pub use engine::{GalleryEngine, ListSource, LoadTicket};
pub use filter::{filter_indices, CategoryTally};
pub use listing::{AdminListing, StoredProject};

use serde::Serialize;

use crate::category::CategoryFilter;
use crate::error::CoreError;
use crate::project::{Project, ProjectRecord};
use crate::store::{ProjectStore, StoreError};
use crate::types::DbId;

#[derive(Debug, Default)]
pub struct Gallery {
    engine: GalleryEngine,
    detail: DetailView,
}

/// Read view of a gallery at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct GallerySnapshot {
    pub loading: bool,
    pub using_fallback: bool,
    pub category: CategoryFilter,
    pub search: String,
    pub projects: Vec<Project>,
    pub no_results: bool,
    pub tally: CategoryTally,
    pub open_project: Option<Project>,
    pub favorites: Vec<DbId>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(&self) -> &GalleryEngine {
        &self.engine
    }

    pub fn detail(&self) -> &DetailView {
        &self.detail
    }

    // -- loading ------------------------------------------------------------

    pub async fn load(&mut self, store: &dyn ProjectStore) -> bool {
        self.engine.load(store).await
    }

    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        self.engine.begin_load()
    }

    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Vec<ProjectRecord>, StoreError>,
    ) -> bool {
        self.engine.complete_load(ticket, outcome)
    }

    /// Adopt a new canonical list. Closes the detail view if the open
    /// project is gone.
    pub fn replace_projects(&mut self, records: Vec<ProjectRecord>) -> bool {
        let replaced = self.engine.replace_projects(records);
        if let Some(id) = self.detail.open_project_id() {
            if self.engine.project(id).is_none() {
                tracing::debug!(project_id = id, "Open project removed, closing detail view");
                self.detail.close();
            }
        }
        replaced
    }

    pub fn dispose(&mut self) {
        self.engine.dispose();
        self.detail.close();
    }

    // -- filters ------------------------------------------------------------

    pub fn set_category(&mut self, value: &str) -> bool {
        self.engine.set_category(value)
    }

    pub fn set_search_term(&mut self, text: &str) {
        self.engine.set_search_term(text);
    }

    // -- detail view --------------------------------------------------------

    /// Open the detail view on a project of the canonical list.
    pub fn select(&mut self, id: DbId) -> Result<&Project, CoreError> {
        self.require_project(id)?;
        self.detail.select(id);
        self.require_project(id)
    }

    pub fn close(&mut self) {
        self.detail.close();
    }

    /// Flip the favorite mark on a project of the canonical list.
    pub fn toggle_favorite(&mut self, id: DbId) -> Result<bool, CoreError> {
        self.require_project(id)?;
        Ok(self.detail.toggle_favorite(id))
    }

    pub fn open_project(&self) -> Option<&Project> {
        self.detail
            .open_project_id()
            .and_then(|id| self.engine.project(id))
    }

    fn require_project(&self, id: DbId) -> Result<&Project, CoreError> {
        self.engine.project(id).ok_or(CoreError::NotFound {
            entity: "project",
            id,
        })
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            loading: self.engine.is_loading(),
            using_fallback: self.engine.source() == ListSource::Fallback,
            category: self.engine.category(),
            search: self.engine.search_term().to_string(),
            projects: self.engine.displayed().cloned().collect(),
            no_results: self.engine.is_empty_result(),
            tally: *self.engine.category_tally(),
            open_project: self.open_project().cloned(),
            favorites: self.detail.favorites().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, Utc};

    fn seeded() -> Gallery {
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_load().unwrap();
        gallery.complete_load(ticket, Ok(Vec::new()));
        gallery
    }

    fn record(id: DbId, title: &str) -> ProjectRecord {
        ProjectRecord {
            id,
            title: title.into(),
            category: "kitchen".into(),
            description: "Mueble a medida".into(),
            client: "Cliente".into(),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            materials: vec!["Pino".into()],
            images: vec!["/assets/x.jpg".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_select_unknown_project_is_not_found() {
        let mut gallery = seeded();
        assert_matches!(
            gallery.select(99),
            Err(CoreError::NotFound { entity: "project", id: 99 })
        );
        assert_eq!(gallery.detail().state(), DetailState::Closed);
    }

    #[test]
    fn test_select_does_not_mutate_project() {
        let mut gallery = seeded();
        let before = gallery.engine().project(3).cloned().unwrap();
        let shown = gallery.select(3).unwrap().clone();
        assert_eq!(shown, before);
        assert_eq!(gallery.engine().project(3), Some(&before));
        assert_eq!(gallery.open_project().map(|p| p.id), Some(3));
    }

    #[test]
    fn test_filters_do_not_close_detail_view() {
        let mut gallery = seeded();
        gallery.select(1).unwrap();
        gallery.set_category("office");
        assert_eq!(gallery.open_project().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_replace_closes_view_when_project_removed() {
        let mut gallery = seeded();
        gallery.select(2).unwrap();
        gallery.replace_projects(vec![record(2, "Placard"), record(8, "Alacena")]);
        assert_eq!(gallery.detail().state(), DetailState::Open(2));

        gallery.replace_projects(vec![record(8, "Alacena")]);
        assert_eq!(gallery.detail().state(), DetailState::Closed);
    }

    #[test]
    fn test_toggle_favorite_requires_known_project() {
        let mut gallery = seeded();
        assert!(gallery.toggle_favorite(5).unwrap());
        assert_matches!(gallery.toggle_favorite(42), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut gallery = seeded();
        gallery.set_category("living-room");
        gallery.select(6).unwrap();
        gallery.toggle_favorite(3).unwrap();

        let snap = gallery.snapshot();
        assert!(!snap.loading);
        assert!(snap.using_fallback);
        assert_eq!(snap.category, CategoryFilter::parse("living-room").unwrap());
        let ids: Vec<DbId> = snap.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 6]);
        assert!(!snap.no_results);
        assert_eq!(snap.tally.total(), 6);
        assert_eq!(snap.open_project.map(|p| p.id), Some(6));
        assert_eq!(snap.favorites, vec![3]);
    }

    #[test]
    fn test_dispose_closes_view() {
        let mut gallery = seeded();
        gallery.select(4).unwrap();
        gallery.dispose();
        assert!(gallery.engine().is_disposed());
        assert!(gallery.open_project().is_none());
    }
}
