//! The gallery filter/search engine.
//!
//! Owns the canonical project list of one gallery instance and the
//! displayed subset derived from it. The displayed subset is recomputed
//! only by [`GalleryEngine::complete_load`], [`GalleryEngine::set_category`],
//! [`GalleryEngine::set_search_term`] and [`GalleryEngine::replace_projects`];
//! the tally only when the canonical list changes.
//!
//! Canonical order is newest `date` first (stable, so equal dates keep the
//! store's order). Filtering never reorders.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::category::CategoryFilter;
use crate::project::{normalize_records, sort_newest_first, Project, ProjectRecord};
use crate::seed::fallback_projects;
use crate::store::{ProjectStore, StoreError};
use crate::types::DbId;

use super::filter::{filter_indices, CategoryTally};

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// Proof that a load was started on a particular engine.
///
/// Handing a stale ticket to [`GalleryEngine::complete_load`] (the engine
/// was disposed, or its list replaced meanwhile) discards the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Loading(LoadTicket),
    Ready,
    Disposed,
}

/// Where the canonical list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    /// Nothing loaded yet.
    Empty,
    Store,
    /// The store failed or had nothing to show; the seed fixture is in use.
    Fallback,
}

#[derive(Debug)]
pub struct GalleryEngine {
    projects: Vec<Project>,
    displayed: Vec<usize>,
    category: CategoryFilter,
    search_term: String,
    tally: CategoryTally,
    phase: Phase,
    source: ListSource,
}

impl Default for GalleryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryEngine {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            displayed: Vec::new(),
            category: CategoryFilter::All,
            search_term: String::new(),
            tally: CategoryTally::default(),
            phase: Phase::Idle,
            source: ListSource::Empty,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load the canonical list from `store`, falling back to the seed
    /// fixture. Runs at most once per engine; returns whether this call
    /// populated the list.
    pub async fn load(&mut self, store: &dyn ProjectStore) -> bool {
        let Some(ticket) = self.begin_load() else {
            return false;
        };
        let outcome = store.list().await;
        self.complete_load(ticket, outcome)
    }

    /// Mark the engine as loading and hand out the ticket for the result.
    ///
    /// Returns `None` if a load already ran or is in flight, or the engine
    /// is disposed.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if self.phase != Phase::Idle {
            tracing::debug!(phase = ?self.phase, "Gallery load already activated");
            return None;
        }
        let ticket = LoadTicket(NEXT_TICKET.fetch_add(1, Ordering::Relaxed));
        self.phase = Phase::Loading(ticket);
        Some(ticket)
    }

    /// Apply the result of the store call started with `ticket`.
    ///
    /// An error, an empty list, or a list with no displayable record all
    /// adopt the seed fixture. Returns `false` (and changes nothing) when
    /// the ticket is no longer current.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<Vec<ProjectRecord>, StoreError>,
    ) -> bool {
        if self.phase != Phase::Loading(ticket) {
            tracing::debug!(phase = ?self.phase, "Discarding stale gallery load result");
            return false;
        }

        let (projects, source) = match outcome {
            Ok(records) => {
                let fetched = records.len();
                let projects = normalize_records(records);
                if projects.is_empty() {
                    tracing::warn!(fetched, "Project store returned nothing displayable, using fallback projects");
                    (fallback_projects(), ListSource::Fallback)
                } else {
                    (projects, ListSource::Store)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load projects, using fallback projects");
                (fallback_projects(), ListSource::Fallback)
            }
        };

        self.phase = Phase::Ready;
        self.adopt(projects, source);
        tracing::debug!(count = self.projects.len(), source = ?self.source, "Gallery loaded");
        true
    }

    /// Replace the canonical list after an admin write. No fallback: an
    /// empty list stays empty. Any load still in flight is superseded.
    pub fn replace_projects(&mut self, records: Vec<ProjectRecord>) -> bool {
        if self.phase == Phase::Disposed {
            return false;
        }
        self.phase = Phase::Ready;
        self.adopt(normalize_records(records), ListSource::Store);
        true
    }

    /// Release the list. Later load completions are discarded.
    pub fn dispose(&mut self) {
        self.phase = Phase::Disposed;
        self.projects.clear();
        self.displayed.clear();
        self.tally = CategoryTally::default();
    }

    fn adopt(&mut self, mut projects: Vec<Project>, source: ListSource) {
        sort_newest_first(&mut projects);
        self.projects = projects;
        self.source = source;
        self.tally = CategoryTally::from_projects(&self.projects);
        self.recompute();
    }

    // -----------------------------------------------------------------------
    // Filters
    // -----------------------------------------------------------------------

    /// Set the category filter from its id (`"all"` or a category).
    ///
    /// Unknown ids are ignored; returns whether the value was accepted.
    pub fn set_category(&mut self, value: &str) -> bool {
        match CategoryFilter::parse(value) {
            Some(filter) => {
                self.set_category_filter(filter);
                true
            }
            None => {
                tracing::warn!(category = value, "Ignoring unknown gallery category");
                false
            }
        }
    }

    pub fn set_category_filter(&mut self, filter: CategoryFilter) {
        self.category = filter;
        self.recompute();
    }

    pub fn set_search_term(&mut self, text: &str) {
        self.search_term = text.to_string();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.displayed = filter_indices(&self.projects, self.category, &self.search_term);
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// True from [`begin_load`](Self::begin_load) until the result is applied.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading(_))
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == Phase::Disposed
    }

    pub fn source(&self) -> ListSource {
        self.source
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category_tally(&self) -> &CategoryTally {
        &self.tally
    }

    /// The canonical list.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The displayed subset, in canonical order.
    pub fn displayed(&self) -> impl Iterator<Item = &Project> + '_ {
        self.displayed.iter().map(|&i| &self.projects[i])
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }

    /// Not loading, and nothing is displayed. Also true for an empty
    /// canonical list and after [`dispose`](Self::dispose).
    pub fn is_empty_result(&self) -> bool {
        !self.is_loading() && self.displayed.is_empty()
    }

    pub fn project(&self, id: DbId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::memory::InMemoryProjectStore;
    use crate::project::NewProject;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    struct FailingStore;

    #[async_trait]
    impl ProjectStore for FailingStore {
        async fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn find(&self, _id: DbId) -> Result<Option<ProjectRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn create(&self, _input: &NewProject) -> Result<ProjectRecord, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn update(
            &self,
            _id: DbId,
            _patch: &crate::project::ProjectPatch,
        ) -> Result<Option<ProjectRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _id: DbId) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn record(id: DbId, title: &str, category: &str, date: (i32, u32, u32)) -> ProjectRecord {
        ProjectRecord {
            id,
            title: title.into(),
            category: category.into(),
            description: format!("{title} a medida"),
            client: "Cliente".into(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            materials: vec!["Pino".into()],
            images: vec![format!("/assets/{id}.jpg")],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seeded_engine() -> GalleryEngine {
        let mut engine = GalleryEngine::new();
        let ticket = engine.begin_load().unwrap();
        assert!(engine.complete_load(ticket, Ok(Vec::new())));
        engine
    }

    fn displayed_titles(engine: &GalleryEngine) -> Vec<String> {
        engine.displayed().map(|p| p.title.clone()).collect()
    }

    #[tokio::test]
    async fn test_empty_store_falls_back_to_seed() {
        let store = InMemoryProjectStore::new();
        let mut engine = GalleryEngine::new();

        assert!(engine.load(&store).await);

        assert!(!engine.is_loading());
        assert_eq!(engine.source(), ListSource::Fallback);
        let mut ids: Vec<DbId> = engine.projects().iter().map(|p| p.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_store_error_falls_back_to_seed() {
        let mut engine = GalleryEngine::new();
        assert!(engine.load(&FailingStore).await);
        assert_eq!(engine.source(), ListSource::Fallback);
        assert_eq!(engine.projects().len(), 6);
        assert!(!engine.is_loading());
    }

    #[tokio::test]
    async fn test_store_records_are_adopted_newest_first() {
        let store = InMemoryProjectStore::with_records(vec![
            record(10, "Alacena", "cocina", (2023, 5, 1)),
            record(11, "Cómoda", "bedroom", (2024, 8, 9)),
        ]);
        let mut engine = GalleryEngine::new();
        engine.load(&store).await;

        assert_eq!(engine.source(), ListSource::Store);
        assert_eq!(displayed_titles(&engine), vec!["Cómoda", "Alacena"]);
        assert_eq!(engine.category_tally().total(), 2);
    }

    #[tokio::test]
    async fn test_load_runs_once() {
        let store = InMemoryProjectStore::new();
        let mut engine = GalleryEngine::new();
        assert!(engine.load(&store).await);
        assert!(!engine.load(&store).await);
        assert!(engine.begin_load().is_none());
    }

    #[test]
    fn test_undisplayable_records_fall_back() {
        let mut engine = GalleryEngine::new();
        let ticket = engine.begin_load().unwrap();
        let mut bad = record(1, "Sin fotos", "kitchen", (2024, 1, 1));
        bad.images.clear();
        engine.complete_load(ticket, Ok(vec![bad]));
        assert_eq!(engine.source(), ListSource::Fallback);
    }

    #[test]
    fn test_loading_flag_spans_begin_to_complete() {
        let mut engine = GalleryEngine::new();
        assert!(!engine.is_loading());
        let ticket = engine.begin_load().unwrap();
        assert!(engine.is_loading());
        assert!(!engine.is_empty_result());
        engine.complete_load(ticket, Ok(Vec::new()));
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_completion_after_dispose_is_discarded() {
        let mut engine = GalleryEngine::new();
        let ticket = engine.begin_load().unwrap();
        engine.dispose();

        let applied = engine.complete_load(ticket, Ok(vec![record(1, "Tarde", "office", (2024, 1, 1))]));

        assert!(!applied);
        assert!(engine.projects().is_empty());
        assert!(engine.is_disposed());
    }

    #[test]
    fn test_ticket_from_other_engine_is_rejected() {
        let mut a = GalleryEngine::new();
        let mut b = GalleryEngine::new();
        let _ta = a.begin_load().unwrap();
        let tb = b.begin_load().unwrap();
        assert!(!a.complete_load(tb, Ok(Vec::new())));
        assert!(a.is_loading());
    }

    #[test]
    fn test_category_filter_scenario() {
        let mut engine = seeded_engine();
        assert!(engine.set_category("living-room"));
        assert_eq!(
            displayed_titles(&engine),
            vec!["Biblioteca de Roble", "Mesa de Comedor Familiar"]
        );
    }

    #[test]
    fn test_every_category_yields_exactly_its_projects() {
        let mut engine = seeded_engine();
        for category in Category::ALL {
            engine.set_category(category.id());
            let expected: Vec<DbId> = engine
                .projects()
                .iter()
                .filter(|p| p.category == category)
                .map(|p| p.id)
                .collect();
            let got: Vec<DbId> = engine.displayed().map(|p| p.id).collect();
            assert_eq!(got, expected);
        }
        engine.set_category("all");
        assert_eq!(engine.displayed_count(), engine.projects().len());
        let all: Vec<DbId> = engine.displayed().map(|p| p.id).collect();
        let canonical: Vec<DbId> = engine.projects().iter().map(|p| p.id).collect();
        assert_eq!(all, canonical);
    }

    #[test]
    fn test_search_scenario() {
        let mut engine = seeded_engine();
        engine.set_search_term("cocina");
        assert_eq!(displayed_titles(&engine), vec!["Cocina Integral Moderna"]);

        engine.set_search_term("Cocina");
        assert_eq!(displayed_titles(&engine), vec!["Cocina Integral Moderna"]);
    }

    #[test]
    fn test_no_results_is_a_normal_state() {
        let mut engine = seeded_engine();
        engine.set_category("bathroom");
        engine.set_search_term("xyz-no-match");
        assert_eq!(engine.displayed_count(), 0);
        assert!(engine.is_empty_result());
    }

    #[test]
    fn test_invalid_category_is_noop() {
        let mut engine = seeded_engine();
        engine.set_category("office");
        assert!(!engine.set_category("garage"));
        assert_eq!(engine.category(), CategoryFilter::Only(Category::Office));
        assert_eq!(displayed_titles(&engine), vec!["Escritorio Ejecutivo"]);
    }

    #[test]
    fn test_last_filter_pair_wins() {
        let mut engine = seeded_engine();
        engine.set_category("kitchen");
        engine.set_search_term("roble");
        engine.set_category("living-room");
        assert_eq!(displayed_titles(&engine), vec!["Biblioteca de Roble"]);
        engine.set_search_term("");
        assert_eq!(engine.displayed_count(), 2);
    }

    #[test]
    fn test_tally_ignores_filters() {
        let mut engine = seeded_engine();
        let before = *engine.category_tally();
        engine.set_category("office");
        engine.set_search_term("nogal");
        assert_eq!(*engine.category_tally(), before);
        assert_eq!(before.total(), 6);
    }

    #[test]
    fn test_replace_projects_recomputes_without_fallback() {
        let mut engine = seeded_engine();
        engine.set_category("kitchen");

        engine.replace_projects(vec![
            record(20, "Barra", "kitchen", (2024, 6, 1)),
            record(21, "Mesa ratona", "living", (2024, 6, 2)),
        ]);
        assert_eq!(engine.source(), ListSource::Store);
        assert_eq!(displayed_titles(&engine), vec!["Barra"]);
        assert_eq!(engine.category_tally().total(), 2);

        engine.replace_projects(Vec::new());
        assert!(engine.projects().is_empty());
        assert!(engine.is_empty_result());
    }

    #[test]
    fn test_replace_supersedes_inflight_load() {
        let mut engine = GalleryEngine::new();
        let ticket = engine.begin_load().unwrap();
        engine.replace_projects(vec![record(30, "Banco", "office", (2024, 2, 2))]);
        assert!(!engine.complete_load(ticket, Ok(Vec::new())));
        assert_eq!(engine.projects().len(), 1);
    }
}
