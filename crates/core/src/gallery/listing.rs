//! The admin view of the stored projects.
//!
//! Unlike the public gallery, the listing keeps every stored record,
//! including the ones the gallery cannot display, so they can be found
//! and repaired. Those carry the reason they are skipped.

use serde::Serialize;

use crate::category::{Category, CategoryFilter};
use crate::error::CoreError;
use crate::gallery::filter::CategoryTally;
use crate::project::{normalize_records, Project, ProjectRecord};

/// A stored record as the admin panel lists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredProject {
    #[serde(flatten)]
    pub record: ProjectRecord,
    /// Why the public gallery skips this record. `None` when it is shown.
    pub problem: Option<String>,
}

impl StoredProject {
    pub fn inspect(record: ProjectRecord) -> Self {
        let problem = match Project::from_record(record.clone()) {
            Ok(_) => None,
            Err(CoreError::Validation(msg)) => Some(msg),
            Err(other) => Some(other.to_string()),
        };
        Self { record, problem }
    }

    pub fn is_displayable(&self) -> bool {
        self.problem.is_none()
    }

    /// Same predicates as the gallery. A record with an unknown category
    /// only passes the `all` filter.
    fn matches(&self, category: CategoryFilter, needle: &str) -> bool {
        let category_ok = match category {
            CategoryFilter::All => true,
            CategoryFilter::Only(_) => Category::parse(&self.record.category)
                .is_some_and(|parsed| category.matches(parsed)),
        };
        category_ok
            && (needle.is_empty()
                || self.record.title.to_lowercase().contains(needle)
                || self.record.description.to_lowercase().contains(needle))
    }
}

/// Filtered admin listing plus counts over the whole store.
#[derive(Debug, Clone, Serialize)]
pub struct AdminListing {
    /// Records passing the filters, newest first.
    pub projects: Vec<StoredProject>,
    /// Counts over the displayable records, ignoring the filters.
    pub tally: CategoryTally,
    /// Stored records the public gallery skips.
    pub skipped: usize,
}

impl AdminListing {
    pub fn build(records: Vec<ProjectRecord>, category: CategoryFilter, search_term: &str) -> Self {
        let tally = CategoryTally::from_projects(&normalize_records(records.clone()));
        let needle = search_term.to_lowercase();

        let mut stored: Vec<StoredProject> = records.into_iter().map(StoredProject::inspect).collect();
        let skipped = stored.iter().filter(|p| !p.is_displayable()).count();
        stored.sort_by(|a, b| b.record.date.cmp(&a.record.date));
        stored.retain(|p| p.matches(category, &needle));

        Self {
            projects: stored,
            tally,
            skipped,
        }
    }
}
