//! Pure filtering and tally helpers used by the gallery engine.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::category::{Category, CategoryFilter, FILTER_ALL};
use crate::project::Project;

/// Positions in `projects` that pass both the category and the search
/// predicate, in list order.
///
/// The search is a case-insensitive substring test on title or
/// description; an empty term matches everything.
pub fn filter_indices(
    projects: &[Project],
    category: CategoryFilter,
    search_term: &str,
) -> Vec<usize> {
    let needle = search_term.to_lowercase();
    projects
        .iter()
        .enumerate()
        .filter(|(_, p)| category.matches(p.category))
        .filter(|(_, p)| needle.is_empty() || p.matches_lowercase(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// Number of projects per category, plus the total under `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryTally {
    total: usize,
    counts: [usize; Category::ALL.len()],
}

impl CategoryTally {
    pub fn from_projects(projects: &[Project]) -> Self {
        let mut counts = [0; Category::ALL.len()];
        for project in projects {
            counts[project.category.index()] += 1;
        }
        Self {
            total: projects.len(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    /// Count shown next to a filter control.
    pub fn get(&self, filter: CategoryFilter) -> usize {
        match filter {
            CategoryFilter::All => self.total,
            CategoryFilter::Only(category) => self.count(category),
        }
    }

    /// `all` first, then every category in render order.
    pub fn entries(&self) -> impl Iterator<Item = (CategoryFilter, usize)> + '_ {
        std::iter::once((CategoryFilter::All, self.total)).chain(
            Category::ALL
                .iter()
                .map(|c| (CategoryFilter::Only(*c), self.count(*c))),
        )
    }
}

impl Serialize for CategoryTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len() + 1))?;
        map.serialize_entry(FILTER_ALL, &self.total)?;
        for category in Category::ALL {
            map.serialize_entry(category.id(), &self.count(category))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::fallback_projects;

    fn titles(projects: &[Project], idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| projects[i].title.clone()).collect()
    }

    #[test]
    fn test_all_with_empty_term_keeps_everything_in_order() {
        let projects = fallback_projects();
        let idx = filter_indices(&projects, CategoryFilter::All, "");
        assert_eq!(idx, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_category_filter_preserves_relative_order() {
        let projects = fallback_projects();
        let idx = filter_indices(&projects, CategoryFilter::Only(Category::LivingRoom), "");
        assert_eq!(
            titles(&projects, &idx),
            vec!["Biblioteca de Roble", "Mesa de Comedor Familiar"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive_on_title_and_description() {
        let projects = fallback_projects();
        let idx = filter_indices(&projects, CategoryFilter::All, "COCINA");
        assert_eq!(titles(&projects, &idx), vec!["Cocina Integral Moderna"]);

        let idx = filter_indices(&projects, CategoryFilter::All, "madera");
        assert_eq!(
            titles(&projects, &idx),
            vec!["Biblioteca de Roble", "Mesa de Comedor Familiar"]
        );
    }

    #[test]
    fn test_search_result_is_subset_of_category_result() {
        let projects = fallback_projects();
        for category in Category::ALL {
            let filter = CategoryFilter::Only(category);
            let by_category = filter_indices(&projects, filter, "");
            for term in ["a", "roble", "espejo", "zzz"] {
                let both = filter_indices(&projects, filter, term);
                assert!(both.iter().all(|i| by_category.contains(i)));
            }
        }
    }

    #[test]
    fn test_combined_filters_can_yield_nothing() {
        let projects = fallback_projects();
        let idx = filter_indices(
            &projects,
            CategoryFilter::Only(Category::Bathroom),
            "xyz-no-match",
        );
        assert!(idx.is_empty());
    }

    #[test]
    fn test_tally_sums_to_total() {
        let tally = CategoryTally::from_projects(&fallback_projects());
        assert_eq!(tally.total(), 6);
        assert_eq!(tally.count(Category::LivingRoom), 2);
        let sum: usize = Category::ALL.iter().map(|c| tally.count(*c)).sum();
        assert_eq!(sum, tally.total());
        assert_eq!(tally.get(CategoryFilter::All), 6);
    }

    #[test]
    fn test_tally_entries_start_with_all() {
        let tally = CategoryTally::from_projects(&fallback_projects());
        let entries: Vec<_> = tally.entries().collect();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0], (CategoryFilter::All, 6));
    }

    #[test]
    fn test_tally_serializes_as_map() {
        let tally = CategoryTally::from_projects(&fallback_projects());
        let json = serde_json::to_value(tally).unwrap();
        assert_eq!(json["all"], 6);
        assert_eq!(json["living-room"], 2);
        assert_eq!(json["kitchen"], 1);
    }
}
