//! Admin dashboard counters.

use serde::Serialize;

use crate::gallery::CategoryTally;
use crate::inquiry::{ContactInquiry, STATUS_NEW};
use crate::project::{normalize_records, ProjectRecord};
use crate::store::{InquiryStore, ProjectStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteStats {
    /// Every stored project record.
    pub project_count: usize,
    /// Stored records the public gallery cannot display.
    /// `project_count == by_category.total() + skipped_count`.
    pub skipped_count: usize,
    pub inquiry_count: usize,
    /// Inquiries still in the `new` status.
    pub new_inquiry_count: usize,
    /// Images across all stored projects.
    pub image_count: usize,
    /// Displayable projects per category, as the gallery counts them.
    pub by_category: CategoryTally,
}

impl SiteStats {
    pub fn from_records(projects: Vec<ProjectRecord>, inquiries: &[ContactInquiry]) -> Self {
        let project_count = projects.len();
        let image_count = projects.iter().map(|p| p.images.len()).sum();
        let by_category = CategoryTally::from_projects(&normalize_records(projects));
        Self {
            project_count,
            skipped_count: project_count - by_category.total(),
            inquiry_count: inquiries.len(),
            new_inquiry_count: inquiries.iter().filter(|i| i.status == STATUS_NEW).count(),
            image_count,
            by_category,
        }
    }

    pub async fn collect(
        projects: &dyn ProjectStore,
        inquiries: &dyn InquiryStore,
    ) -> Result<Self, StoreError> {
        let (projects, inquiries) = tokio::try_join!(projects.list(), inquiries.list())?;
        Ok(Self::from_records(projects, &inquiries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::inquiry::{NewInquiry, ProjectType};
    use crate::memory::{InMemoryInquiryStore, InMemoryProjectStore};

    #[tokio::test]
    async fn test_collect_counts_sample_store() {
        let projects = InMemoryProjectStore::with_sample_projects();
        let inquiries = InMemoryInquiryStore::new();
        inquiries
            .create(&NewInquiry {
                name: "Lucía".into(),
                email: "lucia@example.com".into(),
                phone: None,
                project_type: ProjectType::Bedroom,
                budget: None,
                message: "Quiero un placard de dos cuerpos".into(),
            })
            .await
            .unwrap();

        let stats = SiteStats::collect(&projects, &inquiries).await.unwrap();
        assert_eq!(stats.project_count, 6);
        assert_eq!(stats.skipped_count, 0);
        assert_eq!(stats.image_count, 8);
        assert_eq!(stats.inquiry_count, 1);
        assert_eq!(stats.new_inquiry_count, 1);
        assert_eq!(stats.by_category.count(Category::LivingRoom), 2);
    }

    #[test]
    fn test_undisplayable_records_are_counted_apart() {
        let mut records: Vec<ProjectRecord> = crate::seed::fallback_projects()
            .into_iter()
            .map(Into::into)
            .collect();
        let mut broken = records[0].clone();
        broken.id = 40;
        broken.category = "garage".into();
        records.push(broken);

        let stats = SiteStats::from_records(records, &[]);
        assert_eq!(stats.project_count, 7);
        assert_eq!(stats.skipped_count, 1);
        assert_eq!(stats.by_category.total(), 6);
        assert_eq!(stats.project_count, stats.by_category.total() + stats.skipped_count);
    }

    #[test]
    fn test_empty_site() {
        let stats = SiteStats::from_records(Vec::new(), &[]);
        assert_eq!(stats.project_count, 0);
        assert_eq!(stats.by_category.total(), 0);
    }
}
