//! Category registry.
//!
//! Maps each [`Category`] to its fetcher and static description, and builds
//! fetch pipelines from per-category specs.

use complist_core::Category;
use complist_fetch::{CategoryFetcher, CategorySpec, FetchPipeline};
use tracing::debug;

use crate::automations::AutomationsFetcher;
use crate::data_manager::DataManagerFetcher;
use crate::multi_form::MultiFormFetcher;
use crate::single_form::SingleFormFetcher;

// ============================================================================
// Descriptor
// ============================================================================

/// Static description of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    /// The category.
    pub category: Category,
    /// One-line description of what is listed.
    pub description: &'static str,
    /// Whether fetching needs a lookup endpoint first.
    pub needs_lookup: bool,
    /// Whether the endpoint is paginated.
    pub paginated: bool,
}

const DESCRIPTORS: [CategoryDescriptor; 4] = [
    CategoryDescriptor {
        category: Category::SingleForm,
        description: "Single-form experiences",
        needs_lookup: false,
        paginated: false,
    },
    CategoryDescriptor {
        category: Category::MultiForm,
        description: "Multi-form experiences",
        needs_lookup: false,
        paginated: true,
    },
    CategoryDescriptor {
        category: Category::DataManager,
        description: "Data-manager tables, per table group",
        needs_lookup: true,
        paginated: false,
    },
    CategoryDescriptor {
        category: Category::Automations,
        description: "Automation flows",
        needs_lookup: false,
        paginated: false,
    },
];

// ============================================================================
// Category Registry
// ============================================================================

/// Registry of category fetchers.
pub struct CategoryRegistry;

impl CategoryRegistry {
    /// Returns all descriptors, in processing order.
    pub fn all() -> &'static [CategoryDescriptor] {
        &DESCRIPTORS
    }

    /// Returns the descriptor for a category.
    pub fn get(category: Category) -> &'static CategoryDescriptor {
        &DESCRIPTORS[category.to_index()]
    }

    /// Creates the fetcher for a category.
    pub fn fetcher(category: Category) -> Box<dyn CategoryFetcher> {
        match category {
            Category::SingleForm => Box::new(SingleFormFetcher::new()),
            Category::MultiForm => Box::new(MultiFormFetcher::new()),
            Category::DataManager => Box::new(DataManagerFetcher::new()),
            Category::Automations => Box::new(AutomationsFetcher::new()),
        }
    }

    /// Builds a pipeline with one fetcher per spec.
    ///
    /// Categories run in fixed order regardless of input order; a category
    /// given twice keeps its last spec.
    pub fn build_pipeline<I>(specs: I) -> FetchPipeline
    where
        I: IntoIterator<Item = (Category, CategorySpec)>,
    {
        let mut pipeline = FetchPipeline::new();
        for (category, spec) in specs {
            debug!(category = %category, endpoint = %spec.endpoint.path, "Adding category");
            pipeline.add(Self::fetcher(category), spec);
        }
        pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complist_fetch::Endpoint;

    #[test]
    fn test_descriptors_follow_category_order() {
        let order: Vec<Category> = CategoryRegistry::all().iter().map(|d| d.category).collect();
        assert_eq!(order, Category::all());
    }

    #[test]
    fn test_get_matches_category() {
        for category in Category::all() {
            assert_eq!(CategoryRegistry::get(*category).category, *category);
        }
        assert!(CategoryRegistry::get(Category::DataManager).needs_lookup);
        assert!(CategoryRegistry::get(Category::MultiForm).paginated);
    }

    #[test]
    fn test_fetcher_category() {
        for category in Category::all() {
            assert_eq!(CategoryRegistry::fetcher(*category).category(), *category);
        }
    }

    #[test]
    fn test_build_pipeline_orders_and_dedups() {
        let spec = CategorySpec::new(Endpoint::get("/x"), 5);
        let pipeline = CategoryRegistry::build_pipeline([
            (Category::Automations, spec.clone()),
            (Category::SingleForm, spec.clone()),
            (Category::Automations, spec),
        ]);
        assert_eq!(
            pipeline.categories(),
            vec![Category::SingleForm, Category::Automations]
        );
    }
}
