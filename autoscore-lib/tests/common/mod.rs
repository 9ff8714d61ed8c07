#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use autoscore_core::{
    CanonicalNames, CatalogStore, ContextQuery, FamilySummary, ReviewFilter, ReviewRecord,
    StoreError,
};

type ContextKey = (String, String, i32, String);

/// In-memory store double that counts every call it receives.
#[derive(Default)]
pub struct FakeStore {
    brands: HashMap<String, String>,
    contexts: HashMap<ContextKey, CanonicalNames>,
    families: HashMap<String, Vec<FamilySummary>>,
    reviews: Vec<ReviewRecord>,
    fail_reviews: bool,
    fail_contexts: bool,
    pub brand_calls: Cell<usize>,
    pub context_calls: Cell<usize>,
    pub family_calls: Cell<usize>,
    pub review_queries: Cell<usize>,
    pub filters: RefCell<Vec<ReviewFilter>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a slug that resolves to the given canonical names.
    pub fn with_vehicle(mut self, slug: &str, brand: &str, family: &str, model: &str) -> Self {
        let parts = autoscore_core::parse_slug(slug).expect("test slug must be valid");
        self.brands
            .insert(parts.brand_part.clone(), brand.to_string());
        self.contexts.insert(
            (
                parts.brand_part,
                parts.family_part,
                parts.model_year,
                parts.model_part,
            ),
            CanonicalNames {
                brand: Some(brand.to_string()),
                family: Some(family.to_string()),
                model: Some(model.to_string()),
                powertrain: None,
            },
        );
        self
    }

    /// Register a slug whose lookup finds the brand and family but no model.
    pub fn with_partial(mut self, slug: &str, brand: &str, family: &str) -> Self {
        let parts = autoscore_core::parse_slug(slug).expect("test slug must be valid");
        self.contexts.insert(
            (
                parts.brand_part,
                parts.family_part,
                parts.model_year,
                parts.model_part,
            ),
            CanonicalNames {
                brand: Some(brand.to_string()),
                family: Some(family.to_string()),
                model: None,
                powertrain: None,
            },
        );
        self
    }

    pub fn with_review(mut self, review: ReviewRecord) -> Self {
        self.reviews.push(review);
        self
    }

    pub fn with_families(mut self, brand: &str, families: &[(&str, u32)]) -> Self {
        self.families.insert(
            brand.to_string(),
            families
                .iter()
                .map(|(family, review_count)| FamilySummary {
                    family: family.to_string(),
                    review_count: *review_count,
                })
                .collect(),
        );
        self
    }

    pub fn failing_reviews(mut self) -> Self {
        self.fail_reviews = true;
        self
    }

    pub fn failing_contexts(mut self) -> Self {
        self.fail_contexts = true;
        self
    }

    pub fn last_filter(&self) -> Option<ReviewFilter> {
        self.filters.borrow().last().cloned()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl CatalogStore for FakeStore {
    async fn resolve_brand_by_slug(&self, brand_slug: &str) -> Result<Option<String>, StoreError> {
        bump(&self.brand_calls);
        tokio::task::yield_now().await;
        Ok(self.brands.get(brand_slug).cloned())
    }

    async fn resolve_full_context(
        &self,
        query: &ContextQuery,
    ) -> Result<CanonicalNames, StoreError> {
        bump(&self.context_calls);
        tokio::task::yield_now().await;
        if self.fail_contexts {
            return Err(StoreError::Unavailable("context lookup offline".to_string()));
        }

        let found = self.contexts.iter().find(|((brand, family, year, model), _)| {
            *brand == query.brand_slug
                && *family == query.family_slug
                && query.model_year.is_none_or(|y| y == *year)
                && query.model_slug.as_ref().is_none_or(|m| m == model)
        });
        Ok(match found {
            Some((_, names)) => CanonicalNames {
                brand: names.brand.clone(),
                family: names.family.clone(),
                model: query.model_slug.as_ref().and(names.model.clone()),
                powertrain: None,
            },
            None => CanonicalNames::default(),
        })
    }

    async fn list_families_for_brand(
        &self,
        brand: &str,
    ) -> Result<Vec<FamilySummary>, StoreError> {
        bump(&self.family_calls);
        tokio::task::yield_now().await;
        Ok(self.families.get(brand).cloned().unwrap_or_default())
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, StoreError> {
        bump(&self.review_queries);
        self.filters.borrow_mut().push(filter.clone());
        tokio::task::yield_now().await;
        if self.fail_reviews {
            return Err(StoreError::Unavailable("review table offline".to_string()));
        }
        Ok(self
            .reviews
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}

pub fn review(brand: &str, family: &str, year: i32, model: &str, score: f64) -> ReviewRecord {
    ReviewRecord {
        brand: brand.to_string(),
        family: family.to_string(),
        model: model.to_string(),
        model_year: year,
        trim: None,
        powertrain_type: Some("Essence".to_string()),
        power: Some(510),
        transmission: Some("PDK".to_string()),
        tester: Some("J. Martin".to_string()),
        test_date: None,
        score: Some(score),
    }
}

/// The two-vehicle catalog used by the batch scenarios.
pub fn supercar_store() -> FakeStore {
    FakeStore::new()
        .with_vehicle("porsche_911_2022_gt3", "Porsche", "911", "GT3")
        .with_vehicle("ferrari_f8_2020_tributo", "Ferrari", "F8", "Tributo")
        .with_review(review("Porsche", "911", 2022, "GT3", 9.4))
        .with_review(review("Ferrari", "F8", 2020, "Tributo", 9.1))
}
