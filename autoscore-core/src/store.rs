//! The review store contract.
//!
//! Page rendering talks to the catalog database through these four calls
//! only. Backends are constructed explicitly and handed to the resolver, so
//! tests can substitute an in-memory double.

use thiserror::Error;

use crate::filter::ReviewFilter;
use crate::types::{CanonicalNames, ContextQuery, FamilySummary, ReviewRecord};

/// Errors raised by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Malformed store response: {0}")]
    Malformed(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Read access to the review catalog.
#[allow(async_fn_in_trait)]
pub trait CatalogStore {
    /// Canonical brand name for a brand slug (case/diacritic-insensitive).
    async fn resolve_brand_by_slug(&self, brand_slug: &str) -> Result<Option<String>, StoreError>;

    /// Canonical names for a (possibly partial) slug tuple.
    async fn resolve_full_context(&self, query: &ContextQuery)
    -> Result<CanonicalNames, StoreError>;

    /// Families of a brand with their review counts.
    async fn list_families_for_brand(&self, brand: &str)
    -> Result<Vec<FamilySummary>, StoreError>;

    /// Reviews matching any AND-group of the filter.
    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, StoreError>;
}
