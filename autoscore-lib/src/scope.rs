//! Per-request facade over the resolution core.
//!
//! Construct one [`RequestScope`] when a request starts, pass it to every
//! renderer that needs catalog data, and drop it when the response is sent.
//! Metadata generation and page body can then ask for the same slug
//! independently and share one store round-trip.

use std::rc::Rc;
use std::sync::Arc;

use autoscore_core::{
    CanonicalNames, CatalogPath, CatalogStore, FamilySummary, PartKind, ResolvedContext,
    ReviewBuckets, ReviewRecord, is_valid_part,
};

use crate::batch::BatchFetcher;
use crate::duel::{DuelPair, DuelReviews};
use crate::memo::RequestMemo;
use crate::resolver::ContextResolver;

/// Lookup counts for one request, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeStats {
    pub brand_lookups: usize,
    pub context_lookups: usize,
    pub family_lookups: usize,
    pub batches: usize,
}

/// Request-lifetime resolution state bound to an injected store handle.
pub struct RequestScope<S> {
    store: Arc<S>,
    resolver: ContextResolver<S>,
    batches: BatchFetcher<S>,
    brands: Rc<RequestMemo<Option<String>>>,
    families: Rc<RequestMemo<Vec<FamilySummary>>>,
}

impl<S: CatalogStore + 'static> RequestScope<S> {
    pub fn new(store: Arc<S>) -> Self {
        let resolver = ContextResolver::new(Arc::clone(&store));
        let batches = BatchFetcher::new(resolver.clone());
        Self {
            store,
            resolver,
            batches,
            brands: Rc::new(RequestMemo::new("resolve_brand_by_slug")),
            families: Rc::new(RequestMemo::new("list_families_for_brand")),
        }
    }

    /// Canonical brand name for a brand slug.
    pub async fn resolve_brand(&self, brand_slug: &str) -> Option<String> {
        if !is_valid_part(brand_slug, PartKind::BrandOrFamily) {
            log::debug!("Rejected brand slug '{brand_slug}'");
            return None;
        }
        let store = Arc::clone(&self.store);
        let slug = brand_slug.to_string();
        let brand = self
            .brands
            .get_or_start(brand_slug, move || async move {
                match store.resolve_brand_by_slug(&slug).await {
                    Ok(brand) => brand,
                    Err(e) => {
                        log::error!("Brand lookup failed for '{slug}': {e}");
                        None
                    }
                }
            })
            .await;
        if brand.is_none() {
            log::warn!("No canonical brand for slug '{brand_slug}'");
        }
        brand
    }

    /// Families of a brand, most reviewed first. Empty if the brand does
    /// not resolve or the store fails.
    pub async fn families_for_brand(&self, brand_slug: &str) -> Vec<FamilySummary> {
        let Some(brand) = self.resolve_brand(brand_slug).await else {
            return Vec::new();
        };
        let store = Arc::clone(&self.store);
        let key = brand.clone();
        self.families
            .get_or_start(&key, move || async move {
                match store.list_families_for_brand(&brand).await {
                    Ok(mut families) => {
                        families.sort_by(|a, b| {
                            b.review_count
                                .cmp(&a.review_count)
                                .then_with(|| a.family.cmp(&b.family))
                        });
                        families
                    }
                    Err(e) => {
                        log::error!("Family listing failed for '{brand}': {e}");
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// Canonical context for a composite slug.
    pub async fn resolve_context(&self, slug: &str) -> Option<ResolvedContext> {
        self.resolver.resolve(slug).await
    }

    /// Canonical names for a segment-per-level path.
    pub async fn resolve_path(&self, path: &CatalogPath) -> Option<CanonicalNames> {
        self.resolver.resolve_path(path).await
    }

    /// Reviews for many slugs with a single review query.
    pub async fn reviews_batch<T: AsRef<str>>(&self, slugs: &[T]) -> ReviewBuckets {
        self.batches.fetch(slugs).await
    }

    /// Reviews for a single slug, served through the batch path.
    pub async fn reviews_for_slug(&self, slug: &str) -> Vec<ReviewRecord> {
        self.reviews_batch(&[slug])
            .await
            .remove(slug)
            .unwrap_or_default()
    }

    /// Reviews for both sides of a comparison. `a-vs-b` and `b-vs-a` share
    /// one batch.
    pub async fn duel(&self, pair: &DuelPair) -> DuelReviews {
        let buckets = self.reviews_batch(&[pair.left(), pair.right()]).await;
        DuelReviews {
            left: buckets.get(pair.left()).cloned().unwrap_or_default(),
            right: buckets.get(pair.right()).cloned().unwrap_or_default(),
        }
    }

    pub fn stats(&self) -> ScopeStats {
        ScopeStats {
            brand_lookups: self.brands.started(),
            context_lookups: self.resolver.lookups_started(),
            family_lookups: self.families.started(),
            batches: self.batches.batches_started(),
        }
    }
}
