//! Batched review fetching for many slugs in one store query.
//!
//! A comparison page or a ranked list needs reviews for several slugs. All
//! of them are resolved concurrently, the surviving contexts are folded into
//! one OR-of-AND filter, and the store is queried exactly once. Rows are
//! then routed back to the slug(s) they belong to.

use std::rc::Rc;

use autoscore_core::{CatalogStore, ResolvedContext, ReviewBuckets, ReviewFilter, ReviewRecord};
use futures::future::join_all;

use crate::memo::{RequestMemo, SharedLookup};
use crate::resolver::ContextResolver;

/// Fetches reviews for sets of slugs, memoized per request on the sorted,
/// deduplicated slug set.
pub struct BatchFetcher<S> {
    resolver: ContextResolver<S>,
    batches: Rc<RequestMemo<ReviewBuckets>>,
}

impl<S> Clone for BatchFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            batches: Rc::clone(&self.batches),
        }
    }
}

impl<S: CatalogStore + 'static> BatchFetcher<S> {
    pub fn new(resolver: ContextResolver<S>) -> Self {
        Self {
            resolver,
            batches: Rc::new(RequestMemo::new("reviews_batch")),
        }
    }

    /// Number of distinct batches started so far in this request.
    pub fn batches_started(&self) -> usize {
        self.batches.started()
    }

    /// Reviews for every requested slug.
    ///
    /// The result has exactly one key per distinct input slug, including
    /// slugs that failed validation or resolution (those map to an empty
    /// vector). A store failure yields all-empty buckets.
    pub fn fetch<T: AsRef<str>>(&self, slugs: &[T]) -> SharedLookup<ReviewBuckets> {
        let unique = normalize_slug_set(slugs);
        let key = unique.clone();
        let resolver = self.resolver.clone();
        self.batches
            .get_or_start(&key, move || fetch_reviews_batch(resolver, unique))
    }
}

/// Sort and deduplicate, so `[a, b]` and `[b, a, a]` share a memo entry.
pub fn normalize_slug_set<T: AsRef<str>>(slugs: &[T]) -> Vec<String> {
    let mut unique: Vec<String> = slugs.iter().map(|s| s.as_ref().to_string()).collect();
    unique.sort();
    unique.dedup();
    unique
}

async fn fetch_reviews_batch<S: CatalogStore + 'static>(
    resolver: ContextResolver<S>,
    slugs: Vec<String>,
) -> ReviewBuckets {
    let mut buckets: ReviewBuckets = slugs.iter().map(|s| (s.clone(), Vec::new())).collect();

    let resolved = join_all(slugs.iter().map(|slug| resolver.resolve(slug))).await;
    let contexts: Vec<ResolvedContext> = resolved.into_iter().flatten().collect();

    if contexts.is_empty() {
        log::debug!("No slug of {} resolved, skipping review query", slugs.len());
        return buckets;
    }

    let filter: ReviewFilter = contexts.iter().map(ResolvedContext::exact_match).collect();
    let rows = match resolver.store().query_reviews(&filter).await {
        Ok(rows) => rows,
        Err(e) => {
            log::error!(
                "Review query failed for {} context(s), returning empty results: {e}",
                filter.len()
            );
            return buckets;
        }
    };

    log::debug!(
        "Batch: {} slug(s), {} context(s), {} row(s)",
        slugs.len(),
        contexts.len(),
        rows.len()
    );
    demultiplex(&mut buckets, &contexts, rows);
    buckets
}

/// Route each row to the bucket of every context it matches.
///
/// Distinct slugs resolving to the same canonical tuple each receive a copy
/// of the matching rows. Rows matching no context are dropped.
pub fn demultiplex(buckets: &mut ReviewBuckets, contexts: &[ResolvedContext], rows: Vec<ReviewRecord>) {
    for row in rows {
        for ctx in contexts.iter().filter(|c| c.matches(&row)) {
            buckets
                .entry(ctx.original_slug.clone())
                .or_default()
                .push(row.clone());
        }
    }
}
