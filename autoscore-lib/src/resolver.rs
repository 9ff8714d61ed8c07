//! Slug → canonical context resolution.

use std::rc::Rc;
use std::sync::Arc;

use autoscore_core::{CanonicalNames, CatalogPath, CatalogStore, ContextQuery, ResolvedContext};

use crate::memo::{RequestMemo, SharedLookup};

/// Resolves slugs through the store's `resolve_full_context` call, sharing
/// lookups with identical arguments for the lifetime of one request.
///
/// Cloning is cheap and clones share the same memo.
pub struct ContextResolver<S> {
    store: Arc<S>,
    lookups: Rc<RequestMemo<Option<CanonicalNames>>>,
}

impl<S> Clone for ContextResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lookups: Rc::clone(&self.lookups),
        }
    }
}

impl<S: CatalogStore + 'static> ContextResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            lookups: Rc::new(RequestMemo::new("resolve_full_context")),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of store lookups actually issued so far in this request.
    pub fn lookups_started(&self) -> usize {
        self.lookups.started()
    }

    /// Memoized store lookup. `None` means the store call itself failed;
    /// the failure has already been logged.
    pub fn lookup(&self, query: ContextQuery) -> SharedLookup<Option<CanonicalNames>> {
        let store = Arc::clone(&self.store);
        self.lookups.get_or_start(&query.clone(), move || async move {
            match store.resolve_full_context(&query).await {
                Ok(names) => Some(names),
                Err(e) => {
                    log::error!(
                        "Context lookup failed for {}/{}: {e}",
                        query.brand_slug,
                        query.family_slug
                    );
                    None
                }
            }
        })
    }

    /// Resolve a composite slug to its canonical context.
    ///
    /// Returns `None` when the slug is malformed, fails validation, has no
    /// canonical brand, family or model, or the store call fails.
    pub async fn resolve(&self, slug: &str) -> Option<ResolvedContext> {
        let Some(parts) = autoscore_core::parse_slug(slug) else {
            log::debug!("Rejected slug '{slug}'");
            return None;
        };

        let names = self.lookup(ContextQuery::from(&parts)).await?;
        match (names.brand, names.family, names.model) {
            (Some(real_brand), Some(real_family), Some(real_model)) => Some(ResolvedContext {
                original_slug: slug.to_string(),
                real_brand,
                real_family,
                real_model,
                model_year: parts.model_year,
            }),
            _ => {
                log::warn!("No canonical match for slug '{slug}'");
                None
            }
        }
    }

    /// Resolve a segment-per-level catalog path. Partial paths resolve only
    /// the levels they name.
    pub async fn resolve_path(&self, path: &CatalogPath) -> Option<CanonicalNames> {
        let Some(query) = path.to_query() else {
            log::debug!("Rejected catalog path {path:?}");
            return None;
        };
        let names = self.lookup(query).await?;
        if names.brand.is_none() || names.family.is_none() {
            log::warn!("No canonical match for path {}/{}", path.brand, path.family);
            return None;
        }
        Some(names)
    }
}
