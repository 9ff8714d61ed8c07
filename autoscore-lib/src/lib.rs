//! Request-scoped slug resolution and batched review fetching.
//!
//! Everything here runs inside a single request. A [`RequestScope`] wraps an
//! injected [`CatalogStore`](autoscore_core::CatalogStore) handle and
//! memoizes every lookup for the lifetime of that request, so repeated
//! resolutions of the same slug cost one store round-trip and a set of N
//! slugs costs at most one review query.
//!
//! None of the operations return errors. Invalid slugs, unresolved slugs and
//! store failures all degrade to empty results, logged at the appropriate
//! level.

pub mod batch;
pub mod duel;
pub mod memo;
pub mod resolver;
pub mod scope;

pub use batch::{BatchFetcher, demultiplex, normalize_slug_set};
pub use duel::{DuelPair, DuelReviews};
pub use memo::{RequestMemo, SharedLookup};
pub use resolver::ContextResolver;
pub use scope::{RequestScope, ScopeStats};
