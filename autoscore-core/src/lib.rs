//! Review catalog data model, slug handling, and the store contract.
//!
//! This crate has no I/O. It defines the typed records exchanged with the
//! review store, the allow-list slug validator and decomposer, the typed
//! OR-of-AND review filter, and the [`CatalogStore`] trait that the SQLite
//! and remote backends implement.

pub mod filter;
pub mod route;
pub mod slug;
pub mod store;
pub mod types;

pub use filter::{ExactMatch, ReviewFilter};
pub use route::CatalogPath;
pub use slug::{
    MAX_MODEL_YEAR, MIN_MODEL_YEAR, PartKind, RawSlugParts, decompose, is_valid_part, parse_slug,
    slugify,
};
pub use store::{CatalogStore, StoreError};
pub use types::*;
