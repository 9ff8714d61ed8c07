//! SQLite-backed review catalog.
//!
//! Provides schema creation, seeding operations, and the read queries
//! behind [`SqliteStore`], a local implementation of the review store
//! contract (via rusqlite with the bundled feature).

pub mod operations;
pub mod queries;
pub mod schema;
pub mod store;

pub use operations::{
    OperationError, SeedStats, insert_review, seed_from_json, seed_reviews,
};
pub use queries::{
    CatalogStats, catalog_stats, find_brand_by_slug, find_context, list_families, reviews_matching,
};
pub use schema::{SchemaError, open_database, open_memory};
pub use store::SqliteStore;
