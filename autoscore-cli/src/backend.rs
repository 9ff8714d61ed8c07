use std::path::Path;

use autoscore_core::{
    CanonicalNames, CatalogStore, ContextQuery, FamilySummary, ReviewFilter, ReviewRecord,
    StoreError,
};
use autoscore_db::SqliteStore;
use autoscore_remote::{RemoteConfig, RemoteStore};

use crate::CliError;

/// The store selected on the command line.
pub(crate) enum Backend {
    Sqlite(SqliteStore),
    Remote(RemoteStore),
}

impl Backend {
    /// A local database when `--db` is given, the configured API otherwise.
    pub(crate) fn select(db_path: Option<&Path>) -> Result<Self, CliError> {
        match db_path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::database(format!(
                        "No database at {}. Run 'autoscore db init {}' first.",
                        path.display(),
                        path.display()
                    )));
                }
                let store = SqliteStore::open(path).map_err(|e| {
                    CliError::database(format!("Failed to open {}: {e}", path.display()))
                })?;
                log::debug!("Using SQLite store at {}", path.display());
                Ok(Self::Sqlite(store))
            }
            None => {
                let config = RemoteConfig::load().map_err(|e| CliError::config(e.to_string()))?;
                log::debug!("Using catalog API at {}", config.base_url);
                let store = RemoteStore::new(config).map_err(|e| CliError::config(e.to_string()))?;
                Ok(Self::Remote(store))
            }
        }
    }
}

impl CatalogStore for Backend {
    async fn resolve_brand_by_slug(&self, brand_slug: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Sqlite(store) => store.resolve_brand_by_slug(brand_slug).await,
            Self::Remote(store) => store.resolve_brand_by_slug(brand_slug).await,
        }
    }

    async fn resolve_full_context(
        &self,
        query: &ContextQuery,
    ) -> Result<CanonicalNames, StoreError> {
        match self {
            Self::Sqlite(store) => store.resolve_full_context(query).await,
            Self::Remote(store) => store.resolve_full_context(query).await,
        }
    }

    async fn list_families_for_brand(&self, brand: &str) -> Result<Vec<FamilySummary>, StoreError> {
        match self {
            Self::Sqlite(store) => store.list_families_for_brand(brand).await,
            Self::Remote(store) => store.list_families_for_brand(brand).await,
        }
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, StoreError> {
        match self {
            Self::Sqlite(store) => store.query_reviews(filter).await,
            Self::Remote(store) => store.query_reviews(filter).await,
        }
    }
}
