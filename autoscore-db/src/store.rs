//! [`CatalogStore`] over a local SQLite connection.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use autoscore_core::{
    CanonicalNames, CatalogStore, ContextQuery, FamilySummary, ReviewFilter, ReviewRecord,
    StoreError,
};
use rusqlite::Connection;

use crate::operations::OperationError;
use crate::queries;
use crate::schema::{self, SchemaError};

impl From<OperationError> for StoreError {
    fn from(err: OperationError) -> Self {
        StoreError::backend(err)
    }
}

/// Review store backed by a single SQLite connection.
///
/// Queries run synchronously under a mutex; each call is a handful of
/// indexed lookups against a local file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (creating if needed) a database file.
    pub fn open(path: &Path) -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_database(path)?))
    }

    /// An empty in-memory store.
    pub fn open_memory() -> Result<Self, SchemaError> {
        Ok(Self::new(schema::open_memory()?))
    }

    /// Run `f` with exclusive access to the connection, e.g. for seeding.
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, OperationError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.lock()?;
        f(&mut conn).map_err(Into::into)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("SQLite connection lock poisoned".to_string()))
    }
}

impl CatalogStore for SqliteStore {
    async fn resolve_brand_by_slug(&self, brand_slug: &str) -> Result<Option<String>, StoreError> {
        let conn = self.lock()?;
        Ok(queries::find_brand_by_slug(&conn, brand_slug)?)
    }

    async fn resolve_full_context(
        &self,
        query: &ContextQuery,
    ) -> Result<CanonicalNames, StoreError> {
        let conn = self.lock()?;
        Ok(queries::find_context(&conn, query)?)
    }

    async fn list_families_for_brand(
        &self,
        brand: &str,
    ) -> Result<Vec<FamilySummary>, StoreError> {
        let conn = self.lock()?;
        Ok(queries::list_families(&conn, brand)?)
    }

    async fn query_reviews(&self, filter: &ReviewFilter) -> Result<Vec<ReviewRecord>, StoreError> {
        let conn = self.lock()?;
        Ok(queries::reviews_matching(&conn, filter)?)
    }
}
