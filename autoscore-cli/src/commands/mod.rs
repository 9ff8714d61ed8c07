pub(crate) mod config;
pub(crate) mod db;
pub(crate) mod lookup;
pub(crate) mod reviews;

use std::path::Path;
use std::sync::Arc;

use autoscore_lib::RequestScope;

use crate::CliError;
use crate::backend::Backend;

/// One request's worth of resolution state over the selected backend.
pub(crate) fn open_scope(db_path: Option<&Path>) -> Result<RequestScope<Backend>, CliError> {
    Ok(RequestScope::new(Arc::new(Backend::select(db_path)?)))
}

/// Each command is a single request, so a current-thread runtime suffices.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))
}

pub(crate) fn log_scope_stats(scope: &RequestScope<Backend>) {
    let stats = scope.stats();
    log::debug!(
        "Lookups: {} brand, {} context, {} family, {} batch",
        stats.brand_lookups,
        stats.context_lookups,
        stats.family_lookups,
        stats.batches,
    );
}
