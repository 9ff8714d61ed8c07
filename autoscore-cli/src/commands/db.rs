use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

pub(crate) fn run_db_init(db_path: &Path) -> Result<(), CliError> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    autoscore_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to initialize database: {e}")))?;
    log::info!(
        "Initialized review database at {}",
        db_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

pub(crate) fn run_db_seed(db_path: &Path, json_path: &Path) -> Result<(), CliError> {
    let json = std::fs::read_to_string(json_path)?;
    let mut conn = autoscore_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open database: {e}")))?;

    let stats = autoscore_db::seed_from_json(&mut conn, &json)
        .map_err(|e| CliError::database(format!("Failed to seed from {}: {e}", json_path.display())))?;

    log::info!(
        "Seeded {} review(s) from {}",
        stats.reviews_inserted.if_supports_color(Stdout, |t| t.green()),
        json_path.display(),
    );
    if stats.reviews_skipped > 0 {
        log::warn!("Skipped {} review(s) with unusable names", stats.reviews_skipped);
    }
    Ok(())
}

pub(crate) fn run_db_stats(db_path: &Path) -> Result<(), CliError> {
    if !db_path.exists() {
        log::warn!("No review database found at {}", db_path.display());
        log::info!("Run 'autoscore db init {}' to create one.", db_path.display());
        return Ok(());
    }

    let conn = autoscore_db::open_database(db_path)
        .map_err(|e| CliError::database(format!("Failed to open database: {e}")))?;
    let stats = autoscore_db::catalog_stats(&conn)
        .map_err(|e| CliError::database(format!("Failed to query stats: {e}")))?;

    log::info!("{}", "Review Database Statistics".if_supports_color(Stdout, |t| t.bold()));
    log::info!("  Database: {}", db_path.display());
    log::info!("  Brands:    {:>8}", stats.brands);
    log::info!("  Families:  {:>8}", stats.families);
    log::info!("  Models:    {:>8}", stats.models);
    log::info!("  Reviews:   {:>8}", stats.reviews);
    Ok(())
}
