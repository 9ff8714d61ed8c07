//! Write operations for the review table.

use autoscore_core::{ReviewRecord, slugify};
use rusqlite::{Connection, params};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),
    #[error("Review for '{name}' has no usable slug")]
    EmptySlug { name: String },
}

/// Counts from a seeding run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedStats {
    pub reviews_inserted: usize,
    pub reviews_skipped: usize,
}

/// Insert one review, deriving its slug columns from the canonical names.
pub fn insert_review(conn: &Connection, review: &ReviewRecord) -> Result<i64, OperationError> {
    let brand_slug = required_slug(&review.brand)?;
    let family_slug = required_slug(&review.family)?;
    let model_slug = required_slug(&review.model)?;
    let powertrain_slug = review
        .powertrain_type
        .as_deref()
        .map(slugify)
        .filter(|s| !s.is_empty());

    conn.execute(
        "INSERT INTO reviews (brand, brand_slug, family, family_slug, model, model_slug,
                              model_year, trim_level, powertrain_type, powertrain_slug, power,
                              transmission, tester, test_date, score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            review.brand,
            brand_slug,
            review.family,
            family_slug,
            review.model,
            model_slug,
            review.model_year,
            review.trim,
            review.powertrain_type,
            powertrain_slug,
            review.power,
            review.transmission,
            review.tester,
            review.test_date,
            review.score,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn required_slug(name: &str) -> Result<String, OperationError> {
    let slug = slugify(name);
    if slug.is_empty() {
        return Err(OperationError::EmptySlug {
            name: name.to_string(),
        });
    }
    Ok(slug)
}

/// Insert many reviews in one transaction. Reviews whose names produce an
/// empty slug are skipped and logged.
pub fn seed_reviews(
    conn: &mut Connection,
    reviews: &[ReviewRecord],
) -> Result<SeedStats, OperationError> {
    let tx = conn.transaction()?;
    let mut stats = SeedStats::default();

    for review in reviews {
        match insert_review(&tx, review) {
            Ok(_) => stats.reviews_inserted += 1,
            Err(OperationError::EmptySlug { name }) => {
                log::warn!("Skipping review with unsluggable name '{name}'");
                stats.reviews_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tx.commit()?;
    log::debug!(
        "Seeded {} review(s), skipped {}",
        stats.reviews_inserted,
        stats.reviews_skipped
    );
    Ok(stats)
}

/// Seed from a JSON array of review records (store column names).
pub fn seed_from_json(conn: &mut Connection, json: &str) -> Result<SeedStats, OperationError> {
    let reviews: Vec<ReviewRecord> = serde_json::from_str(json)?;
    seed_reviews(conn, &reviews)
}
