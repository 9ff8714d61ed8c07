//! Read queries for the review database.
//!
//! Slug lookups compare against the precomputed `*_slug` columns; review
//! queries match canonical names exactly, with every value bound as a
//! parameter.

use autoscore_core::{CanonicalNames, ContextQuery, FamilySummary, ReviewFilter, ReviewRecord};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::operations::OperationError;

// ── Slug Resolution ─────────────────────────────────────────────────────────

/// Canonical brand name for a brand slug.
pub fn find_brand_by_slug(
    conn: &Connection,
    brand_slug: &str,
) -> Result<Option<String>, OperationError> {
    conn.query_row(
        "SELECT brand FROM reviews WHERE brand_slug = ?1 LIMIT 1",
        params![brand_slug],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

/// Canonical names for a (possibly partial) slug tuple.
///
/// Each level is looked up under the levels above it, so a family is only
/// found within its brand and a model only within its family (and year, if
/// given). Model slugs treat `-` and `_` as the same separator.
pub fn find_context(
    conn: &Connection,
    query: &ContextQuery,
) -> Result<CanonicalNames, OperationError> {
    let brand = find_brand_by_slug(conn, &query.brand_slug)?;
    if brand.is_none() {
        return Ok(CanonicalNames::default());
    }

    let family: Option<String> = conn
        .query_row(
            "SELECT family FROM reviews WHERE brand_slug = ?1 AND family_slug = ?2 LIMIT 1",
            params![query.brand_slug, query.family_slug],
            |row| row.get(0),
        )
        .optional()?;

    let model: Option<String> = match (&family, &query.model_slug) {
        (Some(_), Some(model_slug)) => conn
            .query_row(
                "SELECT model FROM reviews
                 WHERE brand_slug = ?1 AND family_slug = ?2
                   AND (?3 IS NULL OR model_year = ?3)
                   AND replace(model_slug, '-', '_') = replace(?4, '-', '_')
                 LIMIT 1",
                params![query.brand_slug, query.family_slug, query.model_year, model_slug],
                |row| row.get(0),
            )
            .optional()?,
        _ => None,
    };

    let powertrain: Option<String> = match (&family, &query.powertrain_slug) {
        (Some(_), Some(powertrain_slug)) => conn
            .query_row(
                "SELECT powertrain_type FROM reviews
                 WHERE brand_slug = ?1 AND family_slug = ?2
                   AND (?3 IS NULL OR model_year = ?3)
                   AND (?4 IS NULL OR replace(model_slug, '-', '_') = replace(?4, '-', '_'))
                   AND powertrain_slug = ?5
                 LIMIT 1",
                params![
                    query.brand_slug,
                    query.family_slug,
                    query.model_year,
                    query.model_slug,
                    powertrain_slug
                ],
                |row| row.get(0),
            )
            .optional()?,
        _ => None,
    };

    Ok(CanonicalNames {
        brand,
        family,
        model,
        powertrain,
    })
}

// ── Listings ────────────────────────────────────────────────────────────────

/// Families of a canonical brand with their review counts, most reviewed first.
pub fn list_families(conn: &Connection, brand: &str) -> Result<Vec<FamilySummary>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT family, COUNT(*) AS n FROM reviews
         WHERE brand = ?1
         GROUP BY family
         ORDER BY n DESC, family",
    )?;
    let rows = stmt.query_map(params![brand], |row| {
        Ok(FamilySummary {
            family: row.get(0)?,
            review_count: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Reviews ─────────────────────────────────────────────────────────────────

const REVIEW_COLUMNS: &str = "brand, family, model, model_year, trim_level, powertrain_type,
     power, transmission, tester, test_date, score";

/// All reviews matching any AND-group of the filter, newest test first.
///
/// An empty filter matches nothing and issues no query.
pub fn reviews_matching(
    conn: &Connection,
    filter: &ReviewFilter,
) -> Result<Vec<ReviewRecord>, OperationError> {
    if filter.is_empty() {
        return Ok(Vec::new());
    }

    let clauses: Vec<&str> = filter
        .groups()
        .iter()
        .map(|_| "(brand = ? AND family = ? AND model_year = ? AND model = ?)")
        .collect();
    let sql = format!(
        "SELECT {REVIEW_COLUMNS} FROM reviews WHERE {} ORDER BY test_date DESC, id",
        clauses.join(" OR ")
    );

    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    for group in filter.groups() {
        param_values.push(Box::new(group.brand.clone()));
        param_values.push(Box::new(group.family.clone()));
        param_values.push(Box::new(group.model_year));
        param_values.push(Box::new(group.model.clone()));
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(param_values.iter()),
        row_to_review,
    )?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_review(row: &Row<'_>) -> rusqlite::Result<ReviewRecord> {
    Ok(ReviewRecord {
        brand: row.get(0)?,
        family: row.get(1)?,
        model: row.get(2)?,
        model_year: row.get(3)?,
        trim: row.get(4)?,
        powertrain_type: row.get(5)?,
        power: row.get(6)?,
        transmission: row.get(7)?,
        tester: row.get(8)?,
        test_date: row.get(9)?,
        score: row.get(10)?,
    })
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Summary statistics for the review database.
#[derive(Debug)]
pub struct CatalogStats {
    pub brands: i64,
    pub families: i64,
    pub models: i64,
    pub reviews: i64,
}

/// Get overall catalog statistics.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let brands: i64 =
        conn.query_row("SELECT COUNT(DISTINCT brand) FROM reviews", [], |r| r.get(0))?;
    let families: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (SELECT DISTINCT brand, family FROM reviews)",
        [],
        |r| r.get(0),
    )?;
    let models: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (SELECT DISTINCT brand, family, model_year, model FROM reviews)",
        [],
        |r| r.get(0),
    )?;
    let reviews: i64 = conn.query_row("SELECT COUNT(*) FROM reviews", [], |r| r.get(0))?;

    Ok(CatalogStats {
        brands,
        families,
        models,
        reviews,
    })
}
