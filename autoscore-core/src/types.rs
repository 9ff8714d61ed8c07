//! Core data model for the review catalog.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter::{ExactMatch, is_same_vehicle};

// ── Slug-derived types ──────────────────────────────────────────────────────

/// Slug components that passed the allow-list checks.
///
/// `brand_part` and `family_part` contain only `[a-z0-9-]`; `model_part`
/// additionally allows `_`; `model_year` lies in the supported range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedSlugParts {
    pub brand_part: String,
    pub family_part: String,
    pub model_year: i32,
    pub model_part: String,
}

/// Arguments of a `resolve_full_context` lookup.
///
/// Only brand and family are mandatory; the remaining keys narrow the lookup
/// when present.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextQuery {
    pub brand_slug: String,
    pub family_slug: String,
    pub model_year: Option<i32>,
    pub model_slug: Option<String>,
    pub powertrain_slug: Option<String>,
}

impl From<&ValidatedSlugParts> for ContextQuery {
    fn from(parts: &ValidatedSlugParts) -> Self {
        Self {
            brand_slug: parts.brand_part.clone(),
            family_slug: parts.family_part.clone(),
            model_year: Some(parts.model_year),
            model_slug: Some(parts.model_part.clone()),
            powertrain_slug: None,
        }
    }
}

/// Canonical names returned by the store for a context lookup.
///
/// Any field may be absent: partial keys resolve only what they name, and a
/// miss leaves the field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalNames {
    pub brand: Option<String>,
    pub family: Option<String>,
    pub model: Option<String>,
    pub powertrain: Option<String>,
}

/// A slug resolved to the canonical names stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContext {
    /// The slug exactly as the caller requested it.
    pub original_slug: String,
    pub real_brand: String,
    pub real_family: String,
    pub real_model: String,
    pub model_year: i32,
}

impl ResolvedContext {
    /// The AND-group that selects this context's reviews.
    pub fn exact_match(&self) -> ExactMatch {
        ExactMatch {
            brand: self.real_brand.clone(),
            family: self.real_family.clone(),
            model_year: self.model_year,
            model: self.real_model.clone(),
        }
    }

    /// Whether a review row belongs to this context (exact equality on all four fields).
    pub fn matches(&self, review: &ReviewRecord) -> bool {
        is_same_vehicle(
            review,
            &self.real_brand,
            &self.real_family,
            self.model_year,
            &self.real_model,
        )
    }
}

// ── Store records ───────────────────────────────────────────────────────────

/// A single published review as stored in the review table.
///
/// The identity fields are required; everything else is optional because
/// older reviews were entered without them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReviewRecord {
    pub brand: String,
    pub family: String,
    pub model: String,
    pub model_year: i32,
    #[serde(default)]
    pub trim: Option<String>,
    #[serde(default)]
    pub powertrain_type: Option<String>,
    /// Rated power in horsepower.
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(default)]
    pub tester: Option<String>,
    #[serde(default)]
    pub test_date: Option<NaiveDate>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// One row of the family listing for a brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySummary {
    pub family: String,
    pub review_count: u32,
}

/// Per-slug review buckets. Every requested slug has a key; an empty
/// vector means "no data".
pub type ReviewBuckets = BTreeMap<String, Vec<ReviewRecord>>;

/// Aggregate figures over one bucket of reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSummary {
    pub count: usize,
    pub best_score: Option<f64>,
    pub mean_score: Option<f64>,
}

impl ReviewSummary {
    /// Summarize a bucket. Reviews without a score count toward `count` only.
    pub fn from_reviews(reviews: &[ReviewRecord]) -> Self {
        let scores: Vec<f64> = reviews.iter().filter_map(|r| r.score).collect();
        let best_score = scores.iter().copied().reduce(f64::max);
        let mean_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };
        Self {
            count: reviews.len(),
            best_score,
            mean_score,
        }
    }
}
