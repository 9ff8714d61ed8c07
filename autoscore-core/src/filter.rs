//! Typed review filters: an OR of exact-match AND-groups.
//!
//! The batch path asks the store for every requested context at once. The
//! filter is kept structured so each backend can bind values its own way
//! (SQL parameters, or a quoted PostgREST expression).

use crate::types::ReviewRecord;

/// Review table column names as exposed by the store.
pub mod columns {
    pub const BRAND: &str = "Brand";
    pub const FAMILY: &str = "Family";
    pub const MODEL_YEAR: &str = "ModelYear";
    pub const MODEL: &str = "Model";
}

/// One AND-group: all four identity fields must match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExactMatch {
    pub brand: String,
    pub family: String,
    pub model_year: i32,
    pub model: String,
}

/// Exact, case-sensitive equality on the four identity columns.
pub(crate) fn is_same_vehicle(
    review: &ReviewRecord,
    brand: &str,
    family: &str,
    model_year: i32,
    model: &str,
) -> bool {
    review.brand == brand
        && review.family == family
        && review.model_year == model_year
        && review.model == model
}

impl ExactMatch {
    pub fn matches(&self, review: &ReviewRecord) -> bool {
        is_same_vehicle(review, &self.brand, &self.family, self.model_year, &self.model)
    }

    fn to_postgrest(&self) -> String {
        format!(
            "and({}.eq.{},{}.eq.{},{}.eq.{},{}.eq.{})",
            columns::BRAND,
            quote_value(&self.brand),
            columns::FAMILY,
            quote_value(&self.family),
            columns::MODEL_YEAR,
            self.model_year,
            columns::MODEL,
            quote_value(&self.model),
        )
    }
}

/// A disjunction of [`ExactMatch`] groups. Identical groups are kept once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    groups: Vec<ExactMatch>,
}

impl ReviewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group unless an identical one is already present.
    pub fn push(&mut self, group: ExactMatch) {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
    }

    pub fn groups(&self) -> &[ExactMatch] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether a review satisfies any group.
    pub fn matches(&self, review: &ReviewRecord) -> bool {
        self.groups.iter().any(|g| g.matches(review))
    }

    /// Render the filter as a PostgREST `or` parameter value:
    ///
    /// ```text
    /// (and(Brand.eq."Porsche",Family.eq."911",ModelYear.eq.2022,Model.eq."GT3"),and(...))
    /// ```
    ///
    /// Every text value is double-quoted with `\` and `"` backslash-escaped,
    /// so canonical names containing reserved characters stay literal.
    pub fn to_postgrest(&self) -> String {
        let groups: Vec<String> = self.groups.iter().map(ExactMatch::to_postgrest).collect();
        format!("({})", groups.join(","))
    }
}

impl FromIterator<ExactMatch> for ReviewFilter {
    fn from_iter<I: IntoIterator<Item = ExactMatch>>(iter: I) -> Self {
        let mut filter = Self::new();
        for group in iter {
            filter.push(group);
        }
        filter
    }
}

/// Quote a value for use inside a PostgREST logical expression.
fn quote_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
