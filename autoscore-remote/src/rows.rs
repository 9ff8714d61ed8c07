//! Wire rows returned by the catalog API.
//!
//! The API hands back loosely typed JSON. Rows are decoded field by field so
//! one bad row costs only itself, never the whole response.

use autoscore_core::{FamilySummary, ReviewRecord};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// A review row as the API sends it. Every column may be null.
///
/// Identity columns are typed; a wrong type there makes the row unusable.
/// The remaining columns stay raw and are converted one by one, so a bad
/// value only costs that column.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct RawReviewRow {
    brand: Option<String>,
    family: Option<String>,
    model: Option<String>,
    model_year: Option<i32>,
    trim: Option<Value>,
    powertrain_type: Option<Value>,
    power: Option<Value>,
    transmission: Option<Value>,
    tester: Option<Value>,
    /// ISO date or timestamp; only the date part is kept.
    test_date: Option<Value>,
    score: Option<Value>,
}

impl RawReviewRow {
    /// Convert to a typed record. `Err` names the first missing identity column.
    fn into_record(self) -> Result<ReviewRecord, &'static str> {
        Ok(ReviewRecord {
            brand: self.brand.ok_or("Brand")?,
            family: self.family.ok_or("Family")?,
            model: self.model.ok_or("Model")?,
            model_year: self.model_year.ok_or("ModelYear")?,
            trim: optional_column("Trim", self.trim, text),
            powertrain_type: optional_column("PowertrainType", self.powertrain_type, text),
            power: optional_column("Power", self.power, power),
            transmission: optional_column("Transmission", self.transmission, text),
            tester: optional_column("Tester", self.tester, text),
            test_date: optional_column("TestDate", self.test_date, test_date),
            score: optional_column("Score", self.score, score),
        })
    }
}

/// Convert a non-identity column, logging and discarding values of the
/// wrong shape.
fn optional_column<T>(
    column: &str,
    value: Option<Value>,
    convert: fn(&Value) -> Option<T>,
) -> Option<T> {
    let value = value?;
    let converted = convert(&value);
    if converted.is_none() {
        log::warn!("Ignoring unreadable {column} value {value}");
    }
    converted
}

fn text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Horsepower. Numeric columns may arrive as `510.0`.
fn power(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(hp) => u32::try_from(hp).ok(),
            None => n
                .as_f64()
                .filter(|hp| hp.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(hp))
                .map(|hp| hp as u32),
        },
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Scores may arrive as strings from decimal columns.
fn score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
        _ => None,
    }
}

fn test_date(value: &Value) -> Option<NaiveDate> {
    let date = value.as_str()?.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Decode review rows, dropping (and logging) any that lack an identity
/// column or have the wrong shape.
pub(crate) fn decode_reviews(rows: Vec<Value>) -> Vec<ReviewRecord> {
    let total = rows.len();
    let records: Vec<ReviewRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let raw: RawReviewRow = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Dropping malformed review row {i}: {e}");
                    return None;
                }
            };
            match raw.into_record() {
                Ok(record) => Some(record),
                Err(column) => {
                    log::warn!("Dropping review row {i}: missing {column}");
                    None
                }
            }
        })
        .collect();
    if records.len() < total {
        log::debug!("Kept {} of {total} review rows", records.len());
    }
    records
}

/// A family listing row as returned by the `list_families_for_brand` RPC.
#[derive(Debug, Deserialize)]
pub(crate) struct RawFamilyRow {
    family: Option<String>,
    #[serde(alias = "count")]
    review_count: Option<i64>,
}

pub(crate) fn decode_families(rows: Vec<RawFamilyRow>) -> Vec<FamilySummary> {
    rows.into_iter()
        .filter_map(|row| {
            let Some(family) = row.family else {
                log::warn!("Dropping family row without a name");
                return None;
            };
            let review_count = row
                .review_count
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            Some(FamilySummary {
                family,
                review_count,
            })
        })
        .collect()
}
