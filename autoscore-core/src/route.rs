//! Segment-per-level catalog paths (`/brand/family/year/model/powertrain`).

use crate::slug::{PartKind, is_valid_part};
use crate::types::ContextQuery;

/// A catalog route with one slug per level. Levels below the deepest
/// present one are optional, so `brand/family` is a valid path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPath {
    pub brand: String,
    pub family: String,
    pub model_year: Option<String>,
    pub model: Option<String>,
    pub powertrain: Option<String>,
}

impl CatalogPath {
    pub fn new(brand: impl Into<String>, family: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            family: family.into(),
            model_year: None,
            model: None,
            powertrain: None,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.model_year = Some(year.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_powertrain(mut self, powertrain: impl Into<String>) -> Self {
        self.powertrain = Some(powertrain.into());
        self
    }

    /// Build from positional route segments. Needs at least brand and family.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Option<Self> {
        let mut it = segments.iter().map(|s| s.as_ref().to_string());
        let mut path = Self::new(it.next()?, it.next()?);
        path.model_year = it.next();
        path.model = it.next();
        path.powertrain = it.next();
        if it.next().is_some() {
            return None;
        }
        Some(path)
    }

    /// Validate every present segment and produce the store lookup.
    ///
    /// Returns `None` if any segment fails its allow-list.
    pub fn to_query(&self) -> Option<ContextQuery> {
        if !is_valid_part(&self.brand, PartKind::BrandOrFamily)
            || !is_valid_part(&self.family, PartKind::BrandOrFamily)
        {
            return None;
        }
        let model_year = match &self.model_year {
            Some(y) if is_valid_part(y, PartKind::Year) => Some(y.parse().ok()?),
            Some(_) => return None,
            None => None,
        };
        if let Some(model) = &self.model
            && !is_valid_part(model, PartKind::Model)
        {
            return None;
        }
        if let Some(powertrain) = &self.powertrain
            && !is_valid_part(powertrain, PartKind::BrandOrFamily)
        {
            return None;
        }
        Some(ContextQuery {
            brand_slug: self.brand.clone(),
            family_slug: self.family.clone(),
            model_year,
            model_slug: self.model.clone(),
            powertrain_slug: self.powertrain.clone(),
        })
    }
}
