//! Composite slug decomposition and allow-list validation.
//!
//! Review pages are addressed by slugs of the form
//! ```text
//! brand_family_modelYear_model[_powertrain]
//! ```
//! where each component is a lowercase ASCII slug. Components end up inside
//! store filter expressions, so every character outside the allow-list is
//! rejected, never escaped.

use crate::types::ValidatedSlugParts;

/// Oldest model year accepted in a slug.
pub const MIN_MODEL_YEAR: i32 = 1900;
/// Newest model year accepted in a slug.
pub const MAX_MODEL_YEAR: i32 = 2100;

/// Separator between slug components.
const PART_SEPARATOR: char = '_';

/// Which allow-list a slug component is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    /// `[a-z0-9-]+`. Underscores are reserved as the component separator.
    BrandOrFamily,
    /// `[a-z0-9-_]+`. Multi-word model slugs are rejoined with underscores.
    Model,
    /// An integer in `MIN_MODEL_YEAR..=MAX_MODEL_YEAR`.
    Year,
}

/// Check a single slug component against its allow-list.
pub fn is_valid_part(part: &str, kind: PartKind) -> bool {
    match kind {
        PartKind::BrandOrFamily => !part.is_empty() && part.chars().all(is_slug_char),
        PartKind::Model => {
            !part.is_empty() && part.chars().all(|c| is_slug_char(c) || c == PART_SEPARATOR)
        }
        PartKind::Year => parse_year(part).is_some(),
    }
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Exactly four ASCII digits, so `+2022` and `02022` are not aliases of 2022.
fn parse_year(part: &str) -> Option<i32> {
    if part.len() != 4 || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<i32>()
        .ok()
        .filter(|y| (MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(y))
}

/// Positional components of a composite slug, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSlugParts<'a> {
    pub brand: &'a str,
    pub family: &'a str,
    pub model_year: &'a str,
    /// Everything from the fourth component on, rejoined with `_`.
    pub model: String,
}

/// Split a composite slug into its positional components.
///
/// Returns `None` when the slug has fewer than four components.
pub fn decompose(slug: &str) -> Option<RawSlugParts<'_>> {
    let parts: Vec<&str> = slug.split(PART_SEPARATOR).collect();
    if parts.len() < 4 {
        return None;
    }
    Some(RawSlugParts {
        brand: parts[0],
        family: parts[1],
        model_year: parts[2],
        model: parts[3..].join("_"),
    })
}

impl RawSlugParts<'_> {
    /// Apply the allow-lists to every component.
    pub fn validate(&self) -> Option<ValidatedSlugParts> {
        if !is_valid_part(self.brand, PartKind::BrandOrFamily)
            || !is_valid_part(self.family, PartKind::BrandOrFamily)
            || !is_valid_part(&self.model, PartKind::Model)
        {
            return None;
        }
        let model_year = parse_year(self.model_year)?;
        Some(ValidatedSlugParts {
            brand_part: self.brand.to_string(),
            family_part: self.family.to_string(),
            model_year,
            model_part: self.model.clone(),
        })
    }
}

/// Decompose and validate a slug in one step.
///
/// Malformed and unsafe slugs are indistinguishable here: both yield `None`.
pub fn parse_slug(slug: &str) -> Option<ValidatedSlugParts> {
    decompose(slug)?.validate()
}

/// Turn a canonical name into a slug component.
///
/// Lowercases, folds common Latin diacritics to ASCII, and collapses every
/// run of other characters into a single `-`.
///
/// ```
/// use autoscore_core::slug::slugify;
///
/// assert_eq!(slugify("Citroën"), "citroen");
/// assert_eq!(slugify("Model S Plaid"), "model-s-plaid");
/// assert_eq!(slugify("Škoda Octavia RS"), "skoda-octavia-rs");
/// ```
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        let folded = fold_diacritic(ch);
        let mut pushed = false;
        for c in folded.chars() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.push(c);
                pushed = true;
            }
        }
        if !pushed {
            pending_dash = true;
        }
    }

    out
}

/// ASCII replacement for a lowercase Latin letter with a diacritic.
fn fold_diacritic(ch: char) -> &'static str {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => "e",
        'ğ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'į' | 'ı' => "i",
        'ł' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        c if c.is_ascii() => ascii_str(c),
        _ => "",
    }
}

fn ascii_str(c: char) -> &'static str {
    const ALNUM: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
    match ALNUM.find(c) {
        Some(i) => &ALNUM[i..i + 1],
        None => "",
    }
}
