//! Comparison ("duel") routes: `slugA-vs-slugB`.

use autoscore_core::ReviewRecord;

const DUEL_SEPARATOR: &str = "-vs-";

/// The two slugs of a comparison route, in the order they were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelPair {
    left: String,
    right: String,
}

impl DuelPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Split a route segment at the first `-vs-`. Both sides must be non-empty.
    pub fn parse(segment: &str) -> Option<Self> {
        let (left, right) = segment.split_once(DUEL_SEPARATOR)?;
        if left.is_empty() || right.is_empty() {
            return None;
        }
        Some(Self::new(left, right))
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// The route segment for this pair.
    pub fn to_segment(&self) -> String {
        format!("{}{DUEL_SEPARATOR}{}", self.left, self.right)
    }
}

/// Reviews for both sides of a duel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuelReviews {
    pub left: Vec<ReviewRecord>,
    pub right: Vec<ReviewRecord>,
}
