//! Core types for ffa-core.
//!
//! This module defines the values shared across layers: the parsed
//! [`SearchTerm`], the [`KeyValue`] split of a single term, and the canonical
//! [`NormalizedCoordinate`].

use serde::{Deserialize, Serialize};

/// Largest absolute latitude accepted by the normalizer.
pub const MAX_LATITUDE: f64 = 90.0;
/// Largest absolute longitude accepted by the normalizer.
pub const MAX_LONGITUDE: f64 = 180.0;

/// One token of a search query, classified by whether it carries a keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Matched as a case-insensitive substring against any searchable field.
    Bare(String),
    /// `keyword:value`, filtering on a specific named field. The keyword is
    /// already lower-cased and both halves are trimmed.
    KeyValue { keyword: String, value: String },
}

impl SearchTerm {
    /// Classify a raw term produced by
    /// [`parse_search_terms`](crate::search::parse_search_terms).
    pub fn classify(term: &str) -> Self {
        let kv = crate::search::extract_key_value(term);
        if kv.is_key_value {
            SearchTerm::KeyValue {
                keyword: kv.keyword,
                value: kv.search_value,
            }
        } else {
            SearchTerm::Bare(term.to_string())
        }
    }

    pub fn is_bare(&self) -> bool {
        matches!(self, SearchTerm::Bare(_))
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchTerm::Bare(term) => write!(f, "{term}"),
            SearchTerm::KeyValue { keyword, value } => write!(f, "{keyword}:{value}"),
        }
    }
}

/// Result of splitting a term on its first colon.
///
/// Absence of a colon is not an error: `is_key_value` is `false` and both
/// strings are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValue {
    pub keyword: String,
    pub search_value: String,
    pub is_key_value: bool,
}

/// A latitude/longitude pair that is finite and inside geographic bounds.
///
/// Only produced by [`NormalizedCoordinate::new`] or the
/// [`normalizer`](crate::normalizer); never partially valid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl NormalizedCoordinate {
    /// Validate a typed pair. Returns `None` for non-finite or out-of-bounds
    /// values.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        if lat.abs() > MAX_LATITUDE || lng.abs() > MAX_LONGITUDE {
            return None;
        }
        Some(Self { lat, lng })
    }
}

impl std::fmt::Display for NormalizedCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.lat, self.lng)
    }
}
