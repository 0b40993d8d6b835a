//! Normalizer — turns coordinate payloads of any supported shape into a
//! canonical [`NormalizedCoordinate`](crate::NormalizedCoordinate).
//!
//! Accepted shapes, as stored by the geocoder, the import scripts and older
//! client documents:
//!
//! - `[lat, lng, ...]` (extra elements ignored)
//! - `{ "lat": .., "lng": .. }`
//! - `{ "latitude": .., "longitude": .. }` (used when `lat`/`lng` are absent)
//!
//! Each value may be a number or a numeric string. Anything missing,
//! malformed, non-finite or out of bounds yields `None` for the whole pair.

use serde_json::Value;

use crate::types::NormalizedCoordinate;

fn to_finite_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// `null`, `false`, `0` and `""` count as "no coordinate".
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Read `primary`, falling back to `fallback` when `primary` is missing or
/// `null`.
fn keyed<'a>(object: &'a serde_json::Map<String, Value>, primary: &str, fallback: &str) -> Option<&'a Value> {
    match object.get(primary) {
        Some(Value::Null) | None => object.get(fallback),
        found => found,
    }
}

/// Normalize a coordinate payload. See the module docs for accepted shapes.
pub fn normalize_coordinate(input: &Value) -> Option<NormalizedCoordinate> {
    if is_absent(input) {
        return None;
    }

    let (lat, lng) = match input {
        Value::Array(items) => {
            if items.len() < 2 {
                return None;
            }
            (items.first(), items.get(1))
        }
        Value::Object(object) => (keyed(object, "lat", "latitude"), keyed(object, "lng", "longitude")),
        _ => return None,
    };

    NormalizedCoordinate::new(to_finite_number(lat)?, to_finite_number(lng)?)
}

/// `normalize_coordinate(input).is_some()`.
pub fn is_valid_coordinate(input: &Value) -> bool {
    normalize_coordinate(input).is_some()
}

/// Normalize an optional payload, e.g. a field that may be missing from a
/// record.
pub fn normalize_optional(input: Option<&Value>) -> Option<NormalizedCoordinate> {
    input.and_then(normalize_coordinate)
}

/// Valid coordinates in input order, plus the indices of invalid entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatePartition {
    pub valid: Vec<(usize, NormalizedCoordinate)>,
    pub invalid: Vec<usize>,
}

/// Split a batch of payloads into valid and invalid entries, logging each
/// invalid one at `warn` level when `warn_invalid` is set.
pub fn partition_coordinates<'a, I>(inputs: I, warn_invalid: bool) -> CoordinatePartition
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut partition = CoordinatePartition::default();
    for (index, input) in inputs.into_iter().enumerate() {
        match normalize_coordinate(input) {
            Some(coord) => partition.valid.push((index, coord)),
            None => {
                if warn_invalid {
                    tracing::warn!(index, coordinate = %input, "invalid coordinate");
                }
                partition.invalid.push(index);
            }
        }
    }
    tracing::debug!(
        valid = partition.valid.len(),
        invalid = partition.invalid.len(),
        "normalizer: partitioned coordinates"
    );
    partition
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
