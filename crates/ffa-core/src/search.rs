//! Search layer — free-text query tokenizer and matching primitives.
//!
//! A query such as `ward: 5 "driver smith" cluster:A` is split into terms by
//! [`parse_search_terms`], each term is split on its first colon by
//! [`extract_key_value`], and the [`filter`](crate::filter) layer applies the
//! result to records through schema fields built on [`check_string_contains`]
//! and [`global_search_match`].
//!
//! Nothing here returns an error. These functions run on every keystroke;
//! malformed input yields an empty or default value instead.

use std::borrow::Cow;

use serde_json::Value;

use crate::types::{KeyValue, SearchTerm};

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    InQuote(char),
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// A key with nothing after its colon yet (`ward:` or `ward: `). The next
/// space or quoted span belongs to its value.
fn awaits_value(term: &str) -> bool {
    term.trim_end().ends_with(':')
}

fn flush(terms: &mut Vec<String>, current: &mut String) {
    let term = current.trim();
    if !term.is_empty() {
        terms.push(term.to_string());
    }
    current.clear();
}

/// Split a trimmed query into terms, left to right.
///
/// Spaces separate terms outside of quotes. A `"…"` or `'…'` span is a single
/// term with the quotes removed; an unclosed span runs to the end of the
/// input. A key awaiting its value keeps the following space or quoted span,
/// so `ward: 5` and `name:"john smith"` each stay one term.
///
/// The caller trims the whole query; only individual terms are trimmed here.
pub fn parse_search_terms(input: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut state = ScanState::Outside;
    let mut current = String::new();

    for c in input.chars() {
        match state {
            ScanState::Outside if is_quote(c) => {
                if !awaits_value(&current) {
                    flush(&mut terms, &mut current);
                }
                state = ScanState::InQuote(c);
            }
            ScanState::InQuote(delimiter) if c == delimiter => {
                flush(&mut terms, &mut current);
                state = ScanState::Outside;
            }
            ScanState::Outside if c == ' ' => {
                if awaits_value(&current) {
                    current.push(c);
                } else {
                    flush(&mut terms, &mut current);
                }
            }
            _ => current.push(c),
        }
    }
    flush(&mut terms, &mut current);

    terms.retain(|term| {
        let term = term.trim();
        !term.is_empty() && term != "\"" && term != "'"
    });
    terms
}

/// True when the query has an odd number of `'` or of `"` characters, i.e.
/// the user is still typing inside a quoted span. A quote directly after a
/// backslash (`o\'brien`) is not counted.
pub fn has_unclosed_quotes(input: &str) -> bool {
    let mut singles = 0usize;
    let mut doubles = 0usize;
    let mut prev = None;
    for c in input.chars() {
        if prev != Some('\\') {
            match c {
                '\'' => singles += 1,
                '"' => doubles += 1,
                _ => {}
            }
        }
        prev = Some(c);
    }
    singles % 2 != 0 || doubles % 2 != 0
}

// ---------------------------------------------------------------------------
// Term classification
// ---------------------------------------------------------------------------

fn strip_wrapping_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.starts_with(quote) && value.ends_with(quote) {
            return if value.len() >= 2 {
                &value[1..value.len() - 1]
            } else {
                ""
            };
        }
    }
    value
}

/// Split a term on its first colon.
///
/// The keyword is trimmed and lower-cased, the value trimmed (and unwrapped
/// if it is a quoted string). Any later colons stay in the value.
pub fn extract_key_value(term: &str) -> KeyValue {
    match term.split_once(':') {
        Some((keyword, value)) => KeyValue {
            keyword: keyword.trim().to_lowercase(),
            search_value: strip_wrapping_quotes(value.trim()).to_string(),
            is_key_value: true,
        },
        None => KeyValue::default(),
    }
}

fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Whether a bare term looks like the start of a column name rather than a
/// value, e.g. `addr` for `address`.
///
/// True if the term is a prefix of a field name, or the term begins with the
/// first three characters of a field name (all of it for shorter names).
/// Comparison is case-insensitive.
pub fn is_partial_field_name<S: AsRef<str>>(term: &str, field_names: &[S]) -> bool {
    let term = term.to_lowercase();
    field_names.iter().any(|name| {
        let name = name.as_ref().to_lowercase();
        name.starts_with(&term) || term.starts_with(char_prefix(&name, 3))
    })
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Display form of a record value used for substring matching. `None` for
/// JSON `null`. Arrays join their elements with `,`; objects render as
/// compact JSON.
pub fn display_string(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Array(items) => Some(Cow::Owned(
            items
                .iter()
                .map(|item| display_string(item).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        )),
        Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

/// Case-insensitive substring test against the display form of `value`.
///
/// `null` never matches. Numbers are compared as text, so `"1"` matches
/// `10`.
pub fn check_string_contains(value: &Value, query: &str) -> bool {
    match display_string(value) {
        Some(text) => text.to_lowercase().contains(&query.to_lowercase()),
        None => false,
    }
}

/// Like [`check_string_contains`], but an array matches if any one of its
/// elements does.
pub fn check_value_or_in_array(value: &Value, query: &str) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|item| check_string_contains(item, query)),
        other => check_string_contains(other, query),
    }
}

/// Resolve a dotted path such as `referralEntity.name` inside a record.
pub fn lookup_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |node, key| node.get(key))
}

/// Match `search_value` against every listed field path of `record`.
pub fn global_search_match<S: AsRef<str>>(record: &Value, search_value: &str, fields: &[S]) -> bool {
    fields.iter().any(|field| match lookup_path(record, field.as_ref()) {
        Some(value) => check_value_or_in_array(value, search_value),
        None => false,
    })
}

// ---------------------------------------------------------------------------
// SearchQuery
// ---------------------------------------------------------------------------

/// A parsed query: the raw text, its classified terms, and whether the user
/// is still inside an open quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    terms: Vec<SearchTerm>,
    unclosed_quotes: bool,
}

impl SearchQuery {
    /// Trim and tokenize a query as typed into the search box.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let terms: Vec<SearchTerm> = parse_search_terms(trimmed)
            .iter()
            .map(|term| SearchTerm::classify(term))
            .collect();
        let unclosed_quotes = has_unclosed_quotes(trimmed);
        tracing::trace!(query = %trimmed, terms = terms.len(), unclosed_quotes, "search: parsed query");
        Self {
            raw: trimmed.to_string(),
            terms,
            unclosed_quotes,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn terms(&self) -> &[SearchTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn has_unclosed_quotes(&self) -> bool {
        self.unclosed_quotes
    }

    /// `(keyword, value)` pairs in query order.
    pub fn key_value_terms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().filter_map(|term| match term {
            SearchTerm::KeyValue { keyword, value } => Some((keyword.as_str(), value.as_str())),
            SearchTerm::Bare(_) => None,
        })
    }

    pub fn bare_terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().filter_map(|term| match term {
            SearchTerm::Bare(text) => Some(text.as_str()),
            SearchTerm::KeyValue { .. } => None,
        })
    }
}

impl From<&str> for SearchQuery {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl std::str::FromStr for SearchQuery {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
