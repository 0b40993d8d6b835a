//! Filter layer — applies a [`SearchQuery`] to records through a
//! [`FieldSchema`].
//!
//! A record matches when every term matches:
//!
//! - `keyword:value` terms match the resolved field, or custom columns whose
//!   key contains the keyword. Terms with an empty value are skipped.
//! - Bare terms match any global field.
//!
//! The tokenizer splits on spaces, so `zip code:20001` arrives as the bare
//! term `zip` followed by `code:20001`. Bare terms directly before a
//! key-value term are folded into its keyword when the longer keyword names
//! a field.
//!
//! While the query has an unclosed quote every record matches, so the table
//! does not flicker empty mid-phrase.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::schema::{FieldSchema, UnknownKeyword};
use crate::search::{is_partial_field_name, SearchQuery};
use crate::types::SearchTerm;

/// A query bound to a schema, ready to test records.
#[derive(Debug, Clone)]
pub struct RecordFilter<'s> {
    query: SearchQuery,
    terms: Vec<SearchTerm>,
    schema: &'s FieldSchema,
    unknown_keyword: UnknownKeyword,
    progressive_field_names: bool,
}

impl<'s> RecordFilter<'s> {
    pub fn new(query: SearchQuery, schema: &'s FieldSchema) -> Self {
        Self {
            terms: merge_multiword_keywords(query.terms(), schema),
            query,
            unknown_keyword: schema.default_unknown_keyword(),
            schema,
            progressive_field_names: true,
        }
    }

    /// Apply the `[search]` section: unknown-keyword policy and progressive
    /// field-name handling.
    pub fn from_config(query: SearchQuery, schema: &'s FieldSchema, cfg: &SearchConfig) -> Self {
        let mut filter = Self::new(query, schema).with_progressive_field_names(cfg.progressive_field_names);
        if let Some(policy) = cfg.unknown_keyword {
            filter = filter.with_unknown_keyword(policy);
        }
        filter
    }

    pub fn with_unknown_keyword(mut self, policy: UnknownKeyword) -> Self {
        self.unknown_keyword = policy;
        self
    }

    pub fn with_progressive_field_names(mut self, enabled: bool) -> Self {
        self.progressive_field_names = enabled;
        self
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    /// Terms after multi-word keyword folding.
    pub fn terms(&self) -> &[SearchTerm] {
        &self.terms
    }

    /// Whether a single record passes every term.
    pub fn matches(&self, record: &Value) -> bool {
        if self.query.is_empty() || self.query.has_unclosed_quotes() {
            return true;
        }
        self.matches_terms(record, &self.terms)
    }

    /// Records that match, in input order.
    ///
    /// With progressive field names enabled, a trailing bare term that looks
    /// like the start of a column keyword (`addr`) and matches no record as a
    /// literal is dropped; the user is most likely still typing `address:`.
    pub fn filter<'r>(&self, records: &'r [Value]) -> Vec<&'r Value> {
        if self.query.is_empty() || self.query.has_unclosed_quotes() {
            return records.iter().collect();
        }

        let terms = self.effective_terms(records);
        let matched: Vec<&Value> = records
            .iter()
            .filter(|record| self.matches_terms(record, terms))
            .collect();
        tracing::debug!(
            query = %self.query.raw(),
            total = records.len(),
            matched = matched.len(),
            "filter: applied query"
        );
        matched
    }

    fn effective_terms(&self, records: &[Value]) -> &[SearchTerm] {
        let terms = self.terms.as_slice();
        if !self.progressive_field_names {
            return terms;
        }
        let Some((SearchTerm::Bare(last), rest)) = terms.split_last() else {
            return terms;
        };
        if !is_partial_field_name(last, &self.schema.field_names()) {
            return terms;
        }
        if records.iter().any(|record| self.matches_bare(record, last)) {
            return terms;
        }
        tracing::debug!(term = %last, "filter: treating trailing term as partial field name");
        rest
    }

    fn matches_terms(&self, record: &Value, terms: &[SearchTerm]) -> bool {
        terms.iter().all(|term| match term {
            SearchTerm::KeyValue { keyword, value } => self.matches_key_value(record, keyword, value),
            SearchTerm::Bare(text) => self.matches_bare(record, text),
        })
    }

    fn matches_key_value(&self, record: &Value, keyword: &str, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        if let Some(field) = self.schema.resolve(keyword) {
            return field.matches(record, value);
        }

        let mut custom = self.schema.custom_matching(keyword).peekable();
        if custom.peek().is_some() {
            return custom.any(|field| field.matches(record, value));
        }

        match self.unknown_keyword {
            UnknownKeyword::Reject => false,
            UnknownKeyword::Ignore => true,
        }
    }

    fn matches_bare(&self, record: &Value, term: &str) -> bool {
        self.schema.global_fields().any(|field| field.matches(record, term))
    }
}

/// Longest keyword, counting preceding bare words, that a field answers to.
const MAX_KEYWORD_WORDS: usize = 3;

fn merge_multiword_keywords(terms: &[SearchTerm], schema: &FieldSchema) -> Vec<SearchTerm> {
    let mut merged: Vec<SearchTerm> = Vec::with_capacity(terms.len());
    for term in terms {
        let SearchTerm::KeyValue { keyword, value } = term else {
            merged.push(term.clone());
            continue;
        };

        let trailing_bare = merged.iter().rev().take_while(|t| t.is_bare()).count();
        let max_prefix = trailing_bare.min(MAX_KEYWORD_WORDS - 1);
        let folded = (1..=max_prefix).rev().find_map(|n| {
            let words: Vec<String> = merged[merged.len() - n..].iter().map(|t| t.to_string().to_lowercase()).collect();
            let candidate = format!("{} {keyword}", words.join(" "));
            schema.resolve(&candidate).map(|_| (n, candidate))
        });

        match folded {
            Some((n, candidate)) => {
                tracing::trace!(keyword = %candidate, "filter: folded multi-word keyword");
                merged.truncate(merged.len() - n);
                merged.push(SearchTerm::KeyValue {
                    keyword: candidate,
                    value: value.clone(),
                });
            }
            None => merged.push(term.clone()),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn clients() -> Vec<Value> {
        vec![
            json!({ "firstName": "Jane", "lastName": "Doe", "address": "12 Elm St", "ward": 5, "tags": ["Senior"] }),
            json!({ "firstName": "Ali", "lastName": "Khan", "address": "4 Oak Ave", "ward": 1, "tags": [] }),
        ]
    }

    fn names(matched: &[&Value]) -> Vec<String> {
        matched.iter().map(|r| r["firstName"].as_str().unwrap_or("").to_string()).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let schema = FieldSchema::clients();
        let records = clients();
        let filter = RecordFilter::new(SearchQuery::parse("   "), &schema);
        assert_eq!(filter.filter(&records).len(), 2);
    }

    #[test]
    fn key_value_and_bare_terms_combine() {
        let schema = FieldSchema::clients();
        let records = clients();
        let filter = RecordFilter::new(SearchQuery::parse("ward: 5 elm"), &schema);
        assert_eq!(names(&filter.filter(&records)), vec!["Jane"]);
    }

    #[test]
    fn empty_value_is_skipped() {
        let schema = FieldSchema::clients();
        let records = clients();
        let filter = RecordFilter::new(SearchQuery::parse("ward:"), &schema);
        assert_eq!(filter.filter(&records).len(), 2);
    }

    #[test]
    fn unclosed_quote_shows_all() {
        let schema = FieldSchema::clients();
        let records = clients();
        let filter = RecordFilter::new(SearchQuery::parse(r#"name:"jan"#), &schema);
        assert_eq!(filter.filter(&records).len(), 2);
        assert!(filter.matches(&records[1]));
    }

    #[test]
    fn unknown_keyword_policy() {
        let schema = FieldSchema::clients();
        let records = clients();
        let reject = RecordFilter::new(SearchQuery::parse("colour:red"), &schema);
        assert!(reject.filter(&records).is_empty());
        let ignore = reject.clone().with_unknown_keyword(UnknownKeyword::Ignore);
        assert_eq!(ignore.filter(&records).len(), 2);
    }

    #[test]
    fn multiword_keywords_fold() {
        let schema = FieldSchema::clients();
        let filter = RecordFilter::new(SearchQuery::parse("smith zip code:20001 client id:c-1"), &schema);
        assert_eq!(
            filter.terms(),
            &[
                SearchTerm::Bare("smith".into()),
                SearchTerm::KeyValue { keyword: "zip code".into(), value: "20001".into() },
                SearchTerm::KeyValue { keyword: "client id".into(), value: "c-1".into() },
            ]
        );
    }

    #[test]
    fn trailing_partial_field_name_is_dropped() {
        let schema = FieldSchema::clients();
        let records = clients();
        let filter = RecordFilter::new(SearchQuery::parse("jane addr"), &schema);
        assert_eq!(names(&filter.filter(&records)), vec!["Jane"]);

        let strict = filter.clone().with_progressive_field_names(false);
        assert!(strict.filter(&records).is_empty());
    }
}
