//! Command handlers behind the `ffa` subcommands.

use std::io::Write;

use ffa_core::config::{CoordinatesConfig, SearchConfig};
use ffa_core::normalizer::partition_coordinates;
use ffa_core::{FieldSchema, RecordFilter, SearchQuery, SearchTerm};
use serde_json::Value;

/// Print each parsed term on its own line, tagged with its kind.
///
/// ```text
/// kv    ward = 5
/// bare  driver smith
/// ```
pub fn terms(query: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let query = SearchQuery::parse(query);
    for term in query.terms() {
        match term {
            SearchTerm::Bare(text) => writeln!(out, "bare  {text}")?,
            SearchTerm::KeyValue { keyword, value } => writeln!(out, "kv    {keyword} = {value}")?,
        }
    }
    if query.has_unclosed_quotes() {
        tracing::info!(query = %query.raw(), "query has an unclosed quote");
    }
    Ok(())
}

/// Write matching records as JSON lines. Returns the match count.
pub fn search(
    query: &str,
    records: &[Value],
    schema: &FieldSchema,
    cfg: &SearchConfig,
    out: &mut impl Write,
) -> anyhow::Result<usize> {
    let filter = RecordFilter::from_config(SearchQuery::parse(query), schema, cfg);
    let matched = filter.filter(records);
    for record in &matched {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    tracing::info!(total = records.len(), matched = matched.len(), "search complete");
    Ok(matched.len())
}

/// Outcome of a `coords` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateReport {
    pub valid: usize,
    pub invalid: usize,
}

/// Parse a command-line argument as JSON, falling back to a JSON string so
/// that free text is reported as invalid instead of failing the run.
pub fn parse_coordinate_arg(arg: &str) -> Value {
    serde_json::from_str(arg).unwrap_or_else(|_| Value::String(arg.to_string()))
}

/// Normalize each payload, writing the canonical JSON form or `invalid`.
pub fn coords(inputs: &[String], cfg: &CoordinatesConfig, out: &mut impl Write) -> anyhow::Result<CoordinateReport> {
    let payloads: Vec<Value> = inputs.iter().map(|arg| parse_coordinate_arg(arg)).collect();
    let partition = partition_coordinates(&payloads, cfg.warn_invalid);

    let mut valid = partition.valid.iter().peekable();
    for index in 0..payloads.len() {
        match valid.next_if(|(i, _)| *i == index) {
            Some((_, coord)) => {
                serde_json::to_writer(&mut *out, coord)?;
                writeln!(out)?;
            }
            None => writeln!(out, "invalid")?,
        }
    }

    Ok(CoordinateReport {
        valid: partition.valid.len(),
        invalid: partition.invalid.len(),
    })
}
