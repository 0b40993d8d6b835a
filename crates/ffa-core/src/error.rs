//! Error types for ffa-core.
//!
//! Search and normalization never fail; only the edges that touch files or
//! user-supplied names do.

use std::path::PathBuf;

/// Failure to load a record collection.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    /// The file could not be read.
    #[error("failed to read records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not valid JSON.
    #[error("invalid records JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level JSON is neither an array nor an id → document map.
    #[error("expected an array or an object of documents, found {0}")]
    NotACollection(&'static str),

    /// An element of the collection is not a JSON object.
    #[error("record {0} is not a JSON object")]
    NotAnObject(String),
}

/// Unknown schema name given on the command line or in config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schema {0:?} (expected \"clients\" or \"users\")")]
pub struct UnknownSchema(pub String);
