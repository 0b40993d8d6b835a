//! ffa-core — Food For All core library.
//!
//! Pure, synchronous building blocks behind the client and user spreadsheets
//! and the delivery cluster map. Nothing in here performs I/O except the
//! record loader and [`config::Config::load`].
//!
//! # Architecture
//!
//! ```text
//! query text ──► search (terms) ──► filter ◄── schema (keywords → paths)
//!                                     │
//!                                  records
//!
//! coordinate payload ──► normalizer ──► NormalizedCoordinate
//! ```
//!
//! The search parser and the coordinate normalizer are leaves and know
//! nothing about each other.

pub mod config;
pub mod error;
pub mod filter;
pub mod normalizer;
pub mod records;
pub mod schema;
pub mod search;
pub mod types;

pub use error::RecordsError;
pub use filter::RecordFilter;
pub use normalizer::{is_valid_coordinate, normalize_coordinate};
pub use schema::{FieldSchema, SearchField};
pub use search::SearchQuery;
pub use types::{KeyValue, NormalizedCoordinate, SearchTerm};
