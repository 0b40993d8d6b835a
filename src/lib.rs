//! ffa — Food For All
//!
//! Command-line front end over [`ffa_core`]: parse search queries, filter
//! exported client and user records, and normalize stored coordinates. The
//! command handlers live in [`commands`] and write to any `io::Write`, so
//! integration tests drive them without spawning the binary.
//!
//! # Architecture
//!
//! ```text
//! main (clap) ──► commands ──► ffa_core::{search, filter, normalizer}
//!                    │
//!                    └──► ffa_core::records (JSON files)
//! ```

pub mod commands;

pub use ffa_core;
