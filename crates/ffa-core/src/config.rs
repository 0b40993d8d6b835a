//! Configuration types for ffa.
//!
//! [`Config::load`] reads `~/.config/ffa/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::schema::{CustomColumn, FieldSchema, SchemaKind, UnknownKeyword};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[search]
schema                  = "clients"
progressive_field_names = true

[coordinates]
warn_invalid = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/ffa/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub coordinates: CoordinatesConfig,
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_schema")]
    pub schema: SchemaKind,
    /// Overrides the schema's own policy when set.
    #[serde(default)]
    pub unknown_keyword: Option<UnknownKeyword>,
    #[serde(default = "default_progressive_field_names")]
    pub progressive_field_names: bool,
    /// `[[search.custom_columns]]` entries.
    #[serde(default)]
    pub custom_columns: Vec<CustomColumn>,
}

fn default_schema() -> SchemaKind { SchemaKind::Clients }
fn default_progressive_field_names() -> bool { true }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            unknown_keyword: None,
            progressive_field_names: default_progressive_field_names(),
            custom_columns: Vec::new(),
        }
    }
}

impl SearchConfig {
    /// Build the field schema this section describes, custom columns
    /// included. `kind` overrides the configured schema.
    pub fn schema(&self, kind: Option<SchemaKind>) -> FieldSchema {
        FieldSchema::for_kind(kind.unwrap_or(self.schema)).with_custom_columns(&self.custom_columns)
    }
}

/// `[coordinates]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoordinatesConfig {
    #[serde(default = "default_warn_invalid")]
    pub warn_invalid: bool,
}

fn default_warn_invalid() -> bool { true }

impl Default for CoordinatesConfig {
    fn default() -> Self {
        Self {
            warn_invalid: default_warn_invalid(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/ffa/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit file layered on top of the built-in defaults. A
    /// missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), "config: loaded");
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("ffa")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
