//! # Application Configuration
//!
//! TOML configuration for the host application: where the rule
//! database lives and which term policy the editor applies. The
//! policy is selected exactly once here and handed to the core at
//! construction.
//!
//! ```toml
//! database = "clinic.db"
//!
//! [policy]
//! min_length = 3
//! max_consecutive_repeat = 2
//! require_vowel = true
//! ```

use entail_core::{StoreError, TermPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Path to the rule database; overridden by `--database`.
    pub database: Option<PathBuf>,
    /// The meaningful-word policy for rule and fact validation.
    pub policy: TermPolicy,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Io(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            StoreError::Serialization(format!("invalid config '{}': {}", path.display(), e))
        })
    }

    /// Load the config at `path` when given, otherwise `entail.toml`
    /// from the working directory when present, otherwise defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, StoreError> {
        match path {
            Some(explicit) => Self::load(explicit),
            None => {
                let fallback = Path::new("entail.toml");
                if fallback.is_file() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
