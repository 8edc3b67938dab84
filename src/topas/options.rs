//! Configuration for parsing and serialization
//!
//! Options deserialize from YAML. Every key is optional and falls back to its
//! default, so an empty document yields [`Options::default`].
//!
//! ```yaml
//! parse_mode: strict
//! serialize_mode: compact
//! excerpt_len: 40
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the parser treats fragments no rule accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMode {
    /// The first unparseable fragment aborts the parse
    Strict,
    /// Unparseable words become text nodes plus diagnostics
    #[default]
    Permissive,
}

/// Shape of the serialized tuple form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializeMode {
    /// Every node as a nested tagged tuple; exact round trip
    #[default]
    Verbose,
    /// Names, values, equations and formulas collapsed to their source
    /// text; for display only
    Compact,
}

/// Top-level options consumed by the parse and serialize entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub parse_mode: ParseMode,
    pub serialize_mode: SerializeMode,
    /// Maximum characters of source quoted in diagnostics and errors
    pub excerpt_len: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::default(),
            serialize_mode: SerializeMode::default(),
            excerpt_len: 100,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid options: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Options {
    pub fn from_yaml(text: &str) -> Result<Options, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Options::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn strict() -> Self {
        Self {
            parse_mode: ParseMode::Strict,
            ..Self::default()
        }
    }
}
