//! Source processing API
//!
//! Runs TOPAS source through a stage (tokens or tree) and renders the result
//! in one output format. Everything happens in memory; reading files is left
//! to the caller.
//!
//! ```rust,ignore
//! use topas::topas::processor::{process_source, ProcessingSpec};
//! use topas::topas::options::Options;
//!
//! let spec = ProcessingSpec::from_string("ast-json")?;
//! let json = process_source("prm a 1", &spec, &Options::default())?;
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::topas::ast::ParseError;
use crate::topas::formats::{serialize, unparse};
use crate::topas::lexer::{lex_with_spans, Token};
use crate::topas::options::{Options, SerializeMode};
use crate::topas::parser::parse_with_options;

/// Represents the processing stage (what data to extract)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ast,
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Token spellings, one source line per line
    Simple,
    /// Pretty-printed JSON; tagged tuples for the tree stage
    Json,
    /// Tagged tuples with names, values and formulas collapsed to text
    Compact,
    /// Canonical TOPAS source
    Topas,
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "token-json" or "ast-topas"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "ast" => ProcessingStage::Ast,
            other => return Err(ProcessingError::InvalidStage(other.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "compact" => OutputFormat::Compact,
            "topas" => OutputFormat::Topas,
            other => return Err(ProcessingError::InvalidFormatType(other.to_string())),
        };

        match (stage, format) {
            (ProcessingStage::Token, OutputFormat::Simple | OutputFormat::Json) => {}
            (
                ProcessingStage::Ast,
                OutputFormat::Json | OutputFormat::Compact | OutputFormat::Topas,
            ) => {}
            (stage, format) => {
                return Err(ProcessingError::InvalidFormatType(format!(
                    "Format '{:?}' not supported for {:?} stage",
                    format, stage
                )))
            }
        }

        Ok(ProcessingSpec { stage, format })
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        vec![
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Simple,
            },
            ProcessingSpec {
                stage: ProcessingStage::Token,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Json,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Compact,
            },
            ProcessingSpec {
                stage: ProcessingStage::Ast,
                format: OutputFormat::Topas,
            },
        ]
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Process TOPAS source according to the given specification
///
/// The parse mode comes from `options`. For the `ast-json` format the
/// serialize mode does too, so `ast-json` with compact options equals
/// `ast-compact`.
pub fn process_source(
    source: &str,
    spec: &ProcessingSpec,
    options: &Options,
) -> Result<String, ProcessingError> {
    match spec.stage {
        ProcessingStage::Token => format_tokens(&lex_with_spans(source), spec.format),
        ProcessingStage::Ast => {
            let (root, _diagnostics) = parse_with_options(source, options)?;
            match spec.format {
                OutputFormat::Topas => Ok(unparse(&root)),
                OutputFormat::Compact => to_json(&serialize(&root, SerializeMode::Compact)),
                _ => to_json(&serialize(&root, options.serialize_mode)),
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ProcessingError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format tokens according to the specified output format.
pub fn format_tokens(
    tokens: &[(Token, std::ops::Range<usize>)],
    format: OutputFormat,
) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Simple => {
            let mut result = String::new();
            let mut line_start = true;
            for (token, _) in tokens {
                if matches!(token, Token::Newline) {
                    result.push('\n');
                    line_start = true;
                    continue;
                }
                if !line_start {
                    result.push(' ');
                }
                result.push_str(&token.to_string());
                line_start = false;
            }
            Ok(result)
        }
        OutputFormat::Json => to_json(&tokens),
        other => Err(ProcessingError::InvalidFormatType(format!(
            "Format '{:?}' only works with AST stage",
            other
        ))),
    }
}
