//! Error types for parsing and reconstruction

use super::location::Position;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while turning text into a tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A single-node parse did not match its rule
    #[error("{rule}: {message} at {position}, near {excerpt:?}")]
    Syntax {
        rule: &'static str,
        message: String,
        position: Position,
        excerpt: String,
    },
    /// The rule matched a prefix but input remains
    #[error("{rule}: unexpected trailing input at {position}, near {excerpt:?}")]
    TrailingInput {
        rule: &'static str,
        position: Position,
        excerpt: String,
    },
    /// Strict document parse hit a fragment no rule accepts
    #[error("unparseable input at {position}: {message}, near {excerpt:?}")]
    Fatal {
        message: String,
        position: Position,
        excerpt: String,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::TrailingInput { position, .. }
            | ParseError::Fatal { position, .. } => *position,
        }
    }
}

/// Errors raised while rebuilding a tree from its tagged-tuple form
///
/// Every variant names the check that failed and carries the offending
/// fragment, never a coerced value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconstructError {
    #[error("tag mismatch: expected {expected}, got {fragment}")]
    TagMismatch { expected: String, fragment: Value },
    #[error("arity mismatch: expected {expected}, got {fragment}")]
    ArityMismatch { expected: String, fragment: Value },
    #[error("field type mismatch: expected {expected}, got {fragment}")]
    FieldType { expected: String, fragment: Value },
}

impl ReconstructError {
    pub fn tag(expected: impl Into<String>, fragment: &Value) -> Self {
        ReconstructError::TagMismatch {
            expected: expected.into(),
            fragment: fragment.clone(),
        }
    }

    pub fn arity(expected: impl Into<String>, fragment: &Value) -> Self {
        ReconstructError::ArityMismatch {
            expected: expected.into(),
            fragment: fragment.clone(),
        }
    }

    pub fn field(expected: impl Into<String>, fragment: &Value) -> Self {
        ReconstructError::FieldType {
            expected: expected.into(),
            fragment: fragment.clone(),
        }
    }

    /// The expectation that failed
    pub fn expected(&self) -> &str {
        match self {
            ReconstructError::TagMismatch { expected, .. }
            | ReconstructError::ArityMismatch { expected, .. }
            | ReconstructError::FieldType { expected, .. } => expected,
        }
    }

    pub fn fragment(&self) -> &Value {
        match self {
            ReconstructError::TagMismatch { fragment, .. }
            | ReconstructError::ArityMismatch { fragment, .. }
            | ReconstructError::FieldType { fragment, .. } => fragment,
        }
    }
}
