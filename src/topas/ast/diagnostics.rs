//! Diagnostics reported alongside a permissive parse
//!
//! Permissive parsing never aborts. Every token the grammar could not place is
//! kept verbatim as a text node, and one [`Diagnostic`] is returned for it so
//! callers can tell a clean parse from a recovered one.

use super::location::{excerpt, SourceLocation, Span};
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Code attached to diagnostics produced by text fallback capture
pub const TEXT_FALLBACK: &str = "text-fallback";

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Error => write!(f, "error"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Information => write!(f, "info"),
            DiagnosticSeverity::Hint => write!(f, "hint"),
        }
    }
}

/// Structured diagnostic pointing at a source fragment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Byte range of the offending fragment
    pub range: Range<usize>,
    pub span: Span,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub code: Option<String>,
    pub source: String,
}

impl Diagnostic {
    pub fn new(
        range: Range<usize>,
        span: Span,
        severity: DiagnosticSeverity,
        message: String,
    ) -> Self {
        Self {
            range,
            span,
            severity,
            message,
            code: None,
            source: "topas".to_string(),
        }
    }

    /// Warning for a fragment captured as text instead of structure
    pub fn text_fallback(
        source: &str,
        location: &SourceLocation,
        range: Range<usize>,
        excerpt_len: usize,
    ) -> Self {
        let message = format!(
            "Can't parse text {:?}",
            excerpt(source, range.start, excerpt_len)
        );
        let span = location.span(&range);
        Diagnostic::new(range, span, DiagnosticSeverity::Warning, message).with_code(TEXT_FALLBACK)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.source, self.message, self.span.start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_fallback_message() {
        let source = "a\n#junk here";
        let loc = SourceLocation::new(source);
        let diag = Diagnostic::text_fallback(source, &loc, 2..7, 100);

        assert_eq!(diag.message, "Can't parse text \"#junk here\"");
        assert_eq!(diag.code.as_deref(), Some(TEXT_FALLBACK));
        assert_eq!(
            diag.to_string(),
            "warning [topas]: Can't parse text \"#junk here\" at 2:1"
        );
    }

    #[test]
    fn test_excerpt_is_bounded() {
        let source = "x".repeat(300);
        let loc = SourceLocation::new(&source);
        let diag = Diagnostic::text_fallback(&source, &loc, 0..300, 100);
        assert_eq!(diag.message.len(), "Can't parse text \"\"".len() + 100);
    }
}
