//! Source positions for diagnostics and errors
//!
//! Tokens carry byte ranges; people read line/column pairs. [`SourceLocation`]
//! converts between the two. Lines and columns are zero-based, columns are
//! counted in bytes. `\r\n`, `\n` and a lone `\r` all end a line, matching the
//! lexer's notion of a newline.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// A line/column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Start and end positions of a source fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Byte offset to line/column lookup table for one source text
pub struct SourceLocation {
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];

        for (pos, byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push(pos + 1),
                b'\r' if bytes.get(pos + 1) != Some(&b'\n') => line_starts.push(pos + 1),
                _ => {}
            }
        }

        Self { line_starts }
    }

    pub fn position(&self, byte_offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        Position::new(line, byte_offset - self.line_starts[line])
    }

    pub fn span(&self, range: &Range<usize>) -> Span {
        Span::new(self.position(range.start), self.position(range.end))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// At most `max_chars` characters of `source` starting at byte `start`
pub fn excerpt(source: &str, start: usize, max_chars: usize) -> String {
    source
        .get(start..)
        .unwrap_or("")
        .chars()
        .take(max_chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_single_line() {
        let loc = SourceLocation::new("prm a 1");
        assert_eq!(loc.position(0), Position::new(0, 0));
        assert_eq!(loc.position(4), Position::new(0, 4));
    }

    #[test]
    fn test_position_multiline() {
        let loc = SourceLocation::new("a\nbb\r\nccc\rd");
        assert_eq!(loc.line_count(), 4);
        assert_eq!(loc.position(2), Position::new(1, 0));
        assert_eq!(loc.position(3), Position::new(1, 1));
        assert_eq!(loc.position(6), Position::new(2, 0));
        assert_eq!(loc.position(10), Position::new(3, 0));
    }

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(Position::new(0, 4).to_string(), "1:5");
        let span = SourceLocation::new("ab\ncd").span(&(1..4));
        assert_eq!(span.to_string(), "1:2..2:2");
    }

    #[test]
    fn test_excerpt_is_char_bounded() {
        assert_eq!(excerpt("abc√def", 1, 3), "bc√");
        assert_eq!(excerpt("abc", 10, 3), "");
    }
}
