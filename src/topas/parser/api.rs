//! Public API for the parser.

use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use std::ops::Range;

use crate::topas::ast::location::excerpt;
use crate::topas::ast::{
    AxialConv, Bkg, Diagnostic, ExistingPrm, Formula, FunctionCall, Local, Macro, NodeKind,
    NumRuns, Parameter, ParameterEquation, ParameterName, ParameterValue, ParseError, Prm, Root,
    SourceLocation, Xdd,
};
use crate::topas::lexer::{lex_with_spans, Token};
use crate::topas::options::{Options, ParseMode};
use crate::topas::parser::combinators::{
    name, token, value_literal, Boxed, Grammar, ParserError, TokenSpan,
};
use crate::topas::parser::elements::formula::{call, formula, operand};
use crate::topas::parser::elements::parameter::{equation, parameter};
use crate::topas::parser::elements::statements::{
    axial_conv, bkg, document, existing_prm, local, macro_def, num_runs, prm, xdd,
};

/// Parse a control file
///
/// Permissive mode never fails: every word no rule accepts is kept as text and
/// reported as a diagnostic. Strict mode builds no fallbacks and fails on the
/// first such word.
pub fn parse(source: &str, mode: ParseMode) -> Result<(Root, Vec<Diagnostic>), ParseError> {
    let options = Options {
        parse_mode: mode,
        ..Options::default()
    };
    parse_with_options(source, &options)
}

pub fn parse_with_options(
    source: &str,
    options: &Options,
) -> Result<(Root, Vec<Diagnostic>), ParseError> {
    let tokens = lex_with_spans(source);
    let recover = options.parse_mode == ParseMode::Permissive;
    let grammar = Grammar::new(source, &tokens, recover);
    let parser = document(&grammar);

    if !recover {
        return parser
            .parse(tokens.clone())
            .map(|root| (root, Vec::new()))
            .map_err(|errors| fatal(source, &tokens, &errors, options.excerpt_len));
    }

    let (root, errors) = parser.parse_recovery(tokens.clone());
    match root {
        Some(root) => {
            let location = SourceLocation::new(source);
            let mut diagnostics: Vec<Diagnostic> = errors
                .iter()
                .map(|error| {
                    Diagnostic::text_fallback(source, &location, error.span(), options.excerpt_len)
                })
                .collect();
            diagnostics.sort_by_key(|d| d.range.start);
            Ok((root, diagnostics))
        }
        None => Err(fatal(source, &tokens, &errors, options.excerpt_len)),
    }
}

/// Byte offset of the token at `index`, or the end of input
fn token_offset(source: &str, tokens: &[TokenSpan], index: usize) -> usize {
    tokens
        .get(index)
        .map(|(_, range)| range.start)
        .unwrap_or(source.len())
}

fn describe(error: &ParserError) -> String {
    match error.reason() {
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unexpected | SimpleReason::Unclosed { .. } => match error.found() {
            Some((token, _)) => format!("unexpected {:?}", token),
            None => "unexpected end of input".to_string(),
        },
    }
}

/// Error furthest into the input, as a fatal parse error
fn fatal(
    source: &str,
    tokens: &[TokenSpan],
    errors: &[ParserError],
    excerpt_len: usize,
) -> ParseError {
    let error = errors.iter().max_by_key(|e| e.span().start);
    let offset = error
        .map(|e| token_offset(source, tokens, e.span().start))
        .unwrap_or(source.len());
    ParseError::Fatal {
        message: error
            .map(describe)
            .unwrap_or_else(|| "no rule matched".to_string()),
        position: SourceLocation::new(source).position(offset),
        excerpt: excerpt(source, offset, excerpt_len),
    }
}

/// Parse `text` as exactly one node of `kind`, trailing newlines allowed
fn parse_node<T: 'static>(
    text: &str,
    kind: NodeKind,
    build: fn(&Grammar) -> Boxed<T>,
) -> Result<T, ParseError> {
    let tokens = lex_with_spans(text);
    let grammar = Grammar::new(text, &tokens, false);
    let location = SourceLocation::new(text);
    let excerpt_len = Options::default().excerpt_len;

    let parser = build(&grammar)
        .then_ignore(token(Token::Newline).repeated())
        .map_with_span(|node, span: Range<usize>| (node, span.end));

    let (node, consumed) = parser.parse(tokens.clone()).map_err(|errors| {
        let error = errors.iter().max_by_key(|e| e.span().start);
        let offset = error
            .map(|e| token_offset(text, &tokens, e.span().start))
            .unwrap_or(text.len());
        ParseError::Syntax {
            rule: kind.tag(),
            message: error
                .map(describe)
                .unwrap_or_else(|| "no rule matched".to_string()),
            position: location.position(offset),
            excerpt: excerpt(text, offset, excerpt_len),
        }
    })?;

    if consumed < tokens.len() {
        let offset = token_offset(text, &tokens, consumed);
        return Err(ParseError::TrailingInput {
            rule: kind.tag(),
            position: location.position(offset),
            excerpt: excerpt(text, offset, excerpt_len),
        });
    }
    Ok(node)
}

/// Parse a single node from its source text
///
/// Parsing is strict: the whole input must form exactly one node.
pub trait Parse: Sized {
    fn parse(text: &str) -> Result<Self, ParseError>;
}

macro_rules! impl_parse {
    ($ty:ty, $kind:expr, $build:expr) => {
        impl Parse for $ty {
            fn parse(text: &str) -> Result<Self, ParseError> {
                parse_node(text, $kind, $build)
            }
        }
    };
}

impl_parse!(ParameterName, NodeKind::ParameterName, |_| name()
    .map(ParameterName::new)
    .boxed());
impl_parse!(ParameterValue, NodeKind::ParameterValue, |_| value_literal()
    .boxed());
impl_parse!(ParameterEquation, NodeKind::ParameterEquation, |g| equation(
    g,
    operand(g)
));
impl_parse!(Parameter, NodeKind::Parameter, |g| parameter(g, operand(g)));
impl_parse!(Prm, NodeKind::Prm, prm);
impl_parse!(FunctionCall, NodeKind::FunctionCall, |g| call(operand(g)));
impl_parse!(Formula, NodeKind::Formula, formula);
impl_parse!(Local, NodeKind::Local, local);
impl_parse!(ExistingPrm, NodeKind::ExistingPrm, existing_prm);
impl_parse!(NumRuns, NodeKind::NumRuns, num_runs);
impl_parse!(Xdd, NodeKind::Xdd, xdd);
impl_parse!(AxialConv, NodeKind::AxialConv, axial_conv);
impl_parse!(Bkg, NodeKind::Bkg, bkg);
impl_parse!(Macro, NodeKind::Macro, macro_def);
impl_parse!(Root, NodeKind::Root, document);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topas::ast::{Operand, Statement, Text};

    #[test]
    fn test_strict_failure_is_fatal() {
        let err = parse("prm a 1\n#junk", ParseMode::Strict).unwrap_err();
        match err {
            ParseError::Fatal {
                position, excerpt, ..
            } => {
                assert_eq!(position.line, 1);
                assert_eq!(excerpt, "#junk");
            }
            other => panic!("expected fatal error, got {:?}", other),
        }
    }

    #[test]
    fn test_permissive_recovers_per_word() {
        let (root, diagnostics) = parse("a #junk b", ParseMode::Permissive).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].range, 2..7);
        assert_eq!(root.statements[1], Statement::Text(Text::new("#junk")));
    }

    #[test]
    fn test_node_parse_rejects_trailing_input() {
        let err = Formula::parse("a + b )").unwrap_err();
        assert!(matches!(err, ParseError::TrailingInput { rule: "formula", .. }));
    }

    #[test]
    fn test_node_parse_allows_trailing_newlines() {
        let formula = Formula::parse("a\n\n").unwrap();
        assert!(matches!(formula.value, Operand::Parameter(_)));
    }

    #[test]
    fn test_node_parse_error_names_rule() {
        let err = NumRuns::parse("num_runs 1.5").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { rule: "num_runs", .. }));
    }
}
