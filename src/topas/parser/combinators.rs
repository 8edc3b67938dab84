//! Parser combinator helpers shared by all element grammars

use chumsky::prelude::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use crate::topas::ast::{
    AxialField, Clause, Decimal, NodeKind, ParameterValue, Text,
};
use crate::topas::lexer::Token;

/// Type alias for token with its byte range
pub(crate) type TokenSpan = (Token, Range<usize>);

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenSpan>;

/// Type-erased parser over the token stream
pub(crate) type Boxed<O> = BoxedParser<'static, TokenSpan, O, ParserError>;

/// Statement keywords, clause keywords and axial_conv keywords never name a
/// parameter; otherwise a bare-token chain would swallow them.
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let statements = [
        NodeKind::Prm,
        NodeKind::Local,
        NodeKind::ExistingPrm,
        NodeKind::NumRuns,
        NodeKind::Xdd,
        NodeKind::AxialConv,
        NodeKind::Bkg,
        NodeKind::Macro,
    ];
    statements
        .iter()
        .map(|kind| kind.tag())
        .chain(Clause::ALL.iter().map(|c| c.keyword()))
        .chain(AxialField::ALL.iter().map(|f| f.keyword()))
        .collect()
});

pub(crate) fn is_reserved(word: &str) -> bool {
    RESERVED.contains(word)
}

/// Per-parse grammar context
///
/// Holds the source text (fallback captures copy it verbatim), the set of
/// token start offsets glued to the previous token, and whether fallback
/// alternatives are built at all.
#[derive(Clone)]
pub struct Grammar {
    pub(crate) source: Arc<String>,
    glued: Arc<HashSet<usize>>,
    pub(crate) recover: bool,
}

impl Grammar {
    pub(crate) fn new(source: &str, tokens: &[TokenSpan], recover: bool) -> Self {
        let glued = tokens
            .windows(2)
            .filter(|pair| !pair[0].0.is_newline() && pair[0].1.end == pair[1].1.start)
            .map(|pair| pair[1].1.start)
            .collect();
        Self {
            source: Arc::new(source.to_string()),
            glued: Arc::new(glued),
            recover,
        }
    }

    pub(crate) fn slice(&self, range: &Range<usize>) -> &str {
        self.source.get(range.clone()).unwrap_or("")
    }

    pub(crate) fn text(&self, range: &Range<usize>) -> Text {
        Text::new(self.slice(range))
    }

    /// One whitespace-delimited word: a run of glued tokens on one line
    ///
    /// With `in_block` set the word stops before `}` so a macro body can close.
    pub(crate) fn word(
        &self,
        in_block: bool,
    ) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
        let glued = self.glued.clone();
        let accepts =
            move |tok: &Token| !tok.is_newline() && !(in_block && *tok == Token::CloseBrace);

        filter(move |(tok, _): &TokenSpan| accepts(tok))
            .map(|(_, range)| range)
            .then(
                filter(move |(tok, range): &TokenSpan| {
                    accepts(tok) && glued.contains(&range.start)
                })
                .map(|(_, range)| range)
                .repeated(),
            )
            .map(|(first, rest)| {
                let end = rest.last().map(|r| r.end).unwrap_or(first.end);
                first.start..end
            })
    }

    /// Wrap a capture so it reports a text-fallback diagnostic
    pub(crate) fn fallback<P, O>(
        &self,
        parser: P,
    ) -> impl Parser<TokenSpan, O, Error = ParserError> + Clone
    where
        P: Parser<TokenSpan, (O, Range<usize>), Error = ParserError> + Clone,
    {
        parser.validate(|(out, range), _, emit| {
            emit(Simple::custom(range, "text fallback"));
            out
        })
    }
}

/// Helper: smallest byte range covering all `ranges`
pub(crate) fn cover(ranges: &[Range<usize>]) -> Range<usize> {
    match (ranges.first(), ranges.last()) {
        (Some(first), Some(last)) => first.start..last.end,
        _ => 0..0,
    }
}

/// Helper: match a specific token type, ignoring the location
pub(crate) fn token(t: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok == &t).ignored()
}

/// Helper: match an identifier spelled exactly `word`
pub(crate) fn keyword(
    word: &'static str,
) -> impl Parser<TokenSpan, Range<usize>, Error = ParserError> + Clone {
    filter(move |(tok, _): &TokenSpan| tok.is_keyword(word)).map(|(_, range)| range)
}

/// Helper: any identifier that is not reserved
pub(crate) fn name() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Name(name) if !is_reserved(&name) => Ok(name),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Helper: any identifier, reserved or not
pub(crate) fn any_name() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Name(name) => Ok(name),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Helper: a full value literal with its suffixes
pub(crate) fn value_literal() -> impl Parser<TokenSpan, ParameterValue, Error = ParserError> + Clone
{
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Value(literal) => {
            ParameterValue::from_literal(&literal).map_err(|e| Simple::custom(span, e.to_string()))
        }
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Helper: a plain number without suffixes
pub(crate) fn decimal() -> impl Parser<TokenSpan, Decimal, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Value(literal) => literal
            .parse::<Decimal>()
            .map_err(|e| Simple::custom(span, e.to_string())),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// Helper: a double-quoted string, unescaped
pub(crate) fn quoted() -> impl Parser<TokenSpan, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Quoted(raw) => Ok(unquote(&raw)),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    })
}

/// JSON unescape when the literal is valid JSON, else strip the quotes
pub(crate) fn unquote(raw: &str) -> String {
    serde_json::from_str::<String>(raw).unwrap_or_else(|_| {
        raw.strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw)
            .to_string()
    })
}
