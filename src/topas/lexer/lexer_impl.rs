//! Implementation of the TOPAS lexer
//!
//! Thin wrappers around the logos lexer. Unlike a strict tokenizer, nothing is
//! dropped here: characters logos cannot match come back as [`Token::Unknown`]
//! so that fallback text capture can reproduce them byte for byte.

use crate::topas::lexer::tokens::Token;
use logos::Logos;

/// Tokenize a string and collect all tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with_spans(source)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Tokenize a string and collect tokens with their byte spans
pub fn tokenize_with_spans(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => tokens.push((Token::Unknown(lexer.slice().to_owned()), span)),
        }
    }

    tokens
}
