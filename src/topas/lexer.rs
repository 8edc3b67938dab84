//! Lexer module for TOPAS control files
//!
//! Lexing happens in two passes:
//!
//! - `lexer_impl`: the logos tokenizer. Comments and blanks are discarded,
//!   everything else (including unknown characters) becomes a token with its
//!   byte span.
//! - `sign_transform`: folds a sign into the number that follows it when the
//!   sign cannot be a binary operator.
//!
//! The parser always consumes the output of [`lex_with_spans`].

pub mod lexer_impl;
pub mod sign_transform;
pub mod tokens;

pub use lexer_impl::{tokenize, tokenize_with_spans};
pub use sign_transform::merge_signs;
pub use tokens::Token;

/// Fully processed tokens (tokenize + sign merging)
pub fn lex(source: &str) -> Vec<Token> {
    lex_with_spans(source)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Fully processed tokens with their byte spans in `source`
pub fn lex_with_spans(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    merge_signs(tokenize_with_spans(source))
}
