//! Token definitions for TOPAS control files
//!
//! The tokenizer is a plain logos lexer. Comments and horizontal whitespace are
//! skipped here so that no later stage ever sees them; newlines survive because
//! they terminate statements.
//!
//! Number literals are lexed as a single [`Token::Value`], including the
//! optional backtick, esd and limit suffixes (`1.5`_0.2_LIMIT_MIN_0`), so the
//! parser never has to reassemble a value from fragments. Signs are separate
//! tokens at this stage; see [`super::sign_transform`].
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible tokens in a TOPAS control file
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Serialize)]
#[logos(skip r"[ \t\x0C]+")]
#[logos(skip r"'[^\r\n]*")]
pub enum Token {
    // Line breaks
    #[regex(r"\r\n|\n|\r")]
    Newline,

    // Identifiers and keywords; keywords are resolved by the parser
    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Name(String),

    // Unsigned number with optional backtick, esd and limit suffixes
    #[regex(
        r"([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?`?(_[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?)?(_LIMIT_(MIN|MAX)_[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?)*",
        |lex| lex.slice().to_owned()
    )]
    Value(String),

    // Double-quoted string, raw slice including the quotes
    #[regex(r#""([^"\\\r\n]|\\.)*""#, |lex| lex.slice().to_owned())]
    Quoted(String),

    // Backslash followed by a blank, used inside bare file names
    #[regex(r"\\[ \t]")]
    EscapedSpace,

    #[token("_xy")]
    InlineXy,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    #[token("/*", skip_block_comment)]
    Slash,
    #[token("^")]
    Caret,

    // Comparison
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,

    // Assignment
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("^=")]
    CaretAssign,

    // Punctuation
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,

    // Parameter flags
    #[token("!")]
    Bang,
    #[token("@")]
    At,

    // Anything logos could not match, kept verbatim for text fallback
    Unknown(String),
}

/// Skip a `/* ... */` comment, newlines included; an unclosed one runs to end of input
fn skip_block_comment(lex: &mut logos::Lexer<Token>) -> logos::Skip {
    let remainder = lex.remainder();
    let len = remainder
        .find("*/")
        .map(|end| end + 2)
        .unwrap_or(remainder.len());
    lex.bump(len);
    logos::Skip
}

impl Token {
    /// Check if this token can end an operand (so a following sign is binary)
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Name(_) | Token::Value(_) | Token::Quoted(_) | Token::CloseParen
        )
    }

    /// Check if this token is an identifier with the given text
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Name(name) if name == keyword)
    }

    /// Check if this token is a line break
    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Newline)
    }

    /// Check if this token is a brace
    pub fn is_brace(&self) -> bool {
        matches!(self, Token::OpenBrace | Token::CloseBrace)
    }
}

/// Source spelling of the token
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spelling = match self {
            Token::Newline => "\n",
            Token::Name(text) | Token::Value(text) | Token::Quoted(text) | Token::Unknown(text) => {
                text.as_str()
            }
            Token::EscapedSpace => "\\ ",
            Token::InlineXy => "_xy",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Caret => "^",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::Assign => "=",
            Token::PlusAssign => "+=",
            Token::MinusAssign => "-=",
            Token::StarAssign => "*=",
            Token::SlashAssign => "/=",
            Token::CaretAssign => "^=",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::Bang => "!",
            Token::At => "@",
        };
        f.write_str(spelling)
    }
}
