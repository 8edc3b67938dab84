//! Parser module for TOPAS control files
//!
//! The grammar is written with chumsky over the token stream produced by
//! [`crate::topas::lexer::lex_with_spans`]. Element grammars live in
//! `elements/`, one file per family:
//!
//! - `parameter`: values, equations, labeled records and bare chains
//! - `formula`: precedence levels, unary signs, calls and their arguments
//! - `statements`: keyword statements, macros and the document root
//!
//! [`parse`] is the document entry point. Every node type also implements
//! [`Parse`] for parsing it on its own.

pub mod api;
pub(crate) mod combinators;
pub(crate) mod elements;

pub use api::{parse, parse_with_options, Parse};
