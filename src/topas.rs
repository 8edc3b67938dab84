//! Main module for TOPAS control file handling
//!
//! Text goes through [`lexer`] and [`parser`] into an [`ast::Root`]. From
//! there [`formats`] renders it as tagged-tuple JSON or back as source, and
//! [`processor`] strings the stages together behind one format name.

pub mod ast;
pub mod formats;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod processor;

pub use ast::{Diagnostic, ParseError, ReconstructError, Root};
pub use formats::{serialize, unparse, unserialize, Serializable, Unparse};
pub use options::{Options, ParseMode, SerializeMode};
pub use parser::{parse, parse_with_options, Parse};
