//! Macro definitions

use super::formula::FuncArg;
use super::root::{coalesce_text, Statement};

/// `macro name(args) { statements }`
///
/// The body holds the same statements as the document root, including nested
/// macros. A macro without arguments has an empty `args` list and is written
/// without parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub name: String,
    pub args: Vec<Option<FuncArg>>,
    pub statements: Vec<Statement>,
}

impl Macro {
    /// Adjacent text statements in the body are merged
    pub fn new(
        name: impl Into<String>,
        args: Vec<Option<FuncArg>>,
        statements: Vec<Statement>,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            statements: coalesce_text(statements),
        }
    }
}
