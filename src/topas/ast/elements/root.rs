//! Document root and the statement union

use super::formula::Formula;
use super::macro_block::Macro;
use super::parameter::Prm;
use super::statements::{AxialConv, Bkg, ExistingPrm, Local, NumRuns, Xdd};
use super::text::Text;

/// Anything that may appear at the top level or inside a macro body
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A newline not consumed as a statement terminator
    LineBreak,
    Text(Text),
    /// Bare double-quoted string
    Str(String),
    Formula(Formula),
    Prm(Prm),
    Local(Local),
    ExistingPrm(ExistingPrm),
    NumRuns(NumRuns),
    Xdd(Xdd),
    AxialConv(AxialConv),
    Bkg(Bkg),
    Macro(Macro),
}

impl Statement {
    pub fn is_line_break(&self) -> bool {
        matches!(self, Statement::LineBreak)
    }
}

/// Merge each run of adjacent text statements into one, space separated
pub(crate) fn coalesce_text(statements: Vec<Statement>) -> Vec<Statement> {
    let mut merged: Vec<Statement> = Vec::with_capacity(statements.len());
    for statement in statements {
        if let (Some(Statement::Text(last)), Statement::Text(text)) =
            (merged.last_mut(), &statement)
        {
            last.join(text);
            continue;
        }
        merged.push(statement);
    }
    merged
}

/// A parsed control file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    pub statements: Vec<Statement>,
}

impl Root {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            statements: coalesce_text(statements),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_coalesces_adjacent_text() {
        let root = Root::new(vec![
            Statement::Text(Text::new("#@@!")),
            Statement::Text(Text::new("#$%")),
            Statement::Text(Text::new("^&*()")),
            Statement::LineBreak,
            Statement::Text(Text::new("x")),
        ]);
        assert_eq!(
            root.statements,
            vec![
                Statement::Text(Text::new("#@@! #$% ^&*()")),
                Statement::LineBreak,
                Statement::Text(Text::new("x")),
            ]
        );
    }

    #[test]
    fn test_macro_body_coalesces_text() {
        let m = Macro::new(
            "m",
            Vec::new(),
            vec![
                Statement::Text(Text::new("a")),
                Statement::Text(Text::new("b")),
            ],
        );
        assert_eq!(m.statements, vec![Statement::Text(Text::new("a b"))]);
    }
}
