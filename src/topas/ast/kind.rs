//! Static node kind and operator tables
//!
//! Two tables live here and nowhere else:
//!
//! - [`NodeKind`]: the closed set of node kinds and their wire tags. The tag →
//!   kind map drives unserialize dispatch, and the statement keywords the
//!   parser matches are the same tags.
//! - [`OPERATORS`]: precedence, arity and associativity of every formula
//!   operator. The precedence-climbing parser builds its levels from it and
//!   the unparser consults it to decide on parentheses.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::topas::lexer::Token;

/// Every node kind with a wire tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    LineBreak,
    ParameterName,
    ParameterValue,
    ParameterEquation,
    Parameter,
    Prm,
    FunctionCall,
    Operator(Operator),
    Formula,
    Local,
    ExistingPrm,
    NumRuns,
    Xdd,
    AxialConv,
    Bkg,
    Macro,
    Root,
}

const PLAIN_KINDS: [(NodeKind, &str); 17] = [
    (NodeKind::Text, "text"),
    (NodeKind::LineBreak, "lb"),
    (NodeKind::ParameterName, "parameter_name"),
    (NodeKind::ParameterValue, "parameter_value"),
    (NodeKind::ParameterEquation, "prm_eq"),
    (NodeKind::Parameter, "p"),
    (NodeKind::Prm, "prm"),
    (NodeKind::FunctionCall, "func_call"),
    (NodeKind::Formula, "formula"),
    (NodeKind::Local, "local"),
    (NodeKind::ExistingPrm, "existing_prm"),
    (NodeKind::NumRuns, "num_runs"),
    (NodeKind::Xdd, "xdd"),
    (NodeKind::AxialConv, "axial_conv"),
    (NodeKind::Bkg, "bkg"),
    (NodeKind::Macro, "macro"),
    (NodeKind::Root, "topas"),
];

static BY_TAG: Lazy<HashMap<&'static str, NodeKind>> = Lazy::new(|| {
    PLAIN_KINDS
        .iter()
        .copied()
        .map(|(kind, tag)| (tag, kind))
        .chain(
            OPERATORS
                .iter()
                .map(|info| (info.tag, NodeKind::Operator(info.operator))),
        )
        .collect()
});

impl NodeKind {
    /// Wire tag of this kind
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Operator(op) => op.tag(),
            kind => PLAIN_KINDS
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, tag)| *tag)
                .unwrap_or_default(),
        }
    }

    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        BY_TAG.get(tag).copied()
    }

    /// All tags, used in "expected one of" messages
    pub fn all_tags() -> Vec<&'static str> {
        let mut tags: Vec<_> = BY_TAG.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

/// Formula operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    UnaryPlus,
    UnaryMinus,
    Exp,
    Mul,
    Div,
    Add,
    Sub,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Unary,
    Nary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Descriptor of one formula operator
#[derive(Debug)]
pub struct OperatorInfo {
    pub operator: Operator,
    pub tag: &'static str,
    pub symbol: &'static str,
    /// Higher binds tighter
    pub precedence: u8,
    pub arity: Arity,
    pub assoc: Assoc,
}

const fn op(
    operator: Operator,
    tag: &'static str,
    symbol: &'static str,
    precedence: u8,
    arity: Arity,
    assoc: Assoc,
) -> OperatorInfo {
    OperatorInfo {
        operator,
        tag,
        symbol,
        precedence,
        arity,
        assoc,
    }
}

/// Indexed by `Operator as usize`
pub static OPERATORS: [OperatorInfo; 13] = [
    op(Operator::UnaryPlus, "+1", "+", 10, Arity::Unary, Assoc::Right),
    op(Operator::UnaryMinus, "-1", "-", 10, Arity::Unary, Assoc::Right),
    op(Operator::Exp, "^", "^", 9, Arity::Nary, Assoc::Left),
    op(Operator::Mul, "*", "*", 8, Arity::Nary, Assoc::Left),
    op(Operator::Div, "/", "/", 8, Arity::Nary, Assoc::Left),
    op(Operator::Add, "+", "+", 7, Arity::Nary, Assoc::Left),
    op(Operator::Sub, "-", "-", 7, Arity::Nary, Assoc::Left),
    op(Operator::Eq, "==", "==", 6, Arity::Nary, Assoc::Left),
    op(Operator::Ne, "!=", "!=", 5, Arity::Nary, Assoc::Left),
    op(Operator::Lt, "<", "<", 4, Arity::Nary, Assoc::Left),
    op(Operator::Le, "<=", "<=", 3, Arity::Nary, Assoc::Left),
    op(Operator::Gt, ">", ">", 2, Arity::Nary, Assoc::Left),
    op(Operator::Ge, ">=", ">=", 1, Arity::Nary, Assoc::Left),
];

/// N-ary operators grouped by precedence, tightest level first
pub static NARY_LEVELS: Lazy<Vec<Vec<Operator>>> = Lazy::new(|| {
    let mut levels: Vec<Vec<Operator>> = Vec::new();
    let mut nary: Vec<&OperatorInfo> = OPERATORS
        .iter()
        .filter(|info| info.arity == Arity::Nary)
        .collect();
    nary.sort_by(|a, b| b.precedence.cmp(&a.precedence));

    let mut current = None;
    for info in nary {
        if current != Some(info.precedence) {
            levels.push(Vec::new());
            current = Some(info.precedence);
        }
        if let Some(level) = levels.last_mut() {
            level.push(info.operator);
        }
    }
    levels
});

impl Operator {
    pub fn info(self) -> &'static OperatorInfo {
        &OPERATORS[self as usize]
    }

    pub fn tag(self) -> &'static str {
        self.info().tag
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn precedence(self) -> u8 {
        self.info().precedence
    }

    pub fn is_unary(self) -> bool {
        self.info().arity == Arity::Unary
    }

    /// Token spelling this operator in a formula
    pub fn token(self) -> Token {
        match self {
            Operator::UnaryPlus | Operator::Add => Token::Plus,
            Operator::UnaryMinus | Operator::Sub => Token::Minus,
            Operator::Exp => Token::Caret,
            Operator::Mul => Token::Star,
            Operator::Div => Token::Slash,
            Operator::Eq => Token::EqEq,
            Operator::Ne => Token::NotEq,
            Operator::Lt => Token::Less,
            Operator::Le => Token::LessEq,
            Operator::Gt => Token::Greater,
            Operator::Ge => Token::GreaterEq,
        }
    }
}
