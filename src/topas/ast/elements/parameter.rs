//! Parameter family: values, equations, clauses and records
//!
//! A parameter record comes in two mutually exclusive shapes:
//!
//! - labeled: `[!] [@] [name] [value | = equation;] [clause value]...`
//! - chain: a run of bare names and values (`A1 B2 C3`), stored as a singly
//!   linked list through [`Parameter::next`]. Each link carries exactly one
//!   name or one value and nothing else.
//!
//! [`Prm`] is the labeled record introduced by the `prm` keyword; it always has
//! a value and never a refine flag or a chain.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use super::formula::Formula;
use super::text::{ParameterName, Text};
use crate::topas::ast::decimal::Decimal;

const NUMBER: &str = r"(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?";

static VALUE_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^([+-]?{n})(`)?(?:_([+-]?{n}))?((?:_LIMIT_(?:MIN|MAX)_[+-]?{n})*)$",
        n = NUMBER
    ))
    .unwrap()
});

static LIMIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"_LIMIT_(MIN|MAX)_([+-]?{})", NUMBER)).unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a parameter value literal: {0:?}")]
pub struct ValueLiteralError(pub String);

/// A number with its refinement annotations
///
/// Written as one literal: `-12.3`_2_LIMIT_MIN_-13_LIMIT_MAX_2.1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterValue {
    pub value: Decimal,
    /// Trailing backtick, asks the refinement to report the esd
    pub backtick: bool,
    pub esd: Option<Decimal>,
    pub limit_min: Option<Decimal>,
    pub limit_max: Option<Decimal>,
}

impl ParameterValue {
    pub fn new(value: Decimal) -> Self {
        Self {
            value,
            backtick: false,
            esd: None,
            limit_min: None,
            limit_max: None,
        }
    }

    /// Decompose a full value literal
    pub fn from_literal(literal: &str) -> Result<Self, ValueLiteralError> {
        let invalid = || ValueLiteralError(literal.to_string());
        let caps = VALUE_LITERAL.captures(literal).ok_or_else(invalid)?;
        let decimal = |text: &str| text.parse::<Decimal>().map_err(|_| invalid());

        let mut value = ParameterValue::new(decimal(&caps[1])?);
        value.backtick = caps.get(2).is_some();
        value.esd = caps.get(3).map(|m| decimal(m.as_str())).transpose()?;

        for limit in LIMIT.captures_iter(&caps[4]) {
            let bound = decimal(&limit[2])?;
            match &limit[1] {
                "MIN" => value.limit_min = Some(bound),
                _ => value.limit_max = Some(bound),
            }
        }
        Ok(value)
    }
}

impl From<Decimal> for ParameterValue {
    fn from(value: Decimal) -> Self {
        ParameterValue::new(value)
    }
}

/// Canonical literal: value, backtick, esd, min limit, max limit
impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if self.backtick {
            f.write_str("`")?;
        }
        if let Some(esd) = &self.esd {
            write!(f, "_{}", esd)?;
        }
        if let Some(min) = &self.limit_min {
            write!(f, "_LIMIT_MIN_{}", min)?;
        }
        if let Some(max) = &self.limit_max {
            write!(f, "_LIMIT_MAX_{}", max)?;
        }
        Ok(())
    }
}

/// Left-hand side of an equation, `= body;`
#[derive(Debug, Clone, PartialEq)]
pub enum EquationBody {
    Formula(Box<Formula>),
    Text(Text),
}

/// Optional `: value` suffix of an equation
#[derive(Debug, Clone, PartialEq)]
pub enum Reporting {
    Value(ParameterValue),
    Text(Text),
}

/// `= formula;` with an optional ` : reporting` suffix
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEquation {
    pub body: EquationBody,
    pub reporting: Option<Reporting>,
}

impl ParameterEquation {
    pub fn new(formula: Formula) -> Self {
        Self {
            body: EquationBody::Formula(Box::new(formula)),
            reporting: None,
        }
    }

    pub fn with_reporting(mut self, reporting: Reporting) -> Self {
        self.reporting = Some(reporting);
        self
    }
}

/// Anything that can stand where a parameter value is expected
#[derive(Debug, Clone, PartialEq)]
pub enum PrmValue {
    Value(ParameterValue),
    Equation(ParameterEquation),
    Text(Text),
}

/// Keyword clauses attached to a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
    Min,
    Max,
    Del,
    Update,
    StopWhen,
    ValOnContinue,
}

impl Clause {
    pub const ALL: [Clause; 6] = [
        Clause::Min,
        Clause::Max,
        Clause::Del,
        Clause::Update,
        Clause::StopWhen,
        Clause::ValOnContinue,
    ];

    /// Source keyword introducing the clause
    pub fn keyword(self) -> &'static str {
        match self {
            Clause::Min => "min",
            Clause::Max => "max",
            Clause::Del => "del",
            Clause::Update => "update",
            Clause::StopWhen => "stop_when",
            Clause::ValOnContinue => "val_on_continue",
        }
    }

    /// Key of the clause in a serialized parameter record
    pub fn key(self) -> &'static str {
        match self {
            Clause::Min => "_",
            Clause::Max => "^",
            Clause::Del => "d",
            Clause::Update => "u",
            Clause::StopWhen => "s",
            Clause::ValOnContinue => "c",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Clause> {
        Clause::ALL.into_iter().find(|c| c.keyword() == keyword)
    }

    pub fn from_key(key: &str) -> Option<Clause> {
        Clause::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Clauses in canonical order; a repeated keyword keeps its last value
pub type Clauses = BTreeMap<Clause, PrmValue>;

/// A labeled parameter record or one link of a bare-token chain
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    /// `!`: not to be refined
    pub fixed: bool,
    /// `@`: to be refined
    pub refined: bool,
    pub name: Option<ParameterName>,
    pub value: Option<PrmValue>,
    pub clauses: Clauses,
    pub next: Option<Box<Parameter>>,
}

impl Parameter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(ParameterName::new(name)),
            ..Default::default()
        }
    }

    pub fn valued(value: impl Into<PrmValue>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<PrmValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_clause(mut self, clause: Clause, value: impl Into<PrmValue>) -> Self {
        self.clauses.insert(clause, value.into());
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn refined(mut self) -> Self {
        self.refined = true;
        self
    }

    /// Link bare links right to left; the last link has no `next`
    pub fn chain(links: Vec<Parameter>) -> Option<Parameter> {
        links.into_iter().rev().fold(None, |next, mut link| {
            link.next = next.map(Box::new);
            Some(link)
        })
    }

    pub fn is_chain(&self) -> bool {
        self.next.is_some()
    }

    /// Links of a chain, starting with this one
    pub fn links(&self) -> impl Iterator<Item = &Parameter> {
        std::iter::successors(Some(self), |p| p.next.as_deref())
    }
}

/// User defined parameter, `prm [!] [name] value [clauses]`
#[derive(Debug, Clone, PartialEq)]
pub struct Prm {
    pub fixed: bool,
    pub name: Option<ParameterName>,
    pub value: PrmValue,
    pub clauses: Clauses,
}

impl Prm {
    pub fn new(value: impl Into<PrmValue>) -> Self {
        Self {
            fixed: false,
            name: None,
            value: value.into(),
            clauses: Clauses::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(ParameterName::new(name));
        self
    }

    /// Narrow a generic record; `None` when it carries `@`, a chain or no value
    pub fn from_parameter(parameter: Parameter) -> Option<Prm> {
        if parameter.refined || parameter.next.is_some() {
            return None;
        }
        Some(Prm {
            fixed: parameter.fixed,
            name: parameter.name,
            value: parameter.value?,
            clauses: parameter.clauses,
        })
    }

    pub fn to_parameter(&self) -> Parameter {
        Parameter {
            fixed: self.fixed,
            refined: false,
            name: self.name.clone(),
            value: Some(self.value.clone()),
            clauses: self.clauses.clone(),
            next: None,
        }
    }
}

impl From<ParameterValue> for PrmValue {
    fn from(value: ParameterValue) -> Self {
        PrmValue::Value(value)
    }
}

impl From<ParameterEquation> for PrmValue {
    fn from(equation: ParameterEquation) -> Self {
        PrmValue::Equation(equation)
    }
}

impl From<Text> for PrmValue {
    fn from(text: Text) -> Self {
        PrmValue::Text(text)
    }
}
