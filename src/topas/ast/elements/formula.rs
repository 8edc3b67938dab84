//! Formula nodes
//!
//! A formula is an infix expression over function calls and parameters.
//! Binary operators fold runs of the same operator into one n-ary node, so
//! `1+2+3` is a single `+` with three operands while `1+2-3` nests.

use super::parameter::Parameter;
use super::text::Text;
use crate::topas::ast::kind::Operator;

/// Operand of a formula or an operator
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Call(FunctionCall),
    Parameter(Parameter),
    Op(FormulaOp),
    Text(Text),
}

/// Unary or n-ary operator application
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaOp {
    pub operator: Operator,
    pub operands: Vec<Operand>,
}

impl FormulaOp {
    pub fn unary(operator: Operator, operand: Operand) -> Self {
        Self {
            operator,
            operands: vec![operand],
        }
    }

    pub fn nary(operator: Operator, operands: Vec<Operand>) -> Self {
        Self { operator, operands }
    }

    /// Operand count this operator requires
    pub fn arity_ok(&self) -> bool {
        if self.operator.is_unary() {
            self.operands.len() == 1
        } else {
            self.operands.len() >= 2
        }
    }
}

/// A complete expression
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    pub value: Operand,
}

impl Formula {
    pub fn new(value: Operand) -> Self {
        Self { value }
    }
}

/// One argument slot of a call; `None` in the slot list is an explicit gap
#[derive(Debug, Clone, PartialEq)]
pub enum FuncArg {
    Formula(Formula),
    Str(String),
    Text(Text),
}

/// `name(arg, arg, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Option<FuncArg>>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Option<FuncArg>>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl From<Parameter> for Operand {
    fn from(parameter: Parameter) -> Self {
        Operand::Parameter(parameter)
    }
}

impl From<FunctionCall> for Operand {
    fn from(call: FunctionCall) -> Self {
        Operand::Call(call)
    }
}

impl From<FormulaOp> for Operand {
    fn from(op: FormulaOp) -> Self {
        Operand::Op(op)
    }
}

impl From<Operand> for Formula {
    fn from(value: Operand) -> Self {
        Formula::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_check() {
        let a = Operand::from(Parameter::named("a"));
        assert!(FormulaOp::unary(Operator::UnaryMinus, a.clone()).arity_ok());
        assert!(!FormulaOp::nary(Operator::Add, vec![a.clone()]).arity_ok());
        assert!(FormulaOp::nary(Operator::Add, vec![a.clone(), a]).arity_ok());
    }
}
