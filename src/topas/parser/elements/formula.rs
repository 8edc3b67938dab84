//! Formula grammar
//!
//! Grammar:
//!   formula = level_n
//!   level_k = level_{k-1} (op_k level_{k-1})*     one level per NARY_LEVELS entry
//!   level_0 = ("+" | "-")* atom
//!   atom    = call | parameter | "(" formula ")"
//!   call    = name "(" (arg? ("," arg?)*) ")"
//!   arg     = formula | quoted
//!
//! Parentheses leave no node behind; the folded shape of the tree records the
//! grouping instead.

use chumsky::prelude::*;

use crate::topas::ast::{
    Formula, FormulaOp, FuncArg, FunctionCall, Operand, Operator, NARY_LEVELS,
};
use crate::topas::lexer::Token;
use crate::topas::parser::combinators::{name, quoted, token, Boxed, Grammar, TokenSpan};
use crate::topas::parser::elements::parameter::parameter;

/// Full expression
pub(crate) fn operand(g: &Grammar) -> Boxed<Operand> {
    let g = g.clone();
    recursive(move |operand| {
        let operand: Boxed<Operand> = operand.boxed();

        let group = token(Token::OpenParen)
            .ignore_then(operand.clone())
            .then_ignore(token(Token::CloseParen));

        let atom = choice((
            call(operand.clone()).map(Operand::Call),
            parameter(&g, operand.clone()).map(Operand::Parameter),
            group,
        ));

        let sign = filter_map(|span, (tok, range): TokenSpan| match tok {
            Token::Plus => Ok(Operator::UnaryPlus),
            Token::Minus => Ok(Operator::UnaryMinus),
            other => Err(Simple::expected_input_found(
                span,
                Vec::new(),
                Some((other, range)),
            )),
        });

        let unary = sign
            .repeated()
            .then(atom)
            .foldr(|op, rhs| Operand::Op(FormulaOp::unary(op, rhs)))
            .boxed();

        NARY_LEVELS
            .iter()
            .fold(unary, |tighter, level| nary_level(tighter, level.clone()))
    })
    .boxed()
}

pub(crate) fn formula(g: &Grammar) -> Boxed<Formula> {
    operand(g).map(Formula::new).boxed()
}

/// One precedence level: operands of the tighter level joined by this
/// level's operators
fn nary_level(tighter: Boxed<Operand>, ops: Vec<Operator>) -> Boxed<Operand> {
    let op = filter_map(move |span, (tok, range): TokenSpan| {
        ops.iter()
            .copied()
            .find(|op| op.token() == tok)
            .ok_or_else(|| Simple::expected_input_found(span, Vec::new(), Some((tok, range))))
    });

    tighter
        .clone()
        .then(op.then(tighter).repeated())
        .map(|(first, rest)| fold_run(first, rest))
        .boxed()
}

/// Fold `a op b op c ...` into n-ary nodes
///
/// Consecutive uses of one operator extend the node built by this fold. An
/// operand that arrived already folded (from parentheses) is never extended.
fn fold_run(first: Operand, rest: Vec<(Operator, Operand)>) -> Operand {
    let mut acc = first;
    let mut built = false;
    for (op, rhs) in rest {
        if built {
            if let Operand::Op(node) = &mut acc {
                if node.operator == op {
                    node.operands.push(rhs);
                    continue;
                }
            }
        }
        acc = Operand::Op(FormulaOp::nary(op, vec![acc, rhs]));
        built = true;
    }
    acc
}

/// `(arg, arg, ...)` with explicit gaps; `()` is an empty list
pub(crate) fn call_args(operand: Boxed<Operand>) -> Boxed<Vec<Option<FuncArg>>> {
    let arg = choice((
        operand.map(|value| FuncArg::Formula(Formula::new(value))),
        quoted().map(FuncArg::Str),
    ));

    arg.or_not()
        .separated_by(token(Token::Comma))
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map(|args: Vec<Option<FuncArg>>| {
            if matches!(args.as_slice(), [None]) {
                Vec::new()
            } else {
                args
            }
        })
        .boxed()
}

pub(crate) fn call(operand: Boxed<Operand>) -> Boxed<FunctionCall> {
    name()
        .then(call_args(operand))
        .map(|(name, args)| FunctionCall::new(name, args))
        .boxed()
}
