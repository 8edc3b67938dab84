//! Parameter grammar
//!
//! Grammar:
//!   parameter = chain | labeled
//!   chain     = bare bare+            (not exactly `name value`)
//!   labeled   = "!"? "@"? name? prm_value? clause*   (not empty unless "@")
//!   prm_value = value | equation
//!   equation  = "=" formula ";" (":" reporting)?
//!   clause    = ("min" | "max" | "del" | "update" | "stop_when" | "val_on_continue") prm_value
//!
//! Chains are tried first because a labeled record would stop after its first
//! name and value and leave the rest of the run unparsed.

use chumsky::prelude::*;
use std::ops::Range;

use crate::topas::ast::{
    Clause, EquationBody, Formula, Operand, Parameter, ParameterEquation, ParameterName,
    ParameterValue, PrmValue, Reporting,
};
use crate::topas::lexer::Token;
use crate::topas::parser::combinators::{
    cover, is_reserved, name, token, value_literal, Boxed, Grammar, ParserError, TokenSpan,
};

/// `= formula;` with optional `: reporting`
pub(crate) fn equation(g: &Grammar, operand: Boxed<Operand>) -> Boxed<ParameterEquation> {
    let formula_body = operand
        .map(|value| EquationBody::Formula(Box::new(Formula::new(value))))
        .then_ignore(token(Token::Semicolon));

    let body = if g.recover {
        let grammar = g.clone();
        let text_body = g
            .fallback(
                filter(|(tok, _): &TokenSpan| {
                    !matches!(tok, Token::Semicolon | Token::Newline)
                })
                .map(|(_, range)| range)
                .repeated()
                .at_least(1)
                .map(move |ranges: Vec<Range<usize>>| {
                    let range = cover(&ranges);
                    (EquationBody::Text(grammar.text(&range)), range)
                }),
            )
            .then_ignore(token(Token::Semicolon));
        choice((formula_body, text_body)).boxed()
    } else {
        formula_body.boxed()
    };

    token(Token::Assign)
        .ignore_then(body)
        .then(token(Token::Colon).ignore_then(reporting(g)).or_not())
        .map(|(body, reporting)| ParameterEquation { body, reporting })
        .boxed()
}

pub(crate) fn reporting(g: &Grammar) -> Boxed<Reporting> {
    let value = value_literal().map(Reporting::Value);
    if g.recover {
        let grammar = g.clone();
        let text = g.fallback(
            g.word(false)
                .map(move |range| (Reporting::Text(grammar.text(&range)), range)),
        );
        choice((value, text)).boxed()
    } else {
        value.boxed()
    }
}

/// Value or equation
pub(crate) fn prm_value(g: &Grammar, operand: Boxed<Operand>) -> Boxed<PrmValue> {
    choice((
        value_literal().map(PrmValue::Value),
        equation(g, operand).map(PrmValue::Equation),
    ))
    .boxed()
}

fn clause_keyword() -> impl Parser<TokenSpan, Clause, Error = ParserError> + Clone {
    filter_map(|span, (tok, range): TokenSpan| {
        let clause = match &tok {
            Token::Name(word) => Clause::from_keyword(word),
            _ => None,
        };
        clause.ok_or_else(|| Simple::expected_input_found(span, Vec::new(), Some((tok, range))))
    })
}

/// `[!] [@] [name] [value] [clause value]...`
pub(crate) fn labeled(g: &Grammar, operand: Boxed<Operand>) -> Boxed<Parameter> {
    let value = prm_value(g, operand);
    let clause = clause_keyword().then(value.clone());

    token(Token::Bang)
        .or_not()
        .then(token(Token::At).or_not())
        .then(name().or_not())
        .then(value.or_not())
        .then(clause.repeated())
        .try_map(|((((fixed, refined), name), value), clauses), span| {
            let parameter = Parameter {
                fixed: fixed.is_some(),
                refined: refined.is_some(),
                name: name.map(ParameterName::new),
                value,
                clauses: clauses.into_iter().collect(),
                next: None,
            };
            // A lone `@` is a parameter; a lone `!` is not
            let empty = parameter.name.is_none()
                && parameter.value.is_none()
                && parameter.clauses.is_empty();
            if empty && !parameter.refined {
                Err(Simple::custom(span, "expected a parameter name, value or clause"))
            } else {
                Ok(parameter)
            }
        })
        .boxed()
}

/// Run of two or more bare names and values, linked right to left
pub(crate) fn chain() -> Boxed<Parameter> {
    let bare = filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Name(word) if !is_reserved(&word) => Ok(Parameter::named(word)),
        Token::Value(literal) => ParameterValue::from_literal(&literal)
            .map(Parameter::valued)
            .map_err(|e| Simple::custom(span, e.to_string())),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    });

    bare.repeated()
        .at_least(2)
        .try_map(|links: Vec<Parameter>, span| {
            let name_then_value =
                links.len() == 2 && links[0].name.is_some() && links[1].value.is_some();
            if name_then_value {
                return Err(Simple::custom(span, "name and value form a labeled parameter"));
            }
            Parameter::chain(links).ok_or_else(|| Simple::custom(span, "empty chain"))
        })
        .boxed()
}

pub(crate) fn parameter(g: &Grammar, operand: Boxed<Operand>) -> Boxed<Parameter> {
    choice((chain(), labeled(g, operand))).boxed()
}
