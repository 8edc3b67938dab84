//! Statement grammar
//!
//! Grammar:
//!   statements = statement*
//!   statement  = NEWLINE                              -> line break
//!              | (keyword_statement | formula | quoted) NEWLINE?
//!              | word NEWLINE?                        -> text, permissive only
//!   macro      = "macro" name args? "{" NEWLINE? statements "}"
//!
//! A statement swallows at most one newline after it; any further newline is
//! a line break statement of its own. Inside a macro body a fallback word
//! never swallows the closing brace.

use chumsky::prelude::*;

use crate::topas::ast::{
    AxialConv, AxialField, Bkg, Decimal, ExistingOp, ExistingPrm, Formula, Local, Macro,
    NodeKind, NumRuns, NumRunsValue, ParameterName, Prm, Root, Statement, Xdd, XddFlag,
    XddSource,
};
use crate::topas::lexer::Token;
use crate::topas::parser::combinators::{
    any_name, decimal, keyword, name, quoted, token, Boxed, Grammar, ParserError, TokenSpan,
};
use crate::topas::parser::elements::formula::{call_args, operand};
use crate::topas::parser::elements::parameter::{labeled, parameter, reporting};

/// `prm [!] [name] value [clauses]`
pub(crate) fn prm(g: &Grammar) -> Boxed<Prm> {
    keyword(NodeKind::Prm.tag())
        .ignore_then(labeled(g, operand(g)))
        .try_map(|parameter, span| {
            Prm::from_parameter(parameter).ok_or_else(|| {
                Simple::custom(span, "prm needs a value and takes neither @ nor a chain")
            })
        })
        .boxed()
}

/// `local [!|@] name value [clauses]`
pub(crate) fn local(g: &Grammar) -> Boxed<Local> {
    keyword(NodeKind::Local.tag())
        .ignore_then(labeled(g, operand(g)))
        .try_map(|parameter, span| {
            if parameter.name.is_some() && parameter.value.is_some() {
                Ok(Local { parameter })
            } else {
                Err(Simple::custom(span, "local needs a name and a value"))
            }
        })
        .boxed()
}

fn existing_op() -> impl Parser<TokenSpan, ExistingOp, Error = ParserError> + Clone {
    choice((
        token(Token::Assign).to(ExistingOp::Assign),
        token(Token::PlusAssign).to(ExistingOp::AddAssign),
        token(Token::MinusAssign).to(ExistingOp::SubAssign),
        token(Token::StarAssign).to(ExistingOp::MulAssign),
        token(Token::Star)
            .then(token(Token::Minus))
            .to(ExistingOp::MulNeg),
        token(Token::SlashAssign).to(ExistingOp::DivAssign),
        token(Token::CaretAssign).to(ExistingOp::ExpAssign),
    ))
}

/// `existing_prm name op formula; [: reporting]`
pub(crate) fn existing_prm(g: &Grammar) -> Boxed<ExistingPrm> {
    keyword(NodeKind::ExistingPrm.tag())
        .ignore_then(name())
        .then(existing_op())
        .then(operand(g))
        .then_ignore(token(Token::Semicolon))
        .then(token(Token::Colon).ignore_then(reporting(g)).or_not())
        .map(|(((name, op), value), reporting)| ExistingPrm {
            name: ParameterName::new(name),
            op,
            formula: Formula::new(value),
            reporting,
        })
        .boxed()
}

/// `num_runs count` or `num_runs name`
pub(crate) fn num_runs(_g: &Grammar) -> Boxed<NumRuns> {
    let count = filter_map(|span, (tok, range): TokenSpan| match tok {
        Token::Value(literal) => literal
            .parse::<u64>()
            .map(NumRunsValue::Count)
            .map_err(|_| Simple::custom(span, format!("not a run count: {}", literal))),
        other => Err(Simple::expected_input_found(
            span,
            Vec::new(),
            Some((other, range)),
        )),
    });

    keyword(NodeKind::NumRuns.tag())
        .ignore_then(choice((
            count,
            name().map(|name| NumRunsValue::Name(ParameterName::new(name))),
        )))
        .map(|value| NumRuns { value })
        .boxed()
}

#[derive(Debug, Clone)]
enum XddOption {
    Range(Decimal),
    Flag(XddFlag),
}

/// Unescape `\ ` and `\<tab>` in a bare file name
fn unescape_filename(raw: &str) -> String {
    raw.replace("\\ ", " ").replace("\\\t", "\t")
}

/// `xdd source [range n] [flags]`
pub(crate) fn xdd(g: &Grammar) -> Boxed<Xdd> {
    let newlines = token(Token::Newline).repeated();

    let inline = token(Token::OpenBrace)
        .ignore_then(newlines.clone())
        .ignore_then(token(Token::InlineXy).or_not())
        .then_ignore(newlines.clone())
        .then(decimal().then_ignore(newlines).repeated())
        .then_ignore(token(Token::CloseBrace))
        .map(|(xy, data)| XddSource::Inline {
            xy: xy.is_some(),
            data,
        });

    let grammar = g.clone();
    let bare = g.word(false).try_map(move |range, span| {
        let raw = grammar.slice(&range);
        if raw.starts_with('{') {
            Err(Simple::custom(span, "unterminated inline data"))
        } else {
            Ok(XddSource::File(unescape_filename(raw)))
        }
    });

    let source = choice((quoted().map(XddSource::File), inline, bare));

    let flag = filter_map(|span, (tok, range): TokenSpan| {
        let flag = match &tok {
            Token::Name(word) => XddFlag::from_keyword(word),
            _ => None,
        };
        flag.ok_or_else(|| Simple::expected_input_found(span, Vec::new(), Some((tok, range))))
    });

    let option = choice((
        keyword("range").ignore_then(decimal()).map(XddOption::Range),
        flag.map(XddOption::Flag),
    ));

    keyword(NodeKind::Xdd.tag())
        .ignore_then(source)
        .then(option.repeated())
        .map(|(source, options)| {
            let mut xdd = Xdd {
                source,
                range: None,
                flags: Default::default(),
            };
            for option in options {
                match option {
                    XddOption::Range(range) => xdd.range = Some(range),
                    XddOption::Flag(flag) => {
                        xdd.flags.insert(flag);
                    }
                }
            }
            xdd
        })
        .boxed()
}

/// `axial_conv` with its keyword clauses in any order
pub(crate) fn axial_conv(g: &Grammar) -> Boxed<AxialConv> {
    let field = filter_map(|span, (tok, range): TokenSpan| {
        let field = match &tok {
            Token::Name(word) => AxialField::from_keyword(word),
            _ => None,
        };
        field.ok_or_else(|| Simple::expected_input_found(span, Vec::new(), Some((tok, range))))
    });

    keyword(NodeKind::AxialConv.tag())
        .ignore_then(field.then(parameter(g, operand(g))).repeated().at_least(1))
        .try_map(|fields, span| {
            AxialConv::from_fields(fields).ok_or_else(|| {
                Simple::custom(
                    span,
                    "axial_conv needs filament_length, sample_length and receiving_slit_length",
                )
            })
        })
        .boxed()
}

/// `bkg parameter+`
pub(crate) fn bkg(g: &Grammar) -> Boxed<Bkg> {
    keyword(NodeKind::Bkg.tag())
        .ignore_then(parameter(g, operand(g)).repeated().at_least(1))
        .map(|params| Bkg { params })
        .boxed()
}

/// `macro name[(args)] { statements }`, body supplied by the caller
fn macro_with_body(g: &Grammar, body: Boxed<Vec<Statement>>) -> Boxed<Macro> {
    let block = token(Token::OpenBrace)
        .ignore_then(token(Token::Newline).or_not())
        .ignore_then(body)
        .then_ignore(token(Token::CloseBrace));

    keyword(NodeKind::Macro.tag())
        .ignore_then(any_name())
        .then(call_args(operand(g)).or_not())
        .then(block)
        .map(|((name, args), statements)| Macro::new(name, args.unwrap_or_default(), statements))
        .boxed()
}

/// Statements of a macro body, nested macros included
fn block_statements(g: &Grammar) -> Boxed<Vec<Statement>> {
    let grammar = g.clone();
    recursive(move |body| {
        let body: Boxed<Vec<Statement>> = body.boxed();
        statement_list(&grammar, true, macro_with_body(&grammar, body))
    })
    .boxed()
}

pub(crate) fn macro_def(g: &Grammar) -> Boxed<Macro> {
    macro_with_body(g, block_statements(g))
}

fn statement_list(g: &Grammar, in_block: bool, macro_stmt: Boxed<Macro>) -> Boxed<Vec<Statement>> {
    let structured = choice((
        prm(g).map(Statement::Prm),
        local(g).map(Statement::Local),
        existing_prm(g).map(Statement::ExistingPrm),
        num_runs(g).map(Statement::NumRuns),
        xdd(g).map(Statement::Xdd),
        axial_conv(g).map(Statement::AxialConv),
        bkg(g).map(Statement::Bkg),
        macro_stmt.map(Statement::Macro),
        operand(g).map(|value| Statement::Formula(Formula::new(value))),
        quoted().map(Statement::Str),
    ))
    .then_ignore(token(Token::Newline).or_not());

    let line_break = token(Token::Newline).to(Statement::LineBreak);

    let statement = if g.recover {
        let grammar = g.clone();
        // The newline after a capture stays a line break so text never joins across lines
        let text = g.fallback(
            g.word(in_block)
                .map(move |range| (Statement::Text(grammar.text(&range)), range)),
        );
        choice((line_break, structured, text)).boxed()
    } else {
        choice((line_break, structured)).boxed()
    };

    statement.repeated().boxed()
}

/// Top-level statements up to end of input
pub(crate) fn document(g: &Grammar) -> Boxed<Root> {
    statement_list(g, false, macro_def(g))
        .then_ignore(end())
        .map(Root::new)
        .boxed()
}
