//! Formula parsing and canonical rendering
//!
//! Precedence, n-ary folding and the parenthesization the unparser derives
//! from the operator table.

use rstest::rstest;
use topas::topas::ast::{
    Formula, FormulaOp, FuncArg, FunctionCall, Operand, Operator, Parameter, PrmValue,
};
use topas::topas::formats::Unparse;
use topas::topas::Parse;

fn op(operand: &Operand) -> &FormulaOp {
    match operand {
        Operand::Op(op) => op,
        other => panic!("expected an operator, got {:?}", other),
    }
}

fn name_of(operand: &Operand) -> String {
    match operand {
        Operand::Parameter(Parameter { name: Some(name), .. }) => name.name.clone(),
        Operand::Parameter(Parameter {
            value: Some(PrmValue::Value(value)),
            ..
        }) => value.to_string(),
        other => panic!("expected a parameter, got {:?}", other),
    }
}

#[test]
fn test_precedence_example() {
    let formula = Formula::parse("1+(2-3)*4/5^(6+7)").unwrap();
    insta::assert_snapshot!(formula.unparse(), @"1 + ( 2 - 3 ) * 4 / 5 ^ ( 6 + 7 )");
}

#[test]
fn test_same_operator_run_is_one_node() {
    let formula = Formula::parse("1+2+3+4").unwrap();
    let sum = op(&formula.value);
    assert_eq!(sum.operator, Operator::Add);
    assert_eq!(sum.operands.len(), 4);
}

#[test]
fn test_different_operators_nest() {
    let formula = Formula::parse("a + b - c").unwrap();
    let sub = op(&formula.value);
    assert_eq!(sub.operator, Operator::Sub);
    assert_eq!(op(&sub.operands[0]).operator, Operator::Add);
    assert_eq!(name_of(&sub.operands[1]), "c");
}

#[test]
fn test_comparison_levels() {
    let formula = Formula::parse("X < 6 > 7 <= 9 >= b(c) == 1").unwrap();
    let ge = op(&formula.value);
    assert_eq!(ge.operator, Operator::Ge);

    let gt = op(&ge.operands[0]);
    assert_eq!(gt.operator, Operator::Gt);
    assert_eq!(op(&gt.operands[0]).operator, Operator::Lt);
    assert_eq!(op(&gt.operands[1]).operator, Operator::Le);

    let eq = op(&ge.operands[1]);
    assert_eq!(eq.operator, Operator::Eq);
    assert!(matches!(eq.operands[0], Operand::Call(_)));

    insta::assert_snapshot!(formula.unparse(), @"X < 6 > 7 <= 9 >= b(c) == 1");
}

#[test]
fn test_unary_signs() {
    let formula = Formula::parse("-(a + b)").unwrap();
    let neg = op(&formula.value);
    assert_eq!(neg.operator, Operator::UnaryMinus);
    assert_eq!(neg.operands.len(), 1);
    assert_eq!(formula.unparse(), "- ( a + b )");

    let formula = Formula::parse("2 ^ - a").unwrap();
    let exp = op(&formula.value);
    assert_eq!(op(&exp.operands[1]).operator, Operator::UnaryMinus);
}

#[test]
fn test_negative_literal_is_a_value() {
    let formula = Formula::parse("a * -2").unwrap();
    let mul = op(&formula.value);
    assert_eq!(name_of(&mul.operands[1]), "-2");
}

#[test]
fn test_call_absent_arguments() {
    let call = FunctionCall::parse("FUN(,)").unwrap();
    assert_eq!(call.args, vec![None, None]);
    assert_eq!(call.unparse(), "FUN(, )");

    let call = FunctionCall::parse("FUN()").unwrap();
    assert!(call.args.is_empty());

    let call = FunctionCall::parse("FUN(a,)").unwrap();
    assert!(matches!(call.args[0], Some(FuncArg::Formula(_))));
    assert_eq!(call.args[1], None);
}

#[test]
fn test_call_string_argument() {
    let call = FunctionCall::parse(r#"Get("x y", 2)"#).unwrap();
    assert_eq!(call.args[0], Some(FuncArg::Str("x y".to_string())));
    assert_eq!(call.unparse(), r#"Get("x y", 2)"#);
}

#[test]
fn test_nested_calls() {
    let formula = Formula::parse("Sin(Cos(a) * 2)").unwrap();
    assert_eq!(formula.unparse(), "Sin(Cos(a) * 2)");
}

#[rstest]
#[case("(a + b) + c", "( a + b ) + c")]
#[case("a + (b + c)", "a + ( b + c )")]
#[case("(a * b) + c", "a * b + c")]
#[case("(a + b) - c", "a + b - c")]
#[case("(a - b) - c", "( a - b ) - c")]
#[case("a - (b - c)", "a - ( b - c )")]
#[case("(a == b) < c", "a == b < c")]
#[case("a < (b == c)", "a < b == c")]
#[case("(a < b) == c", "( a < b ) == c")]
#[case("((a))", "a")]
#[case("-(-(5))", "- - 5")]
fn test_parenthesization(#[case] source: &str, #[case] expected: &str) {
    let formula = Formula::parse(source).unwrap();
    let rendered = formula.unparse();
    assert_eq!(rendered, expected);
    assert_eq!(Formula::parse(&rendered).unwrap(), formula);
}
