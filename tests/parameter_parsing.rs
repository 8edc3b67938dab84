//! Parameter record parsing: labeled records, chains, equations and clauses

use rstest::rstest;
use topas::topas::ast::{
    Clause, EquationBody, FuncArg, FunctionCall, Operand, Parameter, ParameterEquation,
    ParameterValue, Prm, PrmValue, Reporting, Statement,
};
use topas::topas::formats::Unparse;
use topas::topas::{parse, ParseMode, Parse};

fn literal(text: &str) -> ParameterValue {
    ParameterValue::from_literal(text).unwrap()
}

#[test]
fn test_value_literal_parts() {
    let value = ParameterValue::parse("-12.3`_2_LIMIT_MIN_-13_LIMIT_MAX_2.1").unwrap();
    assert_eq!(value.value.as_str(), "-12.3");
    assert!(value.backtick);
    assert_eq!(value.esd.as_ref().map(|d| d.as_str()), Some("2"));
    assert_eq!(value.limit_min.as_ref().map(|d| d.as_str()), Some("-13"));
    assert_eq!(value.limit_max.as_ref().map(|d| d.as_str()), Some("2.1"));
    assert_eq!(value.to_string(), "-12.3`_2_LIMIT_MIN_-13_LIMIT_MAX_2.1");
}

#[test]
fn test_value_keeps_exact_digits() {
    let value = ParameterValue::parse("0.10000000000000000000001").unwrap();
    assert_eq!(value.to_string(), "0.10000000000000000000001");
}

#[test]
fn test_labeled_record() {
    let parameter = Parameter::parse("! @ a 1 min 0 max 2").unwrap();
    assert!(parameter.fixed);
    assert!(parameter.refined);
    assert_eq!(parameter.name.as_ref().map(|n| n.name.as_str()), Some("a"));
    assert_eq!(parameter.value, Some(PrmValue::Value(literal("1"))));
    assert_eq!(parameter.clauses.len(), 2);
    assert_eq!(parameter.next, None);
}

#[test]
fn test_clauses_render_in_canonical_order() {
    let parameter = Parameter::parse("a 1 val_on_continue 3 min 0").unwrap();
    assert_eq!(parameter.unparse(), "a 1 min 0 val_on_continue 3");
}

#[test]
fn test_repeated_clause_keeps_last_value() {
    let parameter = Parameter::parse("a 1 min 0 min 5").unwrap();
    assert_eq!(
        parameter.clauses.get(&Clause::Min),
        Some(&PrmValue::Value(literal("5")))
    );
}

#[test]
fn test_chain_of_names() {
    let parameter = Parameter::parse("A1 B2 C3 D4").unwrap();
    assert!(parameter.is_chain());
    let names: Vec<_> = parameter
        .links()
        .map(|link| link.name.as_ref().map(|n| n.name.clone()))
        .collect();
    assert_eq!(
        names,
        vec![
            Some("A1".to_string()),
            Some("B2".to_string()),
            Some("C3".to_string()),
            Some("D4".to_string())
        ]
    );
    assert!(parameter.links().all(|link| link.value.is_none() && !link.fixed));
}

#[test]
fn test_name_then_value_is_labeled() {
    let parameter = Parameter::parse("a 1").unwrap();
    assert!(!parameter.is_chain());
    assert_eq!(parameter.value, Some(PrmValue::Value(literal("1"))));
}

#[test]
fn test_value_then_name_is_a_chain() {
    let parameter = Parameter::parse("1 a").unwrap();
    assert!(parameter.is_chain());
    assert_eq!(parameter.links().count(), 2);
}

#[test]
fn test_equation_with_reporting() {
    let equation = ParameterEquation::parse("= a * 2; : 0.5").unwrap();
    assert!(matches!(equation.body, EquationBody::Formula(_)));
    assert_eq!(equation.reporting, Some(Reporting::Value(literal("0.5"))));
    assert_eq!(equation.unparse(), "= a * 2; : 0.5");
}

#[test]
fn test_refine_flag_alone_is_a_parameter() {
    assert_eq!(Parameter::parse("@").unwrap(), Parameter::default().refined());
    assert!(Parameter::parse("!").is_err());
}

#[test]
fn test_refine_flag_alone_as_call_argument() {
    let call = FunctionCall::parse("f(@)").unwrap();
    assert_eq!(call.args.len(), 1);
    match &call.args[0] {
        Some(FuncArg::Formula(formula)) => {
            assert_eq!(formula.value, Operand::Parameter(Parameter::default().refined()));
        }
        other => panic!("expected a formula argument, got {:?}", other),
    }

    let (root, diagnostics) = parse("f(@)", ParseMode::Permissive).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(root.statements.len(), 1);
    assert_eq!(root.unparse(), "f(@)");
}

#[test]
fn test_bkg_of_refine_flags() {
    let (root, diagnostics) = parse("bkg @ @ @", ParseMode::Permissive).unwrap();
    assert!(diagnostics.is_empty());
    match &root.statements[..] {
        [Statement::Bkg(bkg)] => {
            assert_eq!(bkg.params, vec![Parameter::default().refined(); 3]);
        }
        other => panic!("expected one bkg statement, got {:?}", other),
    }
    assert_eq!(root.unparse(), "bkg @ @ @");
}

#[test]
fn test_prm_rejects_refine_flag() {
    assert!(Prm::parse("prm @ a 1").is_err());
    assert!(Prm::parse("prm a").is_err());
    let prm = Prm::parse("prm ! a 1").unwrap();
    assert!(prm.fixed);
}

#[test]
fn test_prm_without_name() {
    let prm = Prm::parse("prm = 2 * b;").unwrap();
    assert_eq!(prm.name, None);
    assert_eq!(prm.unparse(), "prm = 2 * b;");
}

#[test]
fn test_equation_text_fallback_in_permissive_mode() {
    let (root, diagnostics) = parse("prm a = #!!;", ParseMode::Permissive).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(root.unparse(), "prm a = #!!;");

    assert!(parse("prm a = #!!;", ParseMode::Strict).is_err());
}

#[rstest]
#[case("a")]
#[case("a 1")]
#[case("! a 1")]
#[case("@ a 1`")]
#[case("@")]
#[case("@ min 1")]
#[case("a = b + 1; min 0 max 2")]
#[case("a = b; : 3 update 1")]
#[case("A1 B2 3 4")]
#[case("1 2")]
fn test_parameter_round_trip(#[case] source: &str) {
    let parameter = Parameter::parse(source).unwrap();
    assert_eq!(parameter.unparse(), source);
    assert_eq!(Parameter::parse(&parameter.unparse()).unwrap(), parameter);
}
