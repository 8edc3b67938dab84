//! Tagged-tuple serialization, reconstruction and its error taxonomy

use rstest::rstest;
use serde_json::json;
use topas::topas::ast::{ReconstructError, Root};
use topas::topas::{parse, serialize, unparse, unserialize, ParseMode, Serializable, SerializeMode};

fn parsed(source: &str) -> Root {
    parse(source, ParseMode::Strict).unwrap().0
}

#[test]
fn test_verbose_prm_shape() {
    let data = serialize(&parsed("prm a 1"), SerializeMode::Verbose);
    assert_eq!(
        data,
        json!(["topas", ["prm", {
            "n": ["parameter_name", "a"],
            "v": ["parameter_value", "1"],
        }]])
    );
}

#[test]
fn test_verbose_formula_shape() {
    let data = serialize(&parsed("a + -b"), SerializeMode::Verbose);
    let a = json!(["p", {"n": ["parameter_name", "a"]}]);
    let b = json!(["p", {"n": ["parameter_name", "b"]}]);
    assert_eq!(data, json!(["topas", ["formula", ["+", a, ["-1", b]]]]));
}

#[test]
fn test_chain_shape() {
    let data = serialize(&parsed("A B"), SerializeMode::Verbose);
    assert_eq!(
        data,
        json!(["topas", ["formula", ["p", {
            "n": ["parameter_name", "A"],
            ">": ["p", {"n": ["parameter_name", "B"]}],
        }]]])
    );
}

#[test]
fn test_macro_shape() {
    let data = serialize(&parsed("macro m(x) { num_runs 2 }"), SerializeMode::Verbose);
    assert_eq!(
        data,
        json!(["topas", ["macro", "m",
            [["formula", ["p", {"n": ["parameter_name", "x"]}]]],
            [["num_runs", 2]],
        ]])
    );
}

#[test]
fn test_compact_collapses_values_and_formulas() {
    let data = serialize(&parsed("prm a = b + 1; min 0\nc * 2"), SerializeMode::Compact);
    assert_eq!(
        data,
        json!(["topas",
            ["prm", {"n": "a", "v": "= b + 1;", "_": "0"}],
            "c * 2",
        ])
    );
}

#[rstest]
#[case("prm ! b 0.5`_0.01 min 0 max 1")]
#[case("local @ c = Sin(a); : 0.1")]
#[case("existing_prm a *- 2; : 1")]
#[case("num_runs runs")]
#[case(r#"xdd "data.xy" range 13 gsas_format gui_reload"#)]
#[case("xdd { 1 2 3 }")]
#[case("axial_conv filament_length 1 sample_length 2 receiving_slit_length 3 primary_soller_angle 4 secondary_soller_angle 5")]
#[case("bkg @ 1 2 3")]
#[case("macro m(a, , \"s\") {\nprm x 1\n\nmacro n {}\n}")]
#[case("1 + ( 2 - 3 ) * 4 / 5 ^ ( 6 + 7 )")]
#[case("f(, ) >= - g")]
#[case("\"quoted\"\n\nA1 B2 C3")]
fn test_verbose_round_trip(#[case] source: &str) {
    let root = parsed(source);
    let data = serialize(&root, SerializeMode::Verbose);
    let rebuilt = unserialize(&data).unwrap();
    assert_eq!(rebuilt, root);
    assert_eq!(parsed(&unparse(&rebuilt)), root);
}

#[test]
fn test_text_round_trip() {
    let (root, _) = parse("prm a 1 #junk", ParseMode::Permissive).unwrap();
    let data = root.serialize();
    assert_eq!(data[2], json!(["text", "#junk"]));
    assert_eq!(Root::unserialize(&data).unwrap(), root);
}

#[test]
fn test_unknown_tag() {
    let err = unserialize(&json!(["topas", ["bogus_tag", 1]])).unwrap_err();
    assert!(matches!(err, ReconstructError::TagMismatch { .. }));
    assert_eq!(err.fragment(), &json!(["bogus_tag", 1]));
}

#[test]
fn test_wrong_root_tag() {
    let err = unserialize(&json!(["bogus_tag"])).unwrap_err();
    assert!(matches!(err, ReconstructError::TagMismatch { .. }));
}

#[test]
fn test_parameter_record_shape() {
    let err = unserialize(&json!(["topas", ["formula", ["p", "not-a-record"]]])).unwrap_err();
    assert!(matches!(err, ReconstructError::FieldType { .. }));
    assert_eq!(err.expected(), "type(data[1]) == dict");
}

#[test]
fn test_chain_record_rejects_labeled_fields() {
    let b = json!(["p", {"n": ["parameter_name", "b"]}]);
    let mixed = json!(["topas", ["formula", ["p", {
        "n": ["parameter_name", "a"],
        "v": ["parameter_value", "1"],
        ">": b,
    }]]]);
    let err = unserialize(&mixed).unwrap_err();
    assert!(matches!(err, ReconstructError::FieldType { .. }));
    assert_eq!(
        err.expected(),
        "data[1] with > holds exactly one of n, v and nothing else"
    );
}

#[test]
fn test_refine_flag_record_round_trips() {
    let data = json!(["topas", ["bkg", ["p", {"@": true}], ["p", {"@": true}]]]);
    let root = unserialize(&data).unwrap();
    assert_eq!(unparse(&root), "bkg @ @");
    assert_eq!(parsed(&unparse(&root)), root);
}

#[test]
fn test_operator_arity() {
    let a = json!(["p", {"n": ["parameter_name", "a"]}]);
    let err = unserialize(&json!(["topas", ["formula", ["+", a]]])).unwrap_err();
    assert!(matches!(err, ReconstructError::ArityMismatch { .. }));
}

#[test]
fn test_field_types_are_not_coerced() {
    let err = unserialize(&json!(["topas", ["num_runs", "10"]])).unwrap_err();
    assert!(matches!(err, ReconstructError::FieldType { .. }));

    let err = unserialize(&json!(["topas", ["macro", 1, [], []]])).unwrap_err();
    assert_eq!(err.expected(), "type(data[1]) == str");
}

#[test]
fn test_error_messages() {
    let err = unserialize(&json!(["topas", ["lb", 1]])).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r#"arity mismatch: expected len == 1, got ["lb",1]"#);
}
