//! Permissive recovery and strict failures

use topas::topas::ast::{DiagnosticSeverity, ParseError, Statement, Text, TEXT_FALLBACK};
use topas::topas::options::Options;
use topas::topas::{parse, parse_with_options, unparse, ParseMode};

#[test]
fn test_unparseable_line_coalesces() {
    let (root, diagnostics) = parse("#@@! #$% ^&*()", ParseMode::Permissive).unwrap();
    assert_eq!(
        root.statements,
        vec![Statement::Text(Text::new("#@@! #$% ^&*()"))]
    );
    assert_eq!(diagnostics.len(), 3);
    let starts: Vec<usize> = diagnostics.iter().map(|d| d.range.start).collect();
    assert_eq!(starts, vec![0, 5, 9]);
}

#[test]
fn test_structure_around_junk_survives() {
    let source = "prm a 1 #junk\nprm b 2";
    let (root, diagnostics) = parse(source, ParseMode::Permissive).unwrap();
    assert_eq!(root.statements.len(), 4);
    assert!(matches!(root.statements[0], Statement::Prm(_)));
    assert_eq!(root.statements[1], Statement::Text(Text::new("#junk")));
    assert_eq!(root.statements[2], Statement::LineBreak);
    assert!(matches!(root.statements[3], Statement::Prm(_)));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(unparse(&root), "prm a 1\n#junk\nprm b 2");
}

#[test]
fn test_text_on_separate_lines_stays_separate() {
    let source = "a\n#x\n#y\nb";
    let (root, diagnostics) = parse(source, ParseMode::Permissive).unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(root.statements[1], Statement::Text(Text::new("#x")));
    assert_eq!(root.statements[2], Statement::LineBreak);
    assert_eq!(root.statements[3], Statement::Text(Text::new("#y")));
    assert_eq!(unparse(&root), source);
    assert_eq!(parse(&unparse(&root), ParseMode::Permissive).unwrap().0, root);
}

#[test]
fn test_text_before_blank_line() {
    let source = "#x\n\nb";
    let (root, _) = parse(source, ParseMode::Permissive).unwrap();
    assert_eq!(unparse(&root), source);
}

#[test]
fn test_diagnostic_fields() {
    let (_, diagnostics) = parse("a\n  #junk rest", ParseMode::Permissive).unwrap();
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
    assert_eq!(diagnostic.code.as_deref(), Some(TEXT_FALLBACK));
    assert_eq!(diagnostic.span.start.line, 1);
    assert_eq!(diagnostic.span.start.column, 2);
    assert_eq!(diagnostic.message, "Can't parse text \"#junk rest\"");
}

#[test]
fn test_excerpt_length_follows_options() {
    let options = Options {
        excerpt_len: 3,
        ..Options::default()
    };
    let (_, diagnostics) = parse_with_options("#junk", &options).unwrap();
    assert_eq!(diagnostics[0].message, "Can't parse text \"#ju\"");
}

#[test]
fn test_recovery_inside_macro_body() {
    let (root, diagnostics) = parse("macro m { #bad }", ParseMode::Permissive).unwrap();
    assert_eq!(diagnostics.len(), 1);
    match &root.statements[0] {
        Statement::Macro(macro_def) => {
            assert_eq!(macro_def.statements, vec![Statement::Text(Text::new("#bad"))]);
        }
        other => panic!("expected a macro, got {:?}", other),
    }
}

#[test]
fn test_glued_close_brace_still_closes_macro() {
    let (root, _) = parse("macro m { #bad}", ParseMode::Permissive).unwrap();
    assert_eq!(root.statements.len(), 1);
    assert!(matches!(root.statements[0], Statement::Macro(_)));
}

#[test]
fn test_clean_input_has_no_diagnostics() {
    let (_, diagnostics) = parse("prm a 1\nbkg 1 2 3", ParseMode::Permissive).unwrap();
    assert!(diagnostics.is_empty());
}

#[test]
fn test_block_comment_across_lines_is_not_text() {
    let (root, diagnostics) = parse("a /* x\ny */ b", ParseMode::Permissive).unwrap();
    assert!(diagnostics.is_empty());
    assert!(root.statements.iter().all(|s| matches!(s, Statement::Formula(_))));

    let (root, diagnostics) = parse("/* multi\nline */\nprm a 1", ParseMode::Permissive).unwrap();
    assert!(diagnostics.is_empty());
    assert!(matches!(root.statements.last(), Some(Statement::Prm(_))));
    assert!(!root.statements.iter().any(|s| matches!(s, Statement::Text(_))));
}

#[test]
fn test_strict_mode_is_fatal() {
    let err = parse("prm a 1\n  #junk", ParseMode::Strict).unwrap_err();
    match err {
        ParseError::Fatal { position, .. } => {
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 2);
        }
        other => panic!("expected a fatal error, got {:?}", other),
    }
}

#[test]
fn test_empty_input() {
    let (root, diagnostics) = parse("", ParseMode::Strict).unwrap();
    assert!(root.statements.is_empty());
    assert!(diagnostics.is_empty());
}
