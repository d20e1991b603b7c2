// mallet-core - Reader integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Reading source through a session: reader macros, comments and the parse
//! errors a prompt loop reports.

mod common;

use common::{Error, MalletVal, new_interpreter};
use mallet_parser::ParseErrorKind;

fn parse_error_kind(src: &str) -> Option<ParseErrorKind> {
    match new_interpreter().eval_str(src) {
        Err(err) => err.parse_kind(),
        Ok(_) => None,
    }
}

#[test]
fn test_unbalanced_list() {
    assert_eq!(parse_error_kind("(1 2"), Some(ParseErrorKind::Unbalanced));
    assert_eq!(parse_error_kind("[1 (2)"), Some(ParseErrorKind::Unbalanced));
    assert_eq!(parse_error_kind("\"abc"), Some(ParseErrorKind::Unbalanced));
    assert_eq!(parse_error_kind("'"), Some(ParseErrorKind::Unbalanced));
}

#[test]
fn test_odd_map_literal() {
    assert_eq!(parse_error_kind("{:a 1 :b}"), Some(ParseErrorKind::OddMap));
}

#[test]
fn test_stray_closer() {
    assert_eq!(
        parse_error_kind(")"),
        Some(ParseErrorKind::UnexpectedDelimiter)
    );
}

#[test]
fn test_parse_error_aborts_before_evaluation() {
    let mut interp = new_interpreter();
    // The whole source is read form by form; the first form still runs
    assert!(matches!(
        interp.eval_str("(def! a 1) (def! b"),
        Err(Error::Parse(_))
    ));
    assert_eq!(interp.eval_str("a").unwrap(), MalletVal::int(1));
    assert!(matches!(interp.eval_str("b"), Err(Error::SymbolNotFound(_))));
}

#[test]
fn test_reader_macros_expand() {
    let mut interp = new_interpreter();
    assert_eq!(interp.rep("'(1 2)").unwrap(), "(1 2)");
    assert_eq!(interp.rep("''a").unwrap(), "(quote a)");
    assert_eq!(interp.rep("'`a").unwrap(), "(quasiquote a)");
    assert_eq!(interp.rep("'~a").unwrap(), "(unquote a)");
    assert_eq!(interp.rep("'~@a").unwrap(), "(splice-unquote a)");
    assert_eq!(interp.rep("'@a").unwrap(), "(deref a)");
}

#[test]
fn test_commas_are_whitespace() {
    assert_eval!("(+ 1,2,,3)", MalletVal::int(6));
}

#[test]
fn test_comment_only_source() {
    assert_eval!(";; nothing here", MalletVal::Nil);
    assert_eval!("", MalletVal::Nil);
    assert_eval!("   \n  ", MalletVal::Nil);
}

#[test]
fn test_comment_after_form() {
    assert_eval!("(+ 1 2) ; three", MalletVal::int(3));
}

#[test]
fn test_string_escapes() {
    assert_eval!(r#""a\nb""#, MalletVal::string("a\nb"));
    assert_eval!(r#""q\"q""#, MalletVal::string("q\"q"));
    assert_eval!(r#""back\\slash""#, MalletVal::string("back\\slash"));
    assert_eval!(r#""\x""#, MalletVal::string("x"));
}

#[test]
fn test_readable_printing_round_trips() {
    let mut interp = new_interpreter();
    for src in [
        r#""a\nb\"c\\""#,
        "(1 [2 {:a \"x\"}] :k nil true)",
        "[]",
        "{:a 1, :b (2 3)}",
    ] {
        let printed = interp.rep(&format!("(quote {})", src)).unwrap();
        let again = interp
            .rep(&format!("(quote {})", printed))
            .unwrap();
        assert_eq!(printed, again);
    }
}

#[test]
fn test_numbers_and_symbols() {
    assert_eval!("-12", MalletVal::int(-12));
    assert_eval!("'+5", MalletVal::symbol("+5"));
    assert_eval!("'-", MalletVal::symbol("-"));
    assert_eval!("'-abc", MalletVal::symbol("-abc"));
    assert_eq!(
        parse_error_kind("99999999999999999999"),
        Some(ParseErrorKind::InvalidNumber)
    );
}

#[test]
fn test_read_string_rejects_deep_nesting() {
    let mut interp = new_interpreter();
    let deep = format!("{}{}", "(".repeat(100_000), ")".repeat(100_000));
    interp.define("deep", MalletVal::string(deep)).unwrap();

    let err = interp.eval_str("(read-string deep)").unwrap_err();
    assert_eq!(err.parse_kind(), Some(ParseErrorKind::TooDeep));
    assert_eq!(interp.eval_str("(+ 1 2)").unwrap(), MalletVal::int(3));
}
