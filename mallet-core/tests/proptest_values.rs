// mallet-core - Property-based tests for values and sequences
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for the value model and sequence primitives.
//!
//! Tests the following properties:
//! - Readable printing round-trips through the reader
//! - Lists and vectors with the same elements are equal
//! - cons/count and concat/count invariants
//! - Addition agrees with checked i64 arithmetic

mod common;

use common::{MalletVal, eval_str, new_interpreter};
use mallet_parser::read_str;
use proptest::prelude::*;

// =============================================================================
// Strategies for generating values
// =============================================================================

fn arb_small_int() -> impl Strategy<Value = i64> {
    -1000i64..1000i64
}

/// Strings including characters the printer must escape
fn arb_string() -> impl Strategy<Value = String> {
    "[a-z \"\\\\\n]{0,8}"
}

fn arb_keyword() -> impl Strategy<Value = MalletVal> {
    "[a-z][a-z0-9-]{0,6}".prop_map(|s| MalletVal::keyword(&s))
}

/// Readable values: integers, strings, keywords and nested collections
fn arb_value() -> impl Strategy<Value = MalletVal> {
    let leaf = prop_oneof![
        any::<i64>().prop_map(MalletVal::int),
        arb_string().prop_map(|s| MalletVal::string(s)),
        arb_keyword(),
        Just(MalletVal::Nil),
        any::<bool>().prop_map(MalletVal::bool),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(MalletVal::list),
            prop::collection::vec(inner.clone(), 0..4).prop_map(MalletVal::vector),
            prop::collection::vec((arb_keyword(), inner), 0..3).prop_map(|pairs| {
                let flat = pairs.into_iter().flat_map(|(k, v)| [k, v]).collect();
                MalletVal::map(flat).unwrap()
            }),
        ]
    })
}

fn arb_int_seq(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(arb_small_int(), 0..=max_len)
}

fn joined(items: &[i64]) -> String {
    items
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Printer/reader round trip
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// read(print(v)) = v
    #[test]
    fn readable_print_round_trips(v in arb_value()) {
        let printed = v.printed(true).to_string();
        let read_back = read_str(&printed).unwrap();
        prop_assert_eq!(read_back, v, "round trip failed for {}", printed);
    }

    /// Quoting a printed value and evaluating it yields the value
    #[test]
    fn quoted_print_evaluates_to_value(v in arb_value()) {
        let code = format!("(quote {})", v.printed(true));
        prop_assert_eq!(eval_str(&code).unwrap(), v);
    }
}

// =============================================================================
// Sequence invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// (= (list ...) [...]) for the same elements
    #[test]
    fn list_and_vector_equal(items in arb_int_seq(6)) {
        let code = format!("(= (list {0}) [{0}])", joined(&items));
        prop_assert_eq!(eval_str(&code).unwrap(), MalletVal::bool(true));
    }

    /// (count (cons x coll)) = (count coll) + 1
    #[test]
    fn cons_increments_count(x in arb_small_int(), items in arb_int_seq(6)) {
        let code = format!("(count (cons {} [{}]))", x, joined(&items));
        prop_assert_eq!(
            eval_str(&code).unwrap(),
            MalletVal::int(items.len() as i64 + 1)
        );
    }

    /// (count (concat a b)) = (count a) + (count b)
    #[test]
    fn concat_adds_counts(a in arb_int_seq(5), b in arb_int_seq(5)) {
        let code = format!("(count (concat (list {}) [{}]))", joined(&a), joined(&b));
        prop_assert_eq!(
            eval_str(&code).unwrap(),
            MalletVal::int((a.len() + b.len()) as i64)
        );
    }

    /// Splicing a sequence into a template preserves its elements
    #[test]
    fn splice_preserves_elements(items in arb_int_seq(6)) {
        let mut interp = new_interpreter();
        let code = format!("(def! xs (list {})) (= `(~@xs) xs)", joined(&items));
        prop_assert_eq!(interp.eval_str(&code).unwrap(), MalletVal::bool(true));
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// (+ a b) agrees with checked addition, overflowing as an error
    #[test]
    fn addition_matches_checked_add(a in any::<i64>(), b in any::<i64>()) {
        let result = eval_str(&format!("(+ {} {})", a, b));
        match a.checked_add(b) {
            Some(sum) => prop_assert_eq!(result.unwrap(), MalletVal::int(sum)),
            None => prop_assert!(result.is_err()),
        }
    }

    /// (- (+ a b) b) = a for small integers
    #[test]
    fn subtraction_undoes_addition(a in arb_small_int(), b in arb_small_int()) {
        let code = format!("(- (+ {} {}) {})", a, b, b);
        prop_assert_eq!(eval_str(&code).unwrap(), MalletVal::int(a));
    }
}
