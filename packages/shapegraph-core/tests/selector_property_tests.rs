//! Property-based tests for selector evaluation
//!
//! Invariants that hold for every generated selector:
//! - Fast path: index-served candidates give the same results as a full scan
//! - Ordering: results are sorted by id and free of duplicates
//! - Limits: a limited scan returns at most `limit` of the unlimited results

mod common;

use common::*;
use proptest::prelude::*;
use shapegraph_core::{Model, Selector, SelectorConfig};
use std::sync::OnceLock;

fn model() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(weather_model)
}

const HEADS: &[&str] = &[
    "*",
    "structure",
    "string",
    "list",
    "member",
    "operation",
    "simpleType",
    "number",
    "[trait|required]",
    "[trait|sensitive]",
    "[trait|error = client]",
    "[id = example.weather#City, example.weather#Tags]",
    "[id|name ^= Get]",
    ":not(member)",
    ":is(resource, service)",
];

const STEPS: &[&str] = &[
    "",
    " >",
    " <",
    " ~>",
    " -[input, output]->",
    " -[member]->",
    " <-[identifier]-",
    " -[read, list]->",
];

const TAILS: &[&str] = &[
    "",
    " structure",
    " string",
    " member",
    " [trait|required]",
    " :test(> member)",
    " :not([trait|readonly])",
];

fn selector_text() -> impl Strategy<Value = String> {
    (
        prop::sample::select(HEADS),
        prop::sample::select(STEPS),
        prop::sample::select(TAILS),
    )
        .prop_map(|(head, step, tail)| format!("{head}{step}{tail}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_fast_path_matches_full_scan(text in selector_text()) {
        let selector = Selector::parse(&text).unwrap();
        let fast = selector.select(model());
        let full = selector.select_with(model(), &SelectorConfig::full_scan());
        prop_assert_eq!(fast, full, "selector `{}`", text);
    }

    #[test]
    fn prop_results_sorted_and_unique(text in selector_text()) {
        let selector = Selector::parse(&text).unwrap();
        let results = selector.select(model());
        for pair in results.windows(2) {
            prop_assert!(pair[0].id() < pair[1].id(), "selector `{}`", text);
        }
    }

    #[test]
    fn prop_limit_returns_subset(text in selector_text(), limit in 1usize..8) {
        let selector = Selector::parse(&text).unwrap();
        let all = selector.select(model());
        let limited = selector.select_with(model(), &SelectorConfig::default().with_result_limit(limit));
        prop_assert!(limited.len() <= limit);
        prop_assert!(limited.iter().all(|shape| all.contains(shape)));
    }

    #[test]
    fn prop_union_is_superset(a in selector_text(), b in selector_text()) {
        let left = Selector::parse(&a).unwrap().select(model());
        let union = Selector::parse(&format!("{a}, {b}")).unwrap().select(model());
        prop_assert!(left.iter().all(|shape| union.contains(shape)));
    }
}
