//! Custom assertions for selector results

use pretty_assertions::assert_eq;
use shapegraph_core::{Model, Selector};

use super::fixtures::NAMESPACE;

/// Ids selected by `text`, restricted to the fixture namespace
pub fn select_ids(model: &Model, text: &str) -> Vec<String> {
    Selector::parse(text)
        .unwrap_or_else(|e| panic!("`{text}` failed to compile: {e}"))
        .select(model)
        .iter()
        .filter(|shape| shape.id().namespace() == NAMESPACE)
        .map(|shape| shape.id().to_string())
        .collect()
}

/// Assert `text` selects exactly `expected` (relative names) in the fixture
/// namespace
pub fn assert_selects(model: &Model, text: &str, expected: &[&str]) {
    let expected: Vec<String> = expected
        .iter()
        .map(|name| format!("{NAMESPACE}#{name}"))
        .collect();
    assert_eq!(select_ids(model, text), expected, "selector `{text}`");
}
