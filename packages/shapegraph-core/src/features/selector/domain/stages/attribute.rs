// Stage: attribute filter (`[id|name = Foo]`, `[trait|deprecated|since]`, ...)
//
// An attribute resolves to a list of values. `[key]` passes when the list is
// non-empty; `[key op v1, v2]` passes when any value satisfies the comparator
// against any expected value (`!=`: against none of them). Structured trait
// values (objects, arrays) only exist; they never compare equal to text.

use serde_json::Value;
use std::ops::ControlFlow;
use std::sync::Arc;

use crate::features::model::Model;
use crate::features::selector::domain::context::Context;
use crate::features::selector::domain::stage::{Push, Receiver};
use crate::shared::models::{Shape, ShapeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKey {
    /// `id`: absolute shape id
    Id,
    /// `id|namespace`
    IdNamespace,
    /// `id|name`
    IdName,
    /// `id|member`: absent for non-members
    IdMember,
    /// `service`: present on service shapes
    Service,
    /// `service|version`
    ServiceVersion,
    /// `trait|<id>` followed by path segments into the trait value
    Trait { id: ShapeId, path: Vec<PathSegment> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object key (or array index)
    Key(String),
    /// `(keys)`: object keys
    Keys,
    /// `(values)`: object values or array elements
    Values,
    /// `(length)`: element count of arrays and objects, char count of strings
    Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
    /// `?=`: compares "does the attribute exist" with `true` / `false`
    Exists,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl Comparator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "=" => Comparator::Equal,
            "!=" => Comparator::NotEqual,
            "^=" => Comparator::StartsWith,
            "$=" => Comparator::EndsWith,
            "*=" => Comparator::Contains,
            "?=" => Comparator::Exists,
            ">" => Comparator::Greater,
            ">=" => Comparator::GreaterEqual,
            "<" => Comparator::Less,
            "<=" => Comparator::LessEqual,
            _ => return None,
        })
    }

    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Comparator::Greater | Comparator::GreaterEqual | Comparator::Less | Comparator::LessEqual
        )
    }

    fn compare(&self, actual: &str, expected: &str, case_insensitive: bool) -> bool {
        if self.is_numeric() {
            let (Ok(actual), Ok(expected)) = (actual.parse::<f64>(), expected.parse::<f64>())
            else {
                return false;
            };
            return match self {
                Comparator::Greater => actual > expected,
                Comparator::GreaterEqual => actual >= expected,
                Comparator::Less => actual < expected,
                _ => actual <= expected,
            };
        }

        let (actual, expected) = if case_insensitive {
            (actual.to_lowercase(), expected.to_lowercase())
        } else {
            (actual.to_string(), expected.to_string())
        };
        match self {
            Comparator::StartsWith => actual.starts_with(&expected),
            Comparator::EndsWith => actual.ends_with(&expected),
            Comparator::Contains => actual.contains(&expected),
            _ => actual == expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub comparator: Comparator,
    pub values: Vec<String>,
    pub case_insensitive: bool,
}

/// Resolved attribute value
#[derive(Debug, Clone, PartialEq)]
enum AttrValue {
    Text(String),
    Structured,
    /// Present but `null`; exists, never compares
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeFilter {
    key: AttributeKey,
    comparison: Option<Comparison>,
}

impl AttributeFilter {
    pub fn new(key: AttributeKey, comparison: Option<Comparison>) -> Self {
        Self { key, comparison }
    }

    pub fn key(&self) -> &AttributeKey {
        &self.key
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn trait_id(&self) -> Option<&ShapeId> {
        match &self.key {
            AttributeKey::Trait { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn test(&self, shape: &Shape) -> bool {
        let values = self.values(shape);
        let Some(comparison) = &self.comparison else {
            return !values.is_empty();
        };

        let ci = comparison.case_insensitive;
        if comparison.comparator == Comparator::Exists {
            let exists = if values.is_empty() { "false" } else { "true" };
            return comparison
                .values
                .iter()
                .any(|expected| Comparator::Equal.compare(exists, expected, ci));
        }

        let mut texts = values.iter().filter_map(|v| match v {
            AttrValue::Text(text) => Some(text.as_str()),
            AttrValue::Structured | AttrValue::Null => None,
        });
        if comparison.comparator == Comparator::NotEqual {
            return texts.any(|actual| {
                comparison
                    .values
                    .iter()
                    .all(|expected| !Comparator::Equal.compare(actual, expected, ci))
            });
        }
        texts.any(|actual| {
            comparison
                .values
                .iter()
                .any(|expected| comparison.comparator.compare(actual, expected, ci))
        })
    }

    fn values(&self, shape: &Shape) -> Vec<AttrValue> {
        let id = shape.id();
        match &self.key {
            AttributeKey::Id => vec![AttrValue::Text(id.to_string())],
            AttributeKey::IdNamespace => vec![AttrValue::Text(id.namespace().to_string())],
            AttributeKey::IdName => vec![AttrValue::Text(id.name().to_string())],
            AttributeKey::IdMember => id
                .member()
                .map(|m| AttrValue::Text(m.to_string()))
                .into_iter()
                .collect(),
            AttributeKey::Service => shape
                .as_service()
                .map(|_| AttrValue::Text(id.to_string()))
                .into_iter()
                .collect(),
            AttributeKey::ServiceVersion => shape
                .as_service()
                .map(|s| AttrValue::Text(s.version.clone()))
                .into_iter()
                .collect(),
            AttributeKey::Trait { id: trait_id, path } => {
                let mut out = Vec::new();
                if let Some(t) = shape.get_trait(trait_id) {
                    select_path(t.value(), path, &mut out);
                }
                out
            }
        }
    }
}

fn select_path(value: &Value, path: &[PathSegment], out: &mut Vec<AttrValue>) {
    let Some((segment, rest)) = path.split_first() else {
        match value {
            Value::Null => out.push(AttrValue::Null),
            Value::String(text) => out.push(AttrValue::Text(text.clone())),
            Value::Bool(b) => out.push(AttrValue::Text(b.to_string())),
            Value::Number(n) => out.push(AttrValue::Text(n.to_string())),
            Value::Array(_) | Value::Object(_) => out.push(AttrValue::Structured),
        }
        return;
    };

    match (segment, value) {
        (PathSegment::Key(key), Value::Object(map)) => {
            if let Some(child) = map.get(key) {
                select_path(child, rest, out);
            }
        }
        (PathSegment::Key(key), Value::Array(items)) => {
            if let Some(child) = key.parse::<usize>().ok().and_then(|i| items.get(i)) {
                select_path(child, rest, out);
            }
        }
        (PathSegment::Keys, Value::Object(map)) => {
            for key in map.keys() {
                select_path(&Value::String(key.clone()), rest, out);
            }
        }
        (PathSegment::Values, Value::Object(map)) => {
            for child in map.values() {
                select_path(child, rest, out);
            }
        }
        (PathSegment::Values, Value::Array(items)) => {
            for child in items {
                select_path(child, rest, out);
            }
        }
        (PathSegment::Length, Value::Array(items)) => {
            select_path(&Value::from(items.len()), rest, out)
        }
        (PathSegment::Length, Value::Object(map)) => select_path(&Value::from(map.len()), rest, out),
        (PathSegment::Length, Value::String(text)) => {
            select_path(&Value::from(text.chars().count()), rest, out)
        }
        _ => {}
    }
}

impl Push for AttributeFilter {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        if self.test(shape) {
            next(ctx, shape)
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Trait existence is served from the trait index, id equality from
    /// direct lookups
    fn optimize(&self, model: &Model) -> Option<Vec<ShapeId>> {
        match (&self.key, &self.comparison) {
            (AttributeKey::Trait { id, path }, None) if path.is_empty() => {
                Some(model.indexes().shapes_with_trait(id).to_vec())
            }
            (AttributeKey::Id, Some(comparison))
                if comparison.comparator == Comparator::Equal && !comparison.case_insensitive =>
            {
                let mut ids: Vec<ShapeId> = comparison
                    .values
                    .iter()
                    .filter_map(|text| text.parse::<ShapeId>().ok())
                    .filter(|id| model.contains(id))
                    .collect();
                ids.sort();
                ids.dedup();
                Some(ids)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::selector::domain::stages::testing::{fixture_model, forwarded, id};
    use crate::features::model::{ModelBuilder, ShapeBuilder};
    use crate::features::selector::domain::Stage;
    use crate::shared::models::Trait;

    fn trait_key(name: &str, path: Vec<PathSegment>) -> AttributeKey {
        AttributeKey::Trait {
            id: ShapeId::prelude(name),
            path,
        }
    }

    fn compare(comparator: Comparator, values: &[&str]) -> Option<Comparison> {
        Some(Comparison {
            comparator,
            values: values.iter().map(|v| v.to_string()).collect(),
            case_insensitive: false,
        })
    }

    fn run(filter: AttributeFilter) -> Vec<String> {
        forwarded(&fixture_model(), &Stage::Attribute(filter))
    }

    #[test]
    fn test_trait_existence() {
        let filter = AttributeFilter::new(trait_key("sensitive", vec![]), None);
        assert_eq!(run(filter.clone()), vec!["ns#Str"]);
        assert_eq!(filter.optimize(&fixture_model()).unwrap(), vec![id("ns#Str")]);
    }

    #[test]
    fn test_trait_path_values() {
        let since = AttributeFilter::new(
            trait_key("deprecated", vec![PathSegment::Key("since".to_string())]),
            compare(Comparator::GreaterEqual, &["1"]),
        );
        assert_eq!(run(since), vec!["ns#Old"]);

        let keys = AttributeFilter::new(
            trait_key("deprecated", vec![PathSegment::Keys]),
            compare(Comparator::Equal, &["message"]),
        );
        assert_eq!(run(keys), vec!["ns#Old"]);

        let length = AttributeFilter::new(
            trait_key("deprecated", vec![PathSegment::Length]),
            compare(Comparator::Equal, &["2"]),
        );
        assert_eq!(run(length), vec!["ns#Old"]);
    }

    #[test]
    fn test_structured_values_do_not_compare() {
        let filter = AttributeFilter::new(
            trait_key("deprecated", vec![]),
            compare(Comparator::NotEqual, &["x"]),
        );
        assert!(run(filter).is_empty());
    }

    #[test]
    fn test_id_comparators() {
        let starts = AttributeFilter::new(AttributeKey::IdName, compare(Comparator::StartsWith, &["Get"]));
        assert_eq!(run(starts), vec!["ns#GetWidget", "ns#GetWidgetInput", "ns#GetWidgetInput$widgetId"]);

        let member = AttributeFilter::new(AttributeKey::IdMember, compare(Comparator::Equal, &["bar", "count"]));
        assert_eq!(run(member), vec!["ns#Foo$bar", "ns#Foo$count"]);

        let not_foo = AttributeFilter::new(AttributeKey::IdMember, compare(Comparator::NotEqual, &["bar"]));
        assert_eq!(run(not_foo), vec!["ns#Foo$count", "ns#GetWidgetInput$widgetId", "ns#Names$member", "ns#Tags$member"]);
    }

    #[test]
    fn test_case_insensitive_and_exists() {
        let filter = AttributeFilter::new(
            AttributeKey::Id,
            Some(Comparison {
                comparator: Comparator::Equal,
                values: vec!["NS#STR".to_string()],
                case_insensitive: true,
            }),
        );
        assert_eq!(run(filter.clone()), vec!["ns#Str"]);
        assert!(filter.optimize(&fixture_model()).is_none());

        let absent = AttributeFilter::new(trait_key("sensitive", vec![]), compare(Comparator::Exists, &["false"]));
        let ids = run(absent);
        assert!(!ids.contains(&"ns#Str".to_string()));
        assert!(ids.contains(&"ns#Foo".to_string()));
    }

    #[test]
    fn test_null_trait_value_is_present() {
        let model = ModelBuilder::new()
            .add_shape(
                ShapeBuilder::string(id("ns#Str"))
                    .with_trait(Trait::new(ShapeId::prelude("documentation"), Value::Null)),
            )
            .build()
            .unwrap();
        let stage = Stage::Attribute(AttributeFilter::new(trait_key("documentation", vec![]), None));
        assert_eq!(forwarded(&model, &stage), vec!["ns#Str"]);
        assert_eq!(stage.optimize(&model).unwrap(), vec![id("ns#Str")]);

        let exists = AttributeFilter::new(
            trait_key("documentation", vec![]),
            compare(Comparator::Exists, &["true"]),
        );
        assert_eq!(forwarded(&model, &Stage::Attribute(exists)), vec!["ns#Str"]);

        let equal = AttributeFilter::new(
            trait_key("documentation", vec![]),
            compare(Comparator::Equal, &["null"]),
        );
        assert!(forwarded(&model, &Stage::Attribute(equal)).is_empty());
    }

    #[test]
    fn test_service_version() {
        let filter = AttributeFilter::new(AttributeKey::ServiceVersion, compare(Comparator::StartsWith, &["2024"]));
        assert_eq!(run(filter), vec!["ns#Svc"]);
    }
}
