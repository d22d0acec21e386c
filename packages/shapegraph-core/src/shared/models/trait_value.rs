//! Traits: (trait shape id, value) annotations applied to shapes
//!
//! Values are JSON-like documents. Node literal parsing happens outside this
//! crate; callers hand in `serde_json::Value`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::shape_id::ShapeId;

/// Trait applied to a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    id: ShapeId,
    value: Value,
}

impl Trait {
    pub fn new(id: ShapeId, value: Value) -> Self {
        Self { id, value }
    }

    /// Annotation trait (empty object value), e.g. `@sensitive`
    pub fn annotation(id: ShapeId) -> Self {
        Self::new(id, Value::Object(Default::default()))
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Applied traits keyed by trait id, iterated in id order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitMap {
    traits: BTreeMap<ShapeId, Trait>,
}

impl TraitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, replacing (and returning) any trait with the same id
    pub fn insert(&mut self, t: Trait) -> Option<Trait> {
        self.traits.insert(t.id.clone(), t)
    }

    pub fn remove(&mut self, id: &ShapeId) -> Option<Trait> {
        self.traits.remove(id)
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Trait> {
        self.traits.get(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.traits.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ShapeId> {
        self.traits.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trait> {
        self.traits.values()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl FromIterator<Trait> for TraitMap {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        let mut map = TraitMap::new();
        for t in iter {
            map.insert(t);
        }
        map
    }
}

impl<'a> IntoIterator for &'a TraitMap {
    type Item = &'a Trait;
    type IntoIter = std::collections::btree_map::Values<'a, ShapeId, Trait>;

    fn into_iter(self) -> Self::IntoIter {
        self.traits.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_same_id() {
        let id = ShapeId::prelude("documentation");
        let mut map = TraitMap::new();
        assert!(map.insert(Trait::new(id.clone(), json!("first"))).is_none());
        let previous = map.insert(Trait::new(id.clone(), json!("second")));

        assert_eq!(previous.unwrap().value(), &json!("first"));
        assert_eq!(map.get(&id).unwrap().value(), &json!("second"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_value_equality() {
        let id = ShapeId::prelude("tags");
        assert_eq!(
            Trait::new(id.clone(), json!(["a", "b"])),
            Trait::new(id.clone(), json!(["a", "b"]))
        );
        assert_ne!(
            Trait::new(id.clone(), json!(["a"])),
            Trait::new(id, json!(["b"]))
        );
    }
}
