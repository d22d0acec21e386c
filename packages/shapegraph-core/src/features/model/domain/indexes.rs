// Domain: ModelIndexes - derived reverse lookups over a frozen model
//
// Built exactly once by IndexBuilder during Model construction and never
// mutated afterwards. Every list is in shape id order.

use ahash::AHashMap;

use super::relationship::Relationship;
use crate::shared::models::{ShapeId, ShapeType};

#[derive(Debug, Default)]
pub struct ModelIndexes {
    /// Variant tag -> shapes of that variant
    pub(crate) by_type: AHashMap<ShapeType, Vec<ShapeId>>,

    /// Trait id -> shapes bearing that trait
    pub(crate) by_trait: AHashMap<ShapeId, Vec<ShapeId>>,

    /// Source -> outgoing relationships (per-relationship declaration order)
    pub(crate) forward: AHashMap<ShapeId, Vec<Relationship>>,

    /// Neighbor -> incoming relationships
    pub(crate) reverse: AHashMap<ShapeId, Vec<Relationship>>,
}

impl ModelIndexes {
    pub fn shapes_of_type(&self, shape_type: ShapeType) -> &[ShapeId] {
        self.by_type
            .get(&shape_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn shapes_with_trait(&self, trait_id: &ShapeId) -> &[ShapeId] {
        self.by_trait
            .get(trait_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn outgoing(&self, id: &ShapeId) -> &[Relationship] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn incoming(&self, id: &ShapeId) -> &[Relationship] {
        self.reverse.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn relationship_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }
}
