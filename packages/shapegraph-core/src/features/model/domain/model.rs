// Domain: Model - immutable snapshot of the shape graph
//
// Two-phase construction: the shapes are frozen first, then the indexes are
// computed from them. Nothing mutates a Model afterwards, so it can be
// shared across threads without locks.

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use super::error::{ModelError, ModelResult};
use super::indexes::ModelIndexes;
use super::relationship::Relationship;
use crate::features::model::infrastructure::IndexBuilder;
use crate::shared::models::{Shape, ShapeId, ShapeType, TraitMap};

/// Frozen shape graph with its derived indexes
#[derive(Debug)]
pub struct Model {
    shapes: AHashMap<ShapeId, Arc<Shape>>,
    ordered: Vec<ShapeId>,
    indexes: ModelIndexes,
}

impl Model {
    /// Freeze fully resolved top-level shapes into a model
    ///
    /// Members are pulled out of their containers and indexed by member id;
    /// every member's container back-reference must name its container.
    pub(crate) fn from_shapes(top_level: Vec<Arc<Shape>>) -> ModelResult<Self> {
        let mut shapes: AHashMap<ShapeId, Arc<Shape>> = AHashMap::new();

        for shape in top_level {
            for member in shape.members() {
                let container = member.as_member().map(|m| &m.container);
                if container != Some(shape.id()) || member.id().without_member() != *shape.id() {
                    return Err(ModelError::MemberContainerMismatch {
                        member: member.id().clone(),
                        container: shape.id().clone(),
                    });
                }
                if shapes.insert(member.id().clone(), member.clone()).is_some() {
                    return Err(ModelError::DuplicateShape(member.id().clone()));
                }
            }
            if shapes.insert(shape.id().clone(), shape.clone()).is_some() {
                return Err(ModelError::DuplicateShape(shape.id().clone()));
            }
        }

        let mut ordered: Vec<ShapeId> = shapes.keys().cloned().collect();
        ordered.sort();

        let indexes = IndexBuilder::new(&shapes, &ordered).build_indexes();
        debug!(shapes = ordered.len(), "model frozen");

        Ok(Self {
            shapes,
            ordered,
            indexes,
        })
    }

    /// O(1) lookup by id
    pub fn get_shape(&self, id: &ShapeId) -> Option<&Arc<Shape>> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// All shapes (members included) in id order
    pub fn shapes(&self) -> impl Iterator<Item = &Arc<Shape>> + '_ {
        self.ordered.iter().filter_map(|id| self.shapes.get(id))
    }

    pub fn shape_ids(&self) -> &[ShapeId] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Shapes of exactly `shape_type`, in id order (served from the type index)
    pub fn shapes_of_type(&self, shape_type: ShapeType) -> Vec<&Arc<Shape>> {
        self.resolve(self.indexes.shapes_of_type(shape_type))
    }

    /// Shapes bearing `trait_id`, in id order (served from the trait index)
    pub fn shapes_with_trait(&self, trait_id: &ShapeId) -> Vec<&Arc<Shape>> {
        self.resolve(self.indexes.shapes_with_trait(trait_id))
    }

    /// Effective traits of a shape
    pub fn traits_of(&self, id: &ShapeId) -> Option<&TraitMap> {
        self.shapes.get(id).map(|shape| shape.traits())
    }

    /// Outgoing relationships whose neighbor exists in this model
    pub fn neighbors(&self, id: &ShapeId) -> &[Relationship] {
        self.indexes.outgoing(id)
    }

    /// Incoming relationships
    pub fn reverse_neighbors(&self, id: &ShapeId) -> &[Relationship] {
        self.indexes.incoming(id)
    }

    pub(crate) fn indexes(&self) -> &ModelIndexes {
        &self.indexes
    }

    fn resolve(&self, ids: &[ShapeId]) -> Vec<&Arc<Shape>> {
        ids.iter().filter_map(|id| self.shapes.get(id)).collect()
    }
}
