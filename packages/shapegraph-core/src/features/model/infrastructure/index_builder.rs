// Index Builder - Parallel Index Construction
//
// Builds the type, trait and neighbor indexes concurrently. All inputs are
// read-only; the finished ModelIndexes is handed to the Model and frozen.

use ahash::AHashMap;
use std::sync::Arc;
use tracing::debug;

use crate::features::model::domain::{ModelIndexes, Relationship, RelationshipType};
use crate::shared::models::{Shape, ShapeId, ShapeKind, ShapeType};

pub struct IndexBuilder<'a> {
    shapes: &'a AHashMap<ShapeId, Arc<Shape>>,
    ordered: &'a [ShapeId],
}

impl<'a> IndexBuilder<'a> {
    /// `ordered` must hold every key of `shapes`, sorted
    pub fn new(shapes: &'a AHashMap<ShapeId, Arc<Shape>>, ordered: &'a [ShapeId]) -> Self {
        Self { shapes, ordered }
    }

    /// Build all indexes (PARALLEL)
    pub fn build_indexes(&self) -> ModelIndexes {
        let (by_type, (by_trait, (forward, reverse))) = rayon::join(
            || self.build_type_index(),
            || {
                rayon::join(
                    || self.build_trait_index(),
                    || self.build_neighbor_indexes(),
                )
            },
        );

        let indexes = ModelIndexes {
            by_type,
            by_trait,
            forward,
            reverse,
        };

        debug!(
            shapes = self.ordered.len(),
            types = indexes.by_type.len(),
            traits = indexes.by_trait.len(),
            relationships = indexes.relationship_count(),
            "built model indexes"
        );

        indexes
    }

    fn ordered_shapes(&self) -> impl Iterator<Item = &'a Arc<Shape>> + 'a {
        let shapes = self.shapes;
        self.ordered.iter().filter_map(move |id| shapes.get(id))
    }

    fn build_type_index(&self) -> AHashMap<ShapeType, Vec<ShapeId>> {
        let mut index: AHashMap<ShapeType, Vec<ShapeId>> = AHashMap::new();
        for shape in self.ordered_shapes() {
            index
                .entry(shape.shape_type())
                .or_default()
                .push(shape.id().clone());
        }
        index
    }

    fn build_trait_index(&self) -> AHashMap<ShapeId, Vec<ShapeId>> {
        let mut index: AHashMap<ShapeId, Vec<ShapeId>> = AHashMap::new();
        for shape in self.ordered_shapes() {
            for trait_id in shape.traits().ids() {
                index
                    .entry(trait_id.clone())
                    .or_default()
                    .push(shape.id().clone());
            }
        }
        index
    }

    /// Forward and reverse relationship indexes
    ///
    /// Relationships whose neighbor is not in the model are dropped, so a
    /// dangling reference simply contributes no neighbors.
    fn build_neighbor_indexes(
        &self,
    ) -> (
        AHashMap<ShapeId, Vec<Relationship>>,
        AHashMap<ShapeId, Vec<Relationship>>,
    ) {
        let mut forward: AHashMap<ShapeId, Vec<Relationship>> = AHashMap::new();
        let mut reverse: AHashMap<ShapeId, Vec<Relationship>> = AHashMap::new();

        for shape in self.ordered_shapes() {
            let outgoing: Vec<Relationship> = relationships_of(shape)
                .into_iter()
                .filter(|rel| self.shapes.contains_key(&rel.neighbor))
                .collect();

            for rel in &outgoing {
                reverse
                    .entry(rel.neighbor.clone())
                    .or_default()
                    .push(rel.clone());
            }
            if !outgoing.is_empty() {
                forward.insert(shape.id().clone(), outgoing);
            }
        }

        (forward, reverse)
    }
}

/// Outgoing relationships of one shape, in a fixed per-relationship order
pub(crate) fn relationships_of(shape: &Shape) -> Vec<Relationship> {
    let source = shape.id();
    let mut rels = Vec::new();
    let mut push = |kind: RelationshipType, neighbor: &ShapeId| {
        rels.push(Relationship::new(source.clone(), kind, neighbor.clone()));
    };

    match shape.kind() {
        ShapeKind::List(_)
        | ShapeKind::Set(_)
        | ShapeKind::Map(_)
        | ShapeKind::Structure(_)
        | ShapeKind::Union(_) => {
            for member in shape.members() {
                push(RelationshipType::Member, member.id());
            }
        }
        ShapeKind::Member(member) => push(RelationshipType::MemberTarget, &member.target),
        ShapeKind::Resource(resource) => {
            for target in resource.identifiers.targets() {
                push(RelationshipType::Identifier, target);
            }
            for target in resource.properties.targets() {
                push(RelationshipType::Property, target);
            }
            let lifecycle = [
                (RelationshipType::Create, &resource.create),
                (RelationshipType::Put, &resource.put),
                (RelationshipType::Read, &resource.read),
                (RelationshipType::Update, &resource.update),
                (RelationshipType::Delete, &resource.delete),
                (RelationshipType::List, &resource.list),
            ];
            for (kind, operation) in lifecycle {
                if let Some(operation) = operation {
                    push(kind, operation);
                }
            }
            for operation in &resource.operations {
                push(RelationshipType::Operation, operation);
            }
            for operation in &resource.collection_operations {
                push(RelationshipType::CollectionOperation, operation);
            }
            for child in &resource.resources {
                push(RelationshipType::Resource, child);
            }
        }
        ShapeKind::Operation(operation) => {
            if let Some(input) = &operation.input {
                push(RelationshipType::Input, input);
            }
            if let Some(output) = &operation.output {
                push(RelationshipType::Output, output);
            }
            for error in &operation.errors {
                push(RelationshipType::Error, error);
            }
        }
        ShapeKind::Service(service) => {
            for operation in &service.operations {
                push(RelationshipType::Operation, operation);
            }
            for resource in &service.resources {
                push(RelationshipType::Resource, resource);
            }
            for error in &service.errors {
                push(RelationshipType::Error, error);
            }
        }
        ShapeKind::Blob
        | ShapeKind::Boolean
        | ShapeKind::String
        | ShapeKind::Timestamp
        | ShapeKind::Byte
        | ShapeKind::Short
        | ShapeKind::Integer
        | ShapeKind::Long
        | ShapeKind::Float
        | ShapeKind::Double
        | ShapeKind::BigInteger
        | ShapeKind::BigDecimal
        | ShapeKind::Document => {}
    }

    for mixin in shape.mixins() {
        push(RelationshipType::Mixin, mixin);
    }
    for trait_id in shape.traits().ids() {
        push(RelationshipType::Trait, trait_id);
    }

    rels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{MemberShape, Members, OperationShape, TraitMap};

    fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    fn shape(text: &str, kind: ShapeKind) -> Arc<Shape> {
        Arc::new(Shape::new(id(text), kind, TraitMap::new(), Vec::new()))
    }

    fn fixture() -> (AHashMap<ShapeId, Arc<Shape>>, Vec<ShapeId>) {
        let member = shape(
            "ns#In$name",
            ShapeKind::Member(MemberShape {
                container: id("ns#In"),
                target: id("ns#Str"),
            }),
        );
        let shapes = vec![
            shape("ns#Str", ShapeKind::String),
            shape("ns#In", ShapeKind::Structure(Members::new(vec![member.clone()]))),
            member,
            shape(
                "ns#Op",
                ShapeKind::Operation(OperationShape {
                    input: Some(id("ns#In")),
                    output: Some(id("ns#Missing")),
                    errors: Vec::new(),
                }),
            ),
        ];

        let map: AHashMap<_, _> = shapes.iter().map(|s| (s.id().clone(), s.clone())).collect();
        let mut ordered: Vec<_> = map.keys().cloned().collect();
        ordered.sort();
        (map, ordered)
    }

    #[test]
    fn test_type_index_is_ordered() {
        let (map, ordered) = fixture();
        let indexes = IndexBuilder::new(&map, &ordered).build_indexes();

        assert_eq!(indexes.shapes_of_type(ShapeType::String), &[id("ns#Str")]);
        assert_eq!(indexes.shapes_of_type(ShapeType::Member), &[id("ns#In$name")]);
        assert!(indexes.shapes_of_type(ShapeType::Service).is_empty());
    }

    #[test]
    fn test_dangling_relationships_are_dropped() {
        let (map, ordered) = fixture();
        let indexes = IndexBuilder::new(&map, &ordered).build_indexes();

        let outgoing = indexes.outgoing(&id("ns#Op"));
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].kind, RelationshipType::Input);
        assert!(indexes.incoming(&id("ns#Missing")).is_empty());
    }

    #[test]
    fn test_reverse_index_mirrors_forward() {
        let (map, ordered) = fixture();
        let indexes = IndexBuilder::new(&map, &ordered).build_indexes();

        let incoming = indexes.incoming(&id("ns#Str"));
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].source, id("ns#In$name"));
        assert_eq!(incoming[0].kind, RelationshipType::MemberTarget);
    }
}
