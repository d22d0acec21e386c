// Infrastructure: Prelude - built-in `smithy.api` shapes
//
// Simple types every model can target, plus the trait definitions the
// engine itself relies on (`trait`, `mixin`) and a handful of common ones.

use crate::features::model::domain::ShapeBuilder;
use crate::shared::models::{ShapeId, ShapeType};

const SIMPLE_TYPES: [(&str, ShapeType); 13] = [
    ("Blob", ShapeType::Blob),
    ("Boolean", ShapeType::Boolean),
    ("String", ShapeType::String),
    ("Timestamp", ShapeType::Timestamp),
    ("Byte", ShapeType::Byte),
    ("Short", ShapeType::Short),
    ("Integer", ShapeType::Integer),
    ("Long", ShapeType::Long),
    ("Float", ShapeType::Float),
    ("Double", ShapeType::Double),
    ("BigInteger", ShapeType::BigInteger),
    ("BigDecimal", ShapeType::BigDecimal),
    ("Document", ShapeType::Document),
];

/// Annotation-style traits, modeled as structures
const STRUCTURE_TRAITS: [&str; 5] = ["trait", "mixin", "sensitive", "required", "readonly"];

/// String-valued traits
const STRING_TRAITS: [&str; 3] = ["documentation", "error", "pattern"];

pub fn trait_definition_id() -> ShapeId {
    ShapeId::prelude("trait")
}

pub fn mixin_trait_id() -> ShapeId {
    ShapeId::prelude("mixin")
}

/// Declarations of every prelude shape
pub fn prelude_shapes() -> Vec<ShapeBuilder> {
    let mut shapes: Vec<ShapeBuilder> = SIMPLE_TYPES
        .iter()
        .map(|(name, shape_type)| ShapeBuilder::simple(*shape_type, ShapeId::prelude(name)))
        .collect();

    for name in STRUCTURE_TRAITS {
        shapes.push(ShapeBuilder::structure(ShapeId::prelude(name)).annotate(trait_definition_id()));
    }
    for name in STRING_TRAITS {
        shapes.push(ShapeBuilder::string(ShapeId::prelude(name)).annotate(trait_definition_id()));
    }

    let string = ShapeId::prelude("String");
    shapes.push(
        ShapeBuilder::structure(ShapeId::prelude("deprecated"))
            .member("message", string.clone())
            .member("since", string)
            .annotate(trait_definition_id()),
    );

    shapes
}
