//! Shared models (SSOT for the shape graph)
//!
//! - ShapeId: namespace#Name$member identifiers
//! - ShapeType: variant tags
//! - Trait / TraitMap: applied annotations
//! - Shape / ShapeKind: frozen graph nodes

pub mod shape;
pub mod shape_id;
pub mod shape_type;
pub mod trait_value;

pub use shape::{
    MemberShape, Members, NamedTargets, OperationShape, ResourceShape, ServiceShape, Shape,
    ShapeKind,
};
pub use shape_id::{ShapeId, ShapeIdError, PRELUDE_NAMESPACE};
pub use shape_type::ShapeType;
pub use trait_value::{Trait, TraitMap};
