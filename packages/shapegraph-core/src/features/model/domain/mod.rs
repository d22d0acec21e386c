// Domain: shape graph snapshot, declarations, relationships, derived indexes

pub mod error;
pub mod indexes;
pub mod model;
pub mod relationship;
pub mod shape_builder;

pub use error::{ModelError, ModelResult};
pub use indexes::ModelIndexes;
pub use model::Model;
pub use relationship::{Relationship, RelationshipType};
pub use shape_builder::{MemberDeclaration, ShapeBuilder};
