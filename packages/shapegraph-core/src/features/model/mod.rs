//! Model Feature - the frozen shape graph
//!
//! # Architecture
//! ```text
//! application/    ModelBuilder (entry point)
//!       ↓
//! domain/         Model, ShapeBuilder, relationships, indexes
//!       ↓
//! infrastructure/ mixin resolver, index builder, prelude
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::ModelBuilder;
pub use domain::{
    MemberDeclaration, Model, ModelError, ModelResult, Relationship, RelationshipType,
    ShapeBuilder,
};
