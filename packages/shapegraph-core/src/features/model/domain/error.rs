//! Model construction errors
//!
//! Every variant is fatal to the build that raised it.

use thiserror::Error;

use crate::shared::models::{ShapeId, ShapeIdError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    /// Two mixins (or a mixin and a local declaration) disagree on a member
    #[error("Conflicting definitions of member `{member}` on `{shape}`: {reason}")]
    Conflict {
        shape: ShapeId,
        member: String,
        reason: String,
    },

    /// A shape is, directly or transitively, its own mixin
    #[error("Mixin cycle detected involving `{shape}`")]
    Cycle { shape: ShapeId },

    #[error("Duplicate shape definition: `{0}`")]
    DuplicateShape(ShapeId),

    #[error("Duplicate member `{member}` declared on `{shape}`")]
    DuplicateMember { shape: ShapeId, member: String },

    #[error("Shape `{shape}` mixes in unknown shape `{mixin}`")]
    UnknownMixin { shape: ShapeId, mixin: ShapeId },

    #[error("Shape `{shape}` cannot use `{mixin}` as a mixin: {reason}")]
    InvalidMixin {
        shape: ShapeId,
        mixin: ShapeId,
        reason: String,
    },

    #[error("Shape `{shape}` applies unknown trait `{trait_id}`")]
    UnknownTrait { shape: ShapeId, trait_id: ShapeId },

    #[error("Shape `{shape}` applies `{trait_id}`, which is not a trait definition")]
    NotATraitDefinition { shape: ShapeId, trait_id: ShapeId },

    /// A member's container back-reference disagrees with the container
    #[error("Member `{member}` does not belong to container `{container}`")]
    MemberContainerMismatch { member: ShapeId, container: ShapeId },

    #[error("Invalid definition of `{shape}`: {reason}")]
    InvalidDefinition { shape: ShapeId, reason: String },

    #[error(transparent)]
    InvalidShapeId(#[from] ShapeIdError),
}

impl ModelError {
    pub fn conflict(shape: &ShapeId, member: &str, reason: impl Into<String>) -> Self {
        ModelError::Conflict {
            shape: shape.clone(),
            member: member.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_definition(shape: &ShapeId, reason: impl Into<String>) -> Self {
        ModelError::InvalidDefinition {
            shape: shape.clone(),
            reason: reason.into(),
        }
    }
}

pub type ModelResult<T> = Result<T, ModelError>;
