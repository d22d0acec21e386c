/*
 * Shapegraph Core - shape graph model and selector engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (ShapeId, Shape, Trait)
 * - features/    : Vertical slices (model → selector)
 * - config/      : Versioned engine configuration
 *
 * Performance:
 * - Frozen, index-backed model shared across threads
 * - Push-based selector evaluation with early termination
 * - Rayon for index building and batch evaluation
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (model, selector)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{EngineConfig, ModelConfig, SelectorConfig};
pub use errors::{Result, ShapeGraphError};
pub use features::model::{
    MemberDeclaration, Model, ModelBuilder, ModelError, ModelResult, Relationship,
    RelationshipType, ShapeBuilder,
};
pub use features::selector::{
    Selector, SelectorBatch, SelectorError, SelectorMatch, SelectorResult, SemanticError,
    SyntaxError,
};
pub use shared::models::{Shape, ShapeId, ShapeKind, ShapeType, Trait, TraitMap};
