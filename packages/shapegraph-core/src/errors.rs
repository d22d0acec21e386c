//! Error types for shapegraph-core
//!
//! Each feature owns its own error enum; `ShapeGraphError` unifies them for
//! callers that drive several stages at once.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::model::ModelError;
use crate::features::selector::SelectorError;
use crate::shared::models::ShapeIdError;

/// Main error type for shapegraph-core operations
#[derive(Debug, Error)]
pub enum ShapeGraphError {
    /// Model construction failed
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Selector failed to compile
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ShapeId(#[from] ShapeIdError),
}

/// Result type alias for shapegraph operations
pub type Result<T> = std::result::Result<T, ShapeGraphError>;
