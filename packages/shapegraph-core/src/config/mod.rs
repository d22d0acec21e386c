//! Configuration System
//!
//! Two groups of settings, both optional with defaults:
//! - `ModelConfig`: mixin conflict policy, trait definition checks, prelude
//! - `SelectorConfig`: fast-path optimization, result limit
//!
//! # Examples
//!
//! ```rust,ignore
//! use shapegraph_core::config::EngineConfig;
//!
//! // Defaults
//! let config = EngineConfig::default();
//!
//! // From a versioned YAML file
//! let config = EngineConfig::from_yaml_file("shapegraph.yaml")?;
//! ```

pub mod engine_config;
pub mod error;
pub mod validation;

// Re-exports
pub use engine_config::{EngineConfig, MixinConflictPolicy, ModelConfig, SelectorConfig};
pub use error::{ConfigError, ConfigResult};
pub use validation::Validatable;
