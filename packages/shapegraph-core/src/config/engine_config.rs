//! Engine configuration: model construction + selector evaluation
//!
//! YAML schema (version 1):
//! ```yaml
//! version: 1
//! model:
//!   mixin_member_conflicts: error   # or first_wins
//!   require_trait_definitions: true
//!   include_prelude: true
//! selector:
//!   optimize: true
//!   result_limit: null
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;

const SUPPORTED_VERSIONS: [u32; 1] = [1];

/// What to do when two mixins contribute the same member name with
/// different targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixinConflictPolicy {
    /// Fail the model build with a conflict error
    #[default]
    Error,
    /// Keep the member from the first mixin that declares it
    FirstWins,
}

/// Model construction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub mixin_member_conflicts: MixinConflictPolicy,

    /// Applied trait ids must resolve to shapes marked with `smithy.api#trait`
    pub require_trait_definitions: bool,

    /// Add the `smithy.api` prelude shapes to every model
    pub include_prelude: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            mixin_member_conflicts: MixinConflictPolicy::Error,
            require_trait_definitions: true,
            include_prelude: true,
        }
    }
}

impl Validatable for ModelConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ModelConfig"
    }
}

/// Selector evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Use the first stage's index fast path when it offers one
    pub optimize: bool,

    /// Stop the scan once this many distinct shapes matched (1..)
    pub result_limit: Option<usize>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            optimize: true,
            result_limit: None,
        }
    }
}

impl SelectorConfig {
    /// Full scan, no limit
    pub fn full_scan() -> Self {
        Self {
            optimize: false,
            result_limit: None,
        }
    }

    pub fn with_result_limit(mut self, limit: usize) -> Self {
        self.result_limit = Some(limit);
        self
    }
}

impl Validatable for SelectorConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.result_limit == Some(0) {
            return Err(ConfigError::invalid_value(
                self.config_name(),
                "result_limit",
                0,
                "omit it or set it to null for unlimited results",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "SelectorConfig"
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub model: ModelConfig,
    pub selector: SelectorConfig,
}

/// On-disk form with a schema version
#[derive(Debug, Serialize, Deserialize)]
struct EngineConfigFileV1 {
    version: Option<u32>,
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    selector: SelectorConfig,
}

impl EngineConfig {
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: EngineConfigFileV1 = serde_yaml::from_str(content)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            model: file.model,
            selector: file.selector,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = EngineConfigFileV1 {
            version: Some(1),
            model: self.model.clone(),
            selector: self.selector.clone(),
        };
        serde_yaml::to_string(&file).map_err(ConfigError::Yaml)
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.model.validate()?;
        self.selector.validate()
    }

    fn config_name(&self) -> &'static str {
        "EngineConfig"
    }
}
