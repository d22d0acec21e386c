//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting outside the values the engine accepts
    #[error("{config}.{field} = {value} is not allowed: {hint}")]
    InvalidValue {
        config: &'static str,
        field: &'static str,
        value: String,
        hint: &'static str,
    },

    #[error("Engine configuration has no `version` (expected `version: 1`)")]
    MissingVersion,

    #[error("Engine configuration version {found} is not supported (supported: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("Cannot read engine configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed engine configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_value(
        config: &'static str,
        field: &'static str,
        value: impl ToString,
        hint: &'static str,
    ) -> Self {
        Self::InvalidValue {
            config,
            field,
            value: value.to_string(),
            hint,
        }
    }
}
