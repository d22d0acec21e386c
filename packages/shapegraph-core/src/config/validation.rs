//! Configuration validation

use super::error::ConfigResult;

/// Settings checked after deserialization, before the engine uses them
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Name used as the prefix of field paths in errors
    fn config_name(&self) -> &'static str;
}
