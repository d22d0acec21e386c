//! Engine configuration loaded from disk and applied to a build + query

mod common;

use common::*;
use shapegraph_core::config::{ConfigError, MixinConflictPolicy};
use shapegraph_core::{EngineConfig, ModelBuilder, Selector, ShapeBuilder};
use std::io::Write;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_yaml_config_drives_build_and_selection() {
    let file = write_config(
        r#"
version: 1
model:
  mixin_member_conflicts: first_wins
  require_trait_definitions: false
selector:
  result_limit: 2
"#,
    );
    let config = EngineConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.model.mixin_member_conflicts, MixinConflictPolicy::FirstWins);

    // Undefined traits are accepted when the check is off
    let model = ModelBuilder::with_config(config.model.clone())
        .add_shapes(weather_shapes())
        .add_shape(ShapeBuilder::string(sid("Tagged")).annotate(sid("custom")))
        .build()
        .unwrap();
    assert!(model.contains(&sid("Tagged")));

    let selector = Selector::parse("string").unwrap();
    assert_eq!(selector.select_with(&model, &config.selector).len(), 2);
}

#[test]
fn test_missing_version_rejected() {
    let file = write_config("selector:\n  optimize: false\n");
    let err = EngineConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVersion));
}

#[test]
fn test_round_trip_through_file() {
    let config = EngineConfig::default();
    let file = write_config(&config.to_yaml().unwrap());
    assert_eq!(EngineConfig::from_yaml_file(file.path()).unwrap(), config);
}
