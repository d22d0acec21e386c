//! Model Builder
//!
//! Entry point for assembling a `Model` from declared shapes:
//! 1. collect declarations (plus the prelude unless disabled)
//! 2. resolve mixins in topological order
//! 3. freeze shapes and build the indexes
//! 4. check applied traits against trait definitions

use ahash::AHashMap;
use tracing::debug;

use crate::config::ModelConfig;
use crate::features::model::domain::{Model, ModelError, ModelResult, ShapeBuilder};
use crate::features::model::infrastructure::prelude::{prelude_shapes, trait_definition_id};
use crate::features::model::infrastructure::MixinResolver;
use crate::shared::models::ShapeId;

#[derive(Debug, Default)]
pub struct ModelBuilder {
    config: ModelConfig,
    shapes: Vec<ShapeBuilder>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ModelConfig) -> Self {
        Self {
            config,
            shapes: Vec::new(),
        }
    }

    pub fn add_shape(mut self, shape: ShapeBuilder) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn add_shapes(mut self, shapes: impl IntoIterator<Item = ShapeBuilder>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    /// Resolve and freeze every declared shape
    pub fn build(self) -> ModelResult<Model> {
        let Self { config, shapes } = self;
        let user_shapes = shapes.len();

        let mut all = shapes;
        if config.include_prelude {
            all.extend(prelude_shapes());
        }

        let mut declared: AHashMap<ShapeId, ShapeBuilder> = AHashMap::with_capacity(all.len());
        for shape in all {
            if let Some(reason) = shape.misuse.first() {
                return Err(ModelError::invalid_definition(&shape.id, reason.clone()));
            }
            if shape.id.has_member() {
                return Err(ModelError::invalid_definition(
                    &shape.id,
                    "top-level shape ids cannot carry a member name",
                ));
            }
            let id = shape.id.clone();
            if declared.insert(id.clone(), shape).is_some() {
                return Err(ModelError::DuplicateShape(id));
            }
        }

        let frozen = MixinResolver::new(&declared, config.mixin_member_conflicts).resolve_all()?;
        let model = Model::from_shapes(frozen)?;

        if config.require_trait_definitions {
            check_trait_definitions(&model)?;
        }

        debug!(
            declared = user_shapes,
            shapes = model.len(),
            prelude = config.include_prelude,
            "model built"
        );
        Ok(model)
    }
}

/// Every applied trait must name a shape marked `smithy.api#trait`
fn check_trait_definitions(model: &Model) -> ModelResult<()> {
    let marker = trait_definition_id();
    for shape in model.shapes() {
        for trait_id in shape.traits().ids() {
            match model.get_shape(trait_id) {
                None => {
                    return Err(ModelError::UnknownTrait {
                        shape: shape.id().clone(),
                        trait_id: trait_id.clone(),
                    })
                }
                Some(definition) if !definition.has_trait(&marker) => {
                    return Err(ModelError::NotATraitDefinition {
                        shape: shape.id().clone(),
                        trait_id: trait_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}
