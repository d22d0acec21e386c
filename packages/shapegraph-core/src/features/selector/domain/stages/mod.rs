// Stage implementations

pub mod attribute;
pub mod function;
pub mod neighbor;
pub mod type_filter;
pub mod variable;

pub use attribute::{AttributeFilter, AttributeKey, Comparator, Comparison, PathSegment};
pub use function::{FunctionKind, FunctionStage};
pub use neighbor::{NeighborDirection, NeighborStep};
pub use type_filter::TypeFilter;
pub use variable::VariableStage;

#[cfg(test)]
pub(crate) mod testing {
    use serde_json::json;
    use std::ops::ControlFlow;
    use std::sync::Arc;

    use crate::features::model::{Model, ModelBuilder, ShapeBuilder};
    use crate::features::selector::domain::context::{Context, Evaluation};
    use crate::features::selector::domain::stage::{Push, Stage};
    use crate::shared::models::{Shape, ShapeId, Trait};

    pub fn id(text: &str) -> ShapeId {
        text.parse().unwrap()
    }

    /// Small model touching every relationship kind
    pub fn fixture_model() -> Model {
        let string = ShapeId::prelude("String");
        ModelBuilder::new()
            .add_shape(ShapeBuilder::string(id("ns#Str")).annotate(ShapeId::prelude("sensitive")))
            .add_shape(ShapeBuilder::list(id("ns#Names"), id("ns#Str")))
            .add_shape(ShapeBuilder::set(id("ns#Tags"), string.clone()))
            .add_shape(
                ShapeBuilder::structure(id("ns#Foo"))
                    .member("bar", id("ns#Str"))
                    .member("count", ShapeId::prelude("Integer"))
                    .with_trait(Trait::new(ShapeId::prelude("documentation"), json!("Foo docs"))),
            )
            .add_shape(ShapeBuilder::string(id("ns#WidgetId")))
            .add_shape(
                ShapeBuilder::resource(id("ns#Widget"))
                    .identifier("widgetId", id("ns#WidgetId"))
                    .property("name", id("ns#Str"))
                    .read(id("ns#GetWidget")),
            )
            .add_shape(
                ShapeBuilder::operation(id("ns#GetWidget"))
                    .input(id("ns#GetWidgetInput"))
                    .output(id("ns#Foo"))
                    .error(id("ns#NotFound")),
            )
            .add_shape(
                ShapeBuilder::structure(id("ns#GetWidgetInput")).member("widgetId", id("ns#WidgetId")),
            )
            .add_shape(
                ShapeBuilder::structure(id("ns#NotFound"))
                    .with_trait(Trait::new(ShapeId::prelude("error"), json!("client"))),
            )
            .add_shape(
                ShapeBuilder::service(id("ns#Svc"))
                    .version("2024-01-01")
                    .bind_resource(id("ns#Widget")),
            )
            .add_shape(ShapeBuilder::string(id("ns#Old")).with_trait(Trait::new(
                ShapeId::prelude("deprecated"),
                json!({"message": "use New", "since": "1.0"}),
            )))
            .build()
            .unwrap()
    }

    /// Ids `stage` forwards when every shape of the model is pushed into it,
    /// first occurrence order, restricted to the `ns` namespace
    pub fn forwarded(model: &Model, stage: &Stage) -> Vec<String> {
        let eval = Evaluation::new(model);
        let ctx = eval.context();
        let mut out: Vec<String> = Vec::new();
        for shape in model.shapes() {
            let _ = stage.push(&ctx, shape, &mut |_: &Context<'_>, s: &Arc<Shape>| {
                let text = s.id().to_string();
                if s.id().namespace() == "ns" && !out.contains(&text) {
                    out.push(text);
                }
                ControlFlow::Continue(())
            });
        }
        out
    }

    /// Ids `stage` forwards from one shape
    pub fn forwarded_from(model: &Model, stage: &Stage, start: &str) -> Vec<String> {
        let eval = Evaluation::new(model);
        let ctx = eval.context();
        let mut out = Vec::new();
        let Some(shape) = model.get_shape(&id(start)) else {
            return out;
        };
        let _ = stage.push(&ctx, shape, &mut |_: &Context<'_>, s: &Arc<Shape>| {
            out.push(s.id().to_string());
            ControlFlow::Continue(())
        });
        out
    }
}
