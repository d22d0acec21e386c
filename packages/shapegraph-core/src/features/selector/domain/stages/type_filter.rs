// Stage: shape type filter (`structure`, `list`, `number`, `*`, ...)

use std::ops::ControlFlow;
use std::sync::Arc;

use crate::features::model::Model;
use crate::features::selector::domain::context::Context;
use crate::features::selector::domain::stage::{Push, Receiver};
use crate::shared::models::{Shape, ShapeId, ShapeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    /// `*`
    Any,
    /// A concrete type; `list` and `set` match each other
    Exact(ShapeType),
    /// `number`
    Number,
    /// `simpleType`
    SimpleType,
    /// `collection` (list and set)
    Collection,
}

impl TypeFilter {
    /// Type names and categories accepted in selector text
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "*" => Some(TypeFilter::Any),
            "number" => Some(TypeFilter::Number),
            "simpleType" => Some(TypeFilter::SimpleType),
            "collection" => Some(TypeFilter::Collection),
            other => other.parse().ok().map(TypeFilter::Exact),
        }
    }

    pub fn accepts(&self, shape_type: ShapeType) -> bool {
        match self {
            TypeFilter::Any => true,
            TypeFilter::Exact(expected) => expected.matches(shape_type),
            TypeFilter::Number => shape_type.is_number(),
            TypeFilter::SimpleType => shape_type.is_simple(),
            TypeFilter::Collection => shape_type.is_collection(),
        }
    }
}

impl Push for TypeFilter {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        if self.accepts(shape.shape_type()) {
            next(ctx, shape)
        } else {
            ControlFlow::Continue(())
        }
    }

    /// Served from the type index; `*` has nothing better than a full scan
    fn optimize(&self, model: &Model) -> Option<Vec<ShapeId>> {
        if *self == TypeFilter::Any {
            return None;
        }

        let mut ids: Vec<ShapeId> = ShapeType::ALL
            .iter()
            .filter(|t| self.accepts(**t))
            .flat_map(|t| model.indexes().shapes_of_type(*t).iter().cloned())
            .collect();
        ids.sort();
        Some(ids)
    }
}
