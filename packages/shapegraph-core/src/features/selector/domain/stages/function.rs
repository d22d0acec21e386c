// Stage: functions (`:not`, `:is`/`:each`, `:test`, `:in`, `:root`)
//
// Arguments are selector lists evaluated from the current shape with the
// current bindings visible. Bindings made inside an argument only flow
// downstream through `:is`, which forwards the argument's own results.

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::features::selector::domain::context::Context;
use crate::features::selector::domain::stage::{Push, Receiver, SelectorList};
use crate::shared::models::{Shape, ShapeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Forward the shape when no argument yields anything
    Not,
    /// Forward every shape the arguments yield (`:each` is an alias)
    Is,
    /// Forward the shape when any argument yields something
    Test,
    /// Forward the shape when it is among the arguments' results
    In,
    /// Forward the results of the argument evaluated over the whole model
    Root,
}

impl FunctionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "not" => Some(FunctionKind::Not),
            "is" | "each" => Some(FunctionKind::Is),
            "test" => Some(FunctionKind::Test),
            "in" => Some(FunctionKind::In),
            "root" => Some(FunctionKind::Root),
            _ => None,
        }
    }

    /// Required number of comma-separated arguments, if fixed
    pub fn arity(&self) -> Option<usize> {
        match self {
            FunctionKind::In | FunctionKind::Root => Some(1),
            FunctionKind::Not | FunctionKind::Is | FunctionKind::Test => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionStage {
    kind: FunctionKind,
    args: Vec<SelectorList>,
}

impl FunctionStage {
    /// `args` are the comma-separated arguments, each a single alternative
    pub fn new(kind: FunctionKind, args: Vec<SelectorList>) -> Self {
        Self { kind, args }
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn args(&self) -> &[SelectorList] {
        &self.args
    }

    fn any_arg(&self, ctx: &Context<'_>, shape: &Arc<Shape>) -> bool {
        self.args.iter().any(|arg| arg.any(ctx, shape))
    }

    /// `:root` results, computed once per evaluation
    fn root_results(&self, ctx: &Context<'_>) -> Rc<BTreeSet<ShapeId>> {
        let eval = ctx.evaluation();
        let key = self as *const Self as usize;
        if let Some(cached) = eval.cached_root(key) {
            return cached;
        }

        let fresh = eval.context();
        let mut found = BTreeSet::new();
        for shape in ctx.model().shapes() {
            for arg in &self.args {
                found.extend(arg.collect(&fresh, shape));
            }
        }
        trace!(results = found.len(), "evaluated :root");

        let found = Rc::new(found);
        eval.cache_root(key, found.clone());
        found
    }
}

impl Push for FunctionStage {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        match self.kind {
            FunctionKind::Not => {
                if self.any_arg(ctx, shape) {
                    ControlFlow::Continue(())
                } else {
                    next(ctx, shape)
                }
            }
            FunctionKind::Test => {
                if self.any_arg(ctx, shape) {
                    next(ctx, shape)
                } else {
                    ControlFlow::Continue(())
                }
            }
            FunctionKind::Is => {
                for arg in &self.args {
                    arg.push(ctx, shape, next)?;
                }
                ControlFlow::Continue(())
            }
            FunctionKind::In => {
                let found = self
                    .args
                    .iter()
                    .any(|arg| arg.collect(ctx, shape).contains(shape.id()));
                if found {
                    next(ctx, shape)
                } else {
                    ControlFlow::Continue(())
                }
            }
            FunctionKind::Root => {
                let model = ctx.model();
                for id in self.root_results(ctx).iter() {
                    if let Some(result) = model.get_shape(id) {
                        next(ctx, result)?;
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::model::RelationshipType;
    use crate::features::selector::domain::stage::{Pipeline, Stage};
    use crate::features::selector::domain::stages::testing::{fixture_model, forwarded};
    use crate::features::selector::domain::stages::{NeighborDirection, NeighborStep, TypeFilter};
    use crate::shared::models::ShapeType;

    fn single(stages: Vec<Stage>) -> SelectorList {
        SelectorList::new(vec![Pipeline::new(stages)])
    }

    fn type_stage(shape_type: ShapeType) -> Stage {
        Stage::Type(TypeFilter::Exact(shape_type))
    }

    fn function(kind: FunctionKind, args: Vec<SelectorList>) -> Stage {
        Stage::Function(FunctionStage::new(kind, args))
    }

    #[test]
    fn test_not_and_test_are_complements() {
        let model = fixture_model();
        let has_members = single(vec![Stage::Neighbor(NeighborStep::new(
            NeighborDirection::Forward,
            Some(vec![RelationshipType::Member]),
        ))]);

        let with = forwarded(&model, &function(FunctionKind::Test, vec![has_members.clone()]));
        let without = forwarded(&model, &function(FunctionKind::Not, vec![has_members]));

        assert!(with.contains(&"ns#Foo".to_string()));
        assert!(!with.contains(&"ns#NotFound".to_string()));
        assert!(without.contains(&"ns#NotFound".to_string()));
        assert!(with.iter().all(|id| !without.contains(id)));
    }

    #[test]
    fn test_is_forwards_union() {
        let model = fixture_model();
        let stage = function(
            FunctionKind::Is,
            vec![
                single(vec![type_stage(ShapeType::Service)]),
                single(vec![type_stage(ShapeType::Resource)]),
            ],
        );
        assert_eq!(forwarded(&model, &stage), vec!["ns#Svc", "ns#Widget"]);
    }

    #[test]
    fn test_in_with_root() {
        let model = fixture_model();
        // Shapes targeted by some member
        let targets = single(vec![
            Stage::Type(TypeFilter::Exact(ShapeType::Member)),
            Stage::Neighbor(NeighborStep::new(NeighborDirection::Forward, None)),
        ]);
        let root = single(vec![function(FunctionKind::Root, vec![targets])]);
        let stage = function(FunctionKind::In, vec![root]);

        let ids = forwarded(&model, &stage);
        assert_eq!(ids, vec!["ns#Str", "ns#WidgetId"]);
    }

    #[test]
    fn test_arity() {
        assert_eq!(FunctionKind::from_name("each"), Some(FunctionKind::Is));
        assert_eq!(FunctionKind::In.arity(), Some(1));
        assert_eq!(FunctionKind::Not.arity(), None);
        assert_eq!(FunctionKind::from_name("topdown"), None);
    }
}
