// Domain: push-based stage chain
//
// Each stage receives a candidate shape and the rest of the pipeline as a
// callable. It forwards zero or more shapes to that callable and returns
// `ControlFlow::Break` only to abort the whole scan; a filtered-out shape is
// simply `Continue` without forwarding.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::context::Context;
use super::stages::{AttributeFilter, FunctionStage, NeighborStep, TypeFilter, VariableStage};
use crate::features::model::Model;
use crate::shared::models::{Shape, ShapeId};

/// Rest of the pipeline
pub type Receiver<'r, 'e> = dyn FnMut(&Context<'e>, &Arc<Shape>) -> ControlFlow<()> + 'r;

pub trait Push: fmt::Debug + Send + Sync {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()>;

    /// Candidate set, in id order, equal to the shapes this stage forwards
    /// when each shape of the model is pushed into it on its own
    ///
    /// Only consulted for the first stage of a top-level pipeline.
    fn optimize(&self, _model: &Model) -> Option<Vec<ShapeId>> {
        None
    }
}

/// One compiled stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Type(TypeFilter),
    Attribute(AttributeFilter),
    Neighbor(NeighborStep),
    Function(FunctionStage),
    Variable(VariableStage),
}

impl Push for Stage {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        match self {
            Stage::Type(stage) => stage.push(ctx, shape, next),
            Stage::Attribute(stage) => stage.push(ctx, shape, next),
            Stage::Neighbor(stage) => stage.push(ctx, shape, next),
            Stage::Function(stage) => stage.push(ctx, shape, next),
            Stage::Variable(stage) => stage.push(ctx, shape, next),
        }
    }

    fn optimize(&self, model: &Model) -> Option<Vec<ShapeId>> {
        match self {
            Stage::Type(stage) => stage.optimize(model),
            Stage::Attribute(stage) => stage.optimize(model),
            Stage::Neighbor(stage) => stage.optimize(model),
            Stage::Function(stage) => stage.optimize(model),
            Stage::Variable(stage) => stage.optimize(model),
        }
    }
}

/// Stages applied in sequence (intersection by chaining)
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn first(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        sink: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        push_chain(&self.stages, ctx, shape, sink)
    }
}

fn push_chain<'e>(
    stages: &[Stage],
    ctx: &Context<'e>,
    shape: &Arc<Shape>,
    sink: &mut Receiver<'_, 'e>,
) -> ControlFlow<()> {
    match stages.split_first() {
        None => sink(ctx, shape),
        Some((stage, rest)) => stage.push(
            ctx,
            shape,
            &mut |ctx: &Context<'e>, shape: &Arc<Shape>| push_chain(rest, ctx, shape, &mut *sink),
        ),
    }
}

/// Comma-separated alternatives (union)
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pipelines: Vec<Pipeline>,
}

impl SelectorList {
    pub fn new(pipelines: Vec<Pipeline>) -> Self {
        Self { pipelines }
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Push `shape` through every alternative, in order
    pub fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        sink: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        for pipeline in &self.pipelines {
            pipeline.push(ctx, shape, sink)?;
        }
        ControlFlow::Continue(())
    }

    /// Every shape the alternatives produce from `shape`
    pub fn collect(&self, ctx: &Context<'_>, shape: &Arc<Shape>) -> BTreeSet<ShapeId> {
        let mut found = BTreeSet::new();
        let _ = self.push(ctx, shape, &mut |_: &Context<'_>, s: &Arc<Shape>| {
            found.insert(s.id().clone());
            ControlFlow::Continue(())
        });
        found
    }

    /// Whether the alternatives produce anything from `shape` (stops early)
    pub fn any(&self, ctx: &Context<'_>, shape: &Arc<Shape>) -> bool {
        self.push(ctx, shape, &mut |_: &Context<'_>, _: &Arc<Shape>| ControlFlow::Break(()))
            .is_break()
    }

    /// Trait ids referenced anywhere in the selector, nested ones included
    pub fn trait_references(&self) -> Vec<ShapeId> {
        let mut found = Vec::new();
        self.visit_traits(&mut found);
        found.sort();
        found.dedup();
        found
    }

    fn visit_traits(&self, found: &mut Vec<ShapeId>) {
        for pipeline in &self.pipelines {
            for stage in pipeline.stages() {
                match stage {
                    Stage::Attribute(filter) => {
                        if let Some(id) = filter.trait_id() {
                            found.push(id.clone());
                        }
                    }
                    Stage::Function(function) => {
                        for arg in function.args() {
                            arg.visit_traits(found);
                        }
                    }
                    Stage::Variable(variable) => {
                        if let Some(selector) = variable.selector() {
                            selector.visit_traits(found);
                        }
                    }
                    Stage::Type(_) | Stage::Neighbor(_) => {}
                }
            }
        }
    }
}
