// Stage: variables (`$name(selector)`, `$name`, `${name}`)

use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::sync::Arc;

use crate::features::selector::domain::context::Context;
use crate::features::selector::domain::stage::{Push, Receiver, SelectorList};
use crate::shared::models::Shape;

#[derive(Debug, Clone, PartialEq)]
pub enum VariableStage {
    /// `$name(selector)`: bind what `selector` yields from the current
    /// shape, then forward the current shape
    Capture { name: String, selector: SelectorList },
    /// `$name`: bind the current shape itself
    BindCurrent { name: String },
    /// `${name}`: forward every bound shape, in id order
    Get { name: String },
}

impl VariableStage {
    pub fn name(&self) -> &str {
        match self {
            VariableStage::Capture { name, .. }
            | VariableStage::BindCurrent { name }
            | VariableStage::Get { name } => name,
        }
    }

    pub fn selector(&self) -> Option<&SelectorList> {
        match self {
            VariableStage::Capture { selector, .. } => Some(selector),
            _ => None,
        }
    }
}

impl Push for VariableStage {
    fn push<'e>(
        &self,
        ctx: &Context<'e>,
        shape: &Arc<Shape>,
        next: &mut Receiver<'_, 'e>,
    ) -> ControlFlow<()> {
        match self {
            VariableStage::Capture { name, selector } => {
                let bound = selector.collect(ctx, shape);
                next(&ctx.bind(name, Rc::new(bound)), shape)
            }
            VariableStage::BindCurrent { name } => {
                let bound = BTreeSet::from([shape.id().clone()]);
                next(&ctx.bind(name, Rc::new(bound)), shape)
            }
            VariableStage::Get { name } => {
                // Not bound on this path: nothing to forward
                let Some(bound) = ctx.var(name).cloned() else {
                    return ControlFlow::Continue(());
                };
                let model = ctx.model();
                for id in bound.iter() {
                    if let Some(found) = model.get_shape(id) {
                        next(ctx, found)?;
                    }
                }
                ControlFlow::Continue(())
            }
        }
    }
}
