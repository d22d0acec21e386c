// Infrastructure: top-level selector evaluation
//
// Each alternative of the selector is driven separately, in order. Its
// candidates are either the caller's starting shapes (scoped), the first
// stage's fast-path set (optimized), or every shape of the model (full
// scan); all three are visited in id order. Matches are deduplicated by id
// and keep the bindings of the first path that reached them.

use std::collections::BTreeMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::SelectorConfig;
use crate::features::model::Model;
use crate::features::selector::domain::{Context, Evaluation, Pipeline, Push, SelectorList};
use crate::shared::models::{Shape, ShapeId};

/// Where top-level candidates come from
#[derive(Debug, Clone, Copy)]
pub enum Candidates<'s> {
    /// Every shape, or the fast path when enabled
    Model,
    /// Only these shapes; never optimized
    Scoped(&'s [ShapeId]),
}

/// Matched shape with the bindings of its first path
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub shape: Arc<Shape>,
    pub variables: BTreeMap<String, Vec<ShapeId>>,
}

pub struct SelectorEvaluator<'m> {
    model: &'m Model,
    config: &'m SelectorConfig,
}

impl<'m> SelectorEvaluator<'m> {
    pub fn new(model: &'m Model, config: &'m SelectorConfig) -> Self {
        Self { model, config }
    }

    /// Evaluate `selector`, results in id order
    ///
    /// With a result limit the scan stops at the limit-th distinct match; a
    /// limit of zero yields nothing.
    pub fn evaluate(
        &self,
        selector: &SelectorList,
        candidates: Candidates<'_>,
        record_bindings: bool,
    ) -> Vec<RawMatch> {
        let limit = self.config.result_limit;
        if limit == Some(0) {
            debug!("result limit is zero, nothing to evaluate");
            return Vec::new();
        }

        let eval = Evaluation::new(self.model);
        let mut found: BTreeMap<ShapeId, RawMatch> = BTreeMap::new();

        let scoped: Vec<&Arc<Shape>> = match candidates {
            Candidates::Scoped(ids) => {
                let mut ids: Vec<&ShapeId> = ids.iter().collect();
                ids.sort();
                ids.dedup();
                ids.into_iter()
                    .filter_map(|id| self.model.get_shape(id))
                    .collect()
            }
            Candidates::Model => Vec::new(),
        };

        let mut sink = |ctx: &Context<'_>, shape: &Arc<Shape>| {
            if !found.contains_key(shape.id()) {
                let variables = if record_bindings {
                    ctx.bindings()
                } else {
                    BTreeMap::new()
                };
                found.insert(
                    shape.id().clone(),
                    RawMatch {
                        shape: shape.clone(),
                        variables,
                    },
                );
            }
            match limit {
                Some(limit) if found.len() >= limit => ControlFlow::Break(()),
                _ => ControlFlow::Continue(()),
            }
        };

        'pipelines: for (index, pipeline) in selector.pipelines().iter().enumerate() {
            let fast_path = match candidates {
                Candidates::Model if self.config.optimize => self.fast_path(pipeline),
                _ => None,
            };

            let shapes: Box<dyn Iterator<Item = &Arc<Shape>> + '_> = match (&candidates, &fast_path) {
                (Candidates::Scoped(_), _) => Box::new(scoped.iter().copied()),
                (Candidates::Model, Some(ids)) => {
                    Box::new(ids.iter().filter_map(|id| self.model.get_shape(id)))
                }
                (Candidates::Model, None) => Box::new(self.model.shapes()),
            };

            debug!(
                pipeline = index,
                fast_path = fast_path.is_some(),
                candidates = fast_path.as_ref().map(Vec::len),
                scoped = matches!(candidates, Candidates::Scoped(_)),
                "evaluating selector"
            );

            for shape in shapes {
                trace!(shape = %shape.id(), "push");
                let ctx = eval.context();
                if pipeline.push(&ctx, shape, &mut sink).is_break() {
                    break 'pipelines;
                }
            }
        }

        debug!(results = found.len(), "selector evaluated");
        found.into_values().collect()
    }

    fn fast_path(&self, pipeline: &Pipeline) -> Option<Vec<ShapeId>> {
        pipeline.first().and_then(|stage| stage.optimize(self.model))
    }
}
