//! Parallel evaluation of many selectors against one model

use rayon::prelude::*;
use std::sync::Arc;

use tracing::debug;

use super::selector::Selector;
use crate::config::SelectorConfig;
use crate::features::model::Model;
use crate::features::selector::domain::SelectorResult;
use crate::shared::models::Shape;

/// Independent selectors evaluated together
///
/// The model is read-only after construction, so each selector runs on its
/// own rayon task. Results keep the order the selectors were added in.
#[derive(Debug, Clone, Default)]
pub struct SelectorBatch {
    selectors: Vec<Selector>,
}

impl SelectorBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every expression, failing on the first bad one
    pub fn parse_all<I, S>(texts: I) -> SelectorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selectors = texts
            .into_iter()
            .map(|text| Selector::parse(text.as_ref()))
            .collect::<SelectorResult<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    pub fn add(&mut self, selector: Selector) -> &mut Self {
        self.selectors.push(selector);
        self
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn select_all(&self, model: &Model) -> Vec<Vec<Arc<Shape>>> {
        self.select_all_with(model, &SelectorConfig::default())
    }

    pub fn select_all_with(&self, model: &Model, config: &SelectorConfig) -> Vec<Vec<Arc<Shape>>> {
        debug!(selectors = self.selectors.len(), "evaluating selector batch");
        self.selectors
            .par_iter()
            .map(|selector| selector.select_with(model, config))
            .collect()
    }
}

impl FromIterator<Selector> for SelectorBatch {
    fn from_iter<T: IntoIterator<Item = Selector>>(iter: T) -> Self {
        Self {
            selectors: iter.into_iter().collect(),
        }
    }
}
