//! Selector UseCase
//!
//! `Selector` is the entry point for compiling selector text and running it
//! against a frozen `Model`. Compilation errors surface here; evaluation
//! never fails.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::config::SelectorConfig;
use crate::features::model::infrastructure::prelude::trait_definition_id;
use crate::features::model::Model;
use crate::features::selector::domain::{SelectorError, SelectorList, SelectorResult, SemanticError};
use crate::features::selector::infrastructure::{parse_selector, Candidates, SelectorEvaluator};
use crate::shared::models::{Shape, ShapeId};

/// Compiled selector
#[derive(Debug, Clone)]
pub struct Selector {
    text: String,
    compiled: SelectorList,
}

/// A matched shape and the variables bound on the first path that reached it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorMatch {
    pub shape: ShapeId,
    pub variables: BTreeMap<String, Vec<ShapeId>>,
}

impl Selector {
    /// Compile selector text
    pub fn parse(text: &str) -> SelectorResult<Self> {
        let compiled = parse_selector(text)?;
        debug!(selector = text, alternatives = compiled.len(), "compiled selector");
        Ok(Self {
            text: text.to_string(),
            compiled,
        })
    }

    /// Compile, additionally requiring every referenced trait to be a trait
    /// definition in `model`
    pub fn compile_for_model(text: &str, model: &Model) -> SelectorResult<Self> {
        let selector = Self::parse(text)?;
        let marker = trait_definition_id();
        for trait_id in selector.compiled.trait_references() {
            let defined = model
                .get_shape(&trait_id)
                .is_some_and(|shape| shape.has_trait(&marker));
            if !defined {
                return Err(SemanticError::UnknownTrait(trait_id).into());
            }
        }
        Ok(selector)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn compiled(&self) -> &SelectorList {
        &self.compiled
    }

    /// Matching shapes in id order, default settings
    pub fn select(&self, model: &Model) -> Vec<Arc<Shape>> {
        self.select_with(model, &SelectorConfig::default())
    }

    pub fn select_with(&self, model: &Model, config: &SelectorConfig) -> Vec<Arc<Shape>> {
        SelectorEvaluator::new(model, config)
            .evaluate(&self.compiled, Candidates::Model, false)
            .into_iter()
            .map(|m| m.shape)
            .collect()
    }

    /// Matching shapes reachable from `starting` (ids not in the model are
    /// ignored)
    pub fn select_from(&self, model: &Model, starting: &[ShapeId]) -> Vec<Arc<Shape>> {
        let config = SelectorConfig::default();
        SelectorEvaluator::new(model, &config)
            .evaluate(&self.compiled, Candidates::Scoped(starting), false)
            .into_iter()
            .map(|m| m.shape)
            .collect()
    }

    /// Whether `shape` is among the results of a scan scoped to `shape`
    pub fn matches(&self, model: &Model, shape: &Shape) -> bool {
        self.select_from(model, std::slice::from_ref(shape.id()))
            .iter()
            .any(|found| found.id() == shape.id())
    }

    /// Matches with their captured variables, id order
    pub fn select_matches(&self, model: &Model) -> Vec<SelectorMatch> {
        self.select_matches_with(model, &SelectorConfig::default())
    }

    pub fn select_matches_with(&self, model: &Model, config: &SelectorConfig) -> Vec<SelectorMatch> {
        SelectorEvaluator::new(model, config)
            .evaluate(&self.compiled, Candidates::Model, true)
            .into_iter()
            .map(|m| SelectorMatch {
                shape: m.shape.id().clone(),
                variables: m.variables,
            })
            .collect()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
