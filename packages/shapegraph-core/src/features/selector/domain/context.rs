// Domain: evaluation context threaded through the stage chain
//
// A Context is cheap to clone: variable bindings are shared sets, and a new
// binding produces a new Context. A branch therefore sees bindings made
// earlier on its own path and never those of a sibling branch.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use ahash::AHashMap;

use crate::features::model::Model;
use crate::shared::models::ShapeId;

/// Set of shape ids, iterated in id order
pub type ShapeSet = Rc<BTreeSet<ShapeId>>;

/// Per-evaluation state shared by every path: the model and `:root` results
#[derive(Debug)]
pub struct Evaluation<'m> {
    model: &'m Model,
    roots: RefCell<AHashMap<usize, ShapeSet>>,
}

impl<'m> Evaluation<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            roots: RefCell::new(AHashMap::new()),
        }
    }

    pub fn model(&self) -> &'m Model {
        self.model
    }

    /// Fresh context with no bindings
    pub fn context(&self) -> Context<'_> {
        Context {
            eval: self,
            vars: BTreeMap::new(),
        }
    }

    pub(crate) fn cached_root(&self, key: usize) -> Option<ShapeSet> {
        self.roots.borrow().get(&key).cloned()
    }

    pub(crate) fn cache_root(&self, key: usize, shapes: ShapeSet) {
        self.roots.borrow_mut().insert(key, shapes);
    }
}

/// Bindings visible on the current path
#[derive(Debug, Clone)]
pub struct Context<'e> {
    eval: &'e Evaluation<'e>,
    vars: BTreeMap<String, ShapeSet>,
}

impl<'e> Context<'e> {
    pub fn model(&self) -> &'e Model {
        self.eval.model()
    }

    pub fn evaluation(&self) -> &'e Evaluation<'e> {
        self.eval
    }

    pub fn var(&self, name: &str) -> Option<&ShapeSet> {
        self.vars.get(name)
    }

    /// Copy of this context with `name` (re)bound
    pub fn bind(&self, name: &str, shapes: ShapeSet) -> Self {
        let mut vars = self.vars.clone();
        vars.insert(name.to_string(), shapes);
        Self {
            eval: self.eval,
            vars,
        }
    }

    /// Owned snapshot of the bindings, for reporting
    pub fn bindings(&self) -> BTreeMap<String, Vec<ShapeId>> {
        self.vars
            .iter()
            .map(|(name, shapes)| (name.clone(), shapes.iter().cloned().collect()))
            .collect()
    }
}
