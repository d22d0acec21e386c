// Domain: compiled selectors and their push-based evaluation

pub mod context;
pub mod error;
pub mod stage;
pub mod stages;

pub use context::{Context, Evaluation, ShapeSet};
pub use error::{SelectorError, SelectorResult, SemanticError, SyntaxError};
pub use stage::{Pipeline, Push, Receiver, SelectorList, Stage};
