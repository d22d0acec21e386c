//! Feature modules - each follows the domain / infrastructure / application split
//!
//! - model/    - building and freezing the shape graph
//! - selector/ - compiling and evaluating selectors over a model

pub mod model;
pub mod selector;
