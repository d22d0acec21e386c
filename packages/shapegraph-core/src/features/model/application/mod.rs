//! Model Application Layer
//!
//! `ModelBuilder` is the only way to obtain a `Model`.

mod model_builder;

pub use model_builder::ModelBuilder;
