//! Selector Feature - query language over the shape graph
//!
//! # Architecture
//! ```text
//! application/    Selector, SelectorBatch (entry points)
//!       ↓
//! infrastructure/ parser, evaluation driver
//!       ↓
//! domain/         stages, push protocol, evaluation context
//! ```
//!
//! # Usage
//! ```text
//! let selector = Selector::parse("structure > member > string[trait|sensitive]")?;
//! let shapes = selector.select(&model);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{Selector, SelectorBatch, SelectorMatch};
pub use domain::{SelectorError, SelectorResult, SemanticError, SyntaxError};
