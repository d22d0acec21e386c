// Infrastructure: selector text parser and top-level evaluation driver

pub mod evaluator;
pub mod parser;

pub use evaluator::{Candidates, RawMatch, SelectorEvaluator};
pub use parser::parse_selector;
