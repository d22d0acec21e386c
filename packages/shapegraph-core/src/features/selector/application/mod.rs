// Application: selector facade and batch evaluation

mod batch;
mod selector;

pub use batch::SelectorBatch;
pub use selector::{Selector, SelectorMatch};
