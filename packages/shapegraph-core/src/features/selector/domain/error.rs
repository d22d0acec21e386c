//! Selector compilation errors
//!
//! Both kinds are raised before any evaluation runs; evaluation itself never
//! fails.

use thiserror::Error;

use crate::shared::models::ShapeId;

/// Malformed selector text
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Syntax error at position {position}: {message} (in `{expression}`)")]
pub struct SyntaxError {
    /// Byte offset into `expression`
    pub position: usize,
    pub message: String,
    pub expression: String,
}

/// Well-formed selector that references something that does not exist
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Unknown shape type `{0}`")]
    UnknownShapeType(String),

    #[error("Unknown relationship `{0}`")]
    UnknownRelationship(String),

    #[error("Unknown function `:{0}`")]
    UnknownFunction(String),

    #[error("Unknown attribute `{0}`")]
    UnknownAttribute(String),

    #[error("Variable `${0}` is referenced before it is captured")]
    UnboundVariable(String),

    #[error("Trait `{0}` is not defined in the model")]
    UnknownTrait(ShapeId),

    #[error("`:{function}` expects {expected} selector(s), found {found}")]
    InvalidArity {
        function: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

pub type SelectorResult<T> = Result<T, SelectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let err = SelectorError::from(SyntaxError {
            position: 3,
            message: "expected `]`".to_string(),
            expression: "[id".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Syntax error at position 3: expected `]` (in `[id`)"
        );
    }

    #[test]
    fn test_semantic_error_message() {
        let err = SelectorError::from(SemanticError::UnboundVariable("a".to_string()));
        assert_eq!(err.to_string(), "Variable `$a` is referenced before it is captured");
    }
}
