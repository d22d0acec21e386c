// Domain: Relationship - directed edges between shapes
//
// Relationships are derived from shape payloads once, when the model is
// built, and indexed in both directions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::models::ShapeId;

/// Kind of relationship between two shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipType {
    /// Aggregate -> member
    Member,
    /// Member -> target (no selector label; only `>` traverses it)
    MemberTarget,
    /// Resource -> identifier target
    Identifier,
    /// Resource -> property target
    Property,
    /// Resource/service -> bound child resource
    Resource,
    /// Resource/service -> bound operation
    Operation,
    /// Resource -> collection-bound operation
    CollectionOperation,
    Create,
    Put,
    Read,
    Update,
    Delete,
    List,
    /// Operation -> input structure
    Input,
    /// Operation -> output structure
    Output,
    /// Operation/service -> error structure
    Error,
    /// Shape -> each declared mixin
    Mixin,
    /// Shape -> each applied trait's definition shape
    Trait,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 18] = [
        RelationshipType::Member,
        RelationshipType::MemberTarget,
        RelationshipType::Identifier,
        RelationshipType::Property,
        RelationshipType::Resource,
        RelationshipType::Operation,
        RelationshipType::CollectionOperation,
        RelationshipType::Create,
        RelationshipType::Put,
        RelationshipType::Read,
        RelationshipType::Update,
        RelationshipType::Delete,
        RelationshipType::List,
        RelationshipType::Input,
        RelationshipType::Output,
        RelationshipType::Error,
        RelationshipType::Mixin,
        RelationshipType::Trait,
    ];

    /// Name used in `-[label]->` selectors
    pub fn selector_label(&self) -> Option<&'static str> {
        match self {
            RelationshipType::Member => Some("member"),
            RelationshipType::MemberTarget => None,
            RelationshipType::Identifier => Some("identifier"),
            RelationshipType::Property => Some("property"),
            RelationshipType::Resource => Some("resource"),
            RelationshipType::Operation => Some("operation"),
            RelationshipType::CollectionOperation => Some("collectionOperation"),
            RelationshipType::Create => Some("create"),
            RelationshipType::Put => Some("put"),
            RelationshipType::Read => Some("read"),
            RelationshipType::Update => Some("update"),
            RelationshipType::Delete => Some("delete"),
            RelationshipType::List => Some("list"),
            RelationshipType::Input => Some("input"),
            RelationshipType::Output => Some("output"),
            RelationshipType::Error => Some("error"),
            RelationshipType::Mixin => Some("mixin"),
            RelationshipType::Trait => Some("trait"),
        }
    }

    /// Whether the unqualified `>` / `<` / `~>` neighbor selectors follow it
    pub fn is_default_traversal(&self) -> bool {
        !matches!(self, RelationshipType::Trait)
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.selector_label() {
            Some(label) => f.write_str(label),
            None => f.write_str("member_target"),
        }
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .iter()
            .copied()
            .find(|rel| rel.selector_label() == Some(label))
            .ok_or_else(|| format!("Unknown relationship: {label}"))
    }
}

/// Directed edge: `source -[kind]-> neighbor`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source: ShapeId,
    pub kind: RelationshipType,
    pub neighbor: ShapeId,
}

impl Relationship {
    pub fn new(source: ShapeId, kind: RelationshipType, neighbor: ShapeId) -> Self {
        Self {
            source,
            kind,
            neighbor,
        }
    }
}
