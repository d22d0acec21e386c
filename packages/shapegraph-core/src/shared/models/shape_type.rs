//! Shape type tags
//!
//! `ShapeType` is the variant tag of a shape without its payload. It is the
//! key of the model's type index and the unit a type selector matches on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Variant tag of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    Blob,
    Boolean,
    String,
    Timestamp,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Document,
    List,
    /// Deprecated synonym of `List`
    Set,
    Map,
    Structure,
    Union,
    Member,
    Service,
    Resource,
    Operation,
}

impl ShapeType {
    pub const ALL: [ShapeType; 22] = [
        ShapeType::Blob,
        ShapeType::Boolean,
        ShapeType::String,
        ShapeType::Timestamp,
        ShapeType::Byte,
        ShapeType::Short,
        ShapeType::Integer,
        ShapeType::Long,
        ShapeType::Float,
        ShapeType::Double,
        ShapeType::BigInteger,
        ShapeType::BigDecimal,
        ShapeType::Document,
        ShapeType::List,
        ShapeType::Set,
        ShapeType::Map,
        ShapeType::Structure,
        ShapeType::Union,
        ShapeType::Member,
        ShapeType::Service,
        ShapeType::Resource,
        ShapeType::Operation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::Long => "long",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Document => "document",
            ShapeType::List => "list",
            ShapeType::Set => "set",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
            ShapeType::Member => "member",
            ShapeType::Service => "service",
            ShapeType::Resource => "resource",
            ShapeType::Operation => "operation",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            ShapeType::Byte
                | ShapeType::Short
                | ShapeType::Integer
                | ShapeType::Long
                | ShapeType::Float
                | ShapeType::Double
                | ShapeType::BigInteger
                | ShapeType::BigDecimal
        )
    }

    pub fn is_simple(&self) -> bool {
        self.is_number()
            || matches!(
                self,
                ShapeType::Blob
                    | ShapeType::Boolean
                    | ShapeType::String
                    | ShapeType::Timestamp
                    | ShapeType::Document
            )
    }

    /// `list` and its legacy synonym `set`
    pub fn is_collection(&self) -> bool {
        matches!(self, ShapeType::List | ShapeType::Set)
    }

    /// Type equality with the list/set equivalence applied
    pub fn matches(&self, other: ShapeType) -> bool {
        *self == other || (self.is_collection() && other.is_collection())
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeType::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("Unknown shape type: {s}"))
    }
}
