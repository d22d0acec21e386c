//! Shapes: the nodes of the schema graph
//!
//! `ShapeKind` is closed; each variant carries only the data meaningful to
//! it. Aggregates own their (already mixin-resolved) member shapes, which
//! the model also indexes individually by member id.

use std::sync::Arc;

use super::shape_id::ShapeId;
use super::shape_type::ShapeType;
use super::trait_value::{Trait, TraitMap};

/// A node in the shape graph
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    traits: TraitMap,
    mixins: Vec<ShapeId>,
}

/// Variant payload of a shape
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
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
    List(Members),
    Set(Members),
    Map(Members),
    Structure(Members),
    Union(Members),
    Member(MemberShape),
    Service(ServiceShape),
    Resource(ResourceShape),
    Operation(OperationShape),
}

impl ShapeKind {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            ShapeKind::Blob => ShapeType::Blob,
            ShapeKind::Boolean => ShapeType::Boolean,
            ShapeKind::String => ShapeType::String,
            ShapeKind::Timestamp => ShapeType::Timestamp,
            ShapeKind::Byte => ShapeType::Byte,
            ShapeKind::Short => ShapeType::Short,
            ShapeKind::Integer => ShapeType::Integer,
            ShapeKind::Long => ShapeType::Long,
            ShapeKind::Float => ShapeType::Float,
            ShapeKind::Double => ShapeType::Double,
            ShapeKind::BigInteger => ShapeType::BigInteger,
            ShapeKind::BigDecimal => ShapeType::BigDecimal,
            ShapeKind::Document => ShapeType::Document,
            ShapeKind::List(_) => ShapeType::List,
            ShapeKind::Set(_) => ShapeType::Set,
            ShapeKind::Map(_) => ShapeType::Map,
            ShapeKind::Structure(_) => ShapeType::Structure,
            ShapeKind::Union(_) => ShapeType::Union,
            ShapeKind::Member(_) => ShapeType::Member,
            ShapeKind::Service(_) => ShapeType::Service,
            ShapeKind::Resource(_) => ShapeType::Resource,
            ShapeKind::Operation(_) => ShapeType::Operation,
        }
    }

    fn members(&self) -> Option<&Members> {
        match self {
            ShapeKind::List(members)
            | ShapeKind::Set(members)
            | ShapeKind::Map(members)
            | ShapeKind::Structure(members)
            | ShapeKind::Union(members) => Some(members),
            _ => None,
        }
    }
}

/// Ordered member shapes of an aggregate, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members(Vec<Arc<Shape>>);

impl Members {
    pub(crate) fn new(members: Vec<Arc<Shape>>) -> Self {
        Self(members)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Shape>> {
        self.0.iter().find(|m| m.id.member() == Some(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(|m| m.id.member())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Shape>> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Arc<Shape>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Member payload: back-reference to the container plus the target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberShape {
    pub container: ShapeId,
    pub target: ShapeId,
}

/// Ordered name → shape id mapping (resource identifiers and properties)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedTargets(Vec<(String, ShapeId)>);

impl NamedTargets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the original position on replacement
    pub fn insert(&mut self, name: impl Into<String>, target: ShapeId) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = target,
            None => self.0.push((name, target)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ShapeId> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn targets(&self) -> impl Iterator<Item = &ShapeId> {
        self.0.iter().map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ShapeId)> {
        self.0.iter().map(|(n, t)| (n.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resource payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceShape {
    pub identifiers: NamedTargets,
    pub properties: NamedTargets,
    pub create: Option<ShapeId>,
    pub put: Option<ShapeId>,
    pub read: Option<ShapeId>,
    pub update: Option<ShapeId>,
    pub delete: Option<ShapeId>,
    pub list: Option<ShapeId>,
    pub operations: Vec<ShapeId>,
    pub collection_operations: Vec<ShapeId>,
    pub resources: Vec<ShapeId>,
}

/// Operation payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationShape {
    pub input: Option<ShapeId>,
    pub output: Option<ShapeId>,
    pub errors: Vec<ShapeId>,
}

/// Service payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceShape {
    pub version: String,
    pub operations: Vec<ShapeId>,
    pub resources: Vec<ShapeId>,
    pub errors: Vec<ShapeId>,
}

impl Shape {
    /// Frozen shape; only the model builder assembles these
    pub(crate) fn new(id: ShapeId, kind: ShapeKind, traits: TraitMap, mixins: Vec<ShapeId>) -> Self {
        Self {
            id,
            kind,
            traits,
            mixins,
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn shape_type(&self) -> ShapeType {
        self.kind.shape_type()
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Effective traits (mixin traits merged under local ones)
    pub fn traits(&self) -> &TraitMap {
        &self.traits
    }

    pub fn get_trait(&self, id: &ShapeId) -> Option<&Trait> {
        self.traits.get(id)
    }

    pub fn has_trait(&self, id: &ShapeId) -> bool {
        self.traits.contains(id)
    }

    /// Directly declared mixins, in declaration order
    pub fn mixins(&self) -> &[ShapeId] {
        &self.mixins
    }

    /// Effective members; empty for non-aggregates
    pub fn members(&self) -> &[Arc<Shape>] {
        self.kind.members().map(Members::as_slice).unwrap_or(&[])
    }

    pub fn member(&self, name: &str) -> Option<&Arc<Shape>> {
        self.kind.members().and_then(|m| m.get(name))
    }

    pub fn as_member(&self) -> Option<&MemberShape> {
        match &self.kind {
            ShapeKind::Member(member) => Some(member),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<&ResourceShape> {
        match &self.kind {
            ShapeKind::Resource(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationShape> {
        match &self.kind {
            ShapeKind::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceShape> {
        match &self.kind {
            ShapeKind::Service(service) => Some(service),
            _ => None,
        }
    }

    /// Target of a member shape
    pub fn target(&self) -> Option<&ShapeId> {
        self.as_member().map(|m| &m.target)
    }
}
