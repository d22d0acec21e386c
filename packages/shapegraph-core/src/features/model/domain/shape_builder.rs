//! Declared (unresolved) shapes
//!
//! A `ShapeBuilder` records what a shape declares locally: its members,
//! traits, mixins, and service-oriented bindings. Mixin resolution turns
//! these declarations into frozen `Shape`s when the model is built.
//! Misuse (e.g. adding an identifier to a structure) is recorded and
//! reported by `ModelBuilder::build`.

use serde_json::Value;

use crate::shared::models::{
    OperationShape, ResourceShape, ServiceShape, ShapeId, ShapeType, Trait, TraitMap,
};

/// Locally declared member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDeclaration {
    pub name: String,
    pub target: ShapeId,
    pub traits: TraitMap,
}

/// Payload declared by service-oriented shapes
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeclaredPayload {
    None,
    Resource(ResourceShape),
    Operation(OperationShape),
    Service(ServiceShape),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBuilder {
    pub(crate) id: ShapeId,
    pub(crate) shape_type: ShapeType,
    pub(crate) members: Vec<MemberDeclaration>,
    pub(crate) traits: TraitMap,
    pub(crate) mixins: Vec<ShapeId>,
    pub(crate) payload: DeclaredPayload,
    pub(crate) misuse: Vec<String>,
}

impl ShapeBuilder {
    pub fn new(shape_type: ShapeType, id: ShapeId) -> Self {
        let payload = match shape_type {
            ShapeType::Resource => DeclaredPayload::Resource(ResourceShape::default()),
            ShapeType::Operation => DeclaredPayload::Operation(OperationShape::default()),
            ShapeType::Service => DeclaredPayload::Service(ServiceShape::default()),
            _ => DeclaredPayload::None,
        };
        let mut misuse = Vec::new();
        if shape_type == ShapeType::Member {
            misuse.push("members are declared through their container".to_string());
        }
        Self {
            id,
            shape_type,
            members: Vec::new(),
            traits: TraitMap::new(),
            mixins: Vec::new(),
            payload,
            misuse,
        }
    }

    pub fn structure(id: ShapeId) -> Self {
        Self::new(ShapeType::Structure, id)
    }

    pub fn union(id: ShapeId) -> Self {
        Self::new(ShapeType::Union, id)
    }

    pub fn list(id: ShapeId, member_target: ShapeId) -> Self {
        Self::new(ShapeType::List, id).member("member", member_target)
    }

    /// Legacy `set`; behaves as a list everywhere except its type tag
    pub fn set(id: ShapeId, member_target: ShapeId) -> Self {
        Self::new(ShapeType::Set, id).member("member", member_target)
    }

    pub fn map(id: ShapeId, key: ShapeId, value: ShapeId) -> Self {
        Self::new(ShapeType::Map, id)
            .member("key", key)
            .member("value", value)
    }

    /// Simple (scalar) shape such as `string` or `integer`
    pub fn simple(shape_type: ShapeType, id: ShapeId) -> Self {
        let mut builder = Self::new(shape_type, id);
        if !shape_type.is_simple() {
            builder
                .misuse
                .push(format!("`{shape_type}` is not a simple type"));
        }
        builder
    }

    pub fn string(id: ShapeId) -> Self {
        Self::simple(ShapeType::String, id)
    }

    pub fn resource(id: ShapeId) -> Self {
        Self::new(ShapeType::Resource, id)
    }

    pub fn operation(id: ShapeId) -> Self {
        Self::new(ShapeType::Operation, id)
    }

    pub fn service(id: ShapeId) -> Self {
        Self::new(ShapeType::Service, id)
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    // ------------------------------------------------------------------
    // Members, traits, mixins
    // ------------------------------------------------------------------

    pub fn member(self, name: impl Into<String>, target: ShapeId) -> Self {
        self.member_with_traits(name, target, std::iter::empty())
    }

    pub fn member_with_traits(
        mut self,
        name: impl Into<String>,
        target: ShapeId,
        traits: impl IntoIterator<Item = Trait>,
    ) -> Self {
        let name = name.into();
        if !self.has_members() {
            self.misuse
                .push(format!("`{}` shapes cannot declare member `{name}`", self.shape_type));
            return self;
        }
        self.members.push(MemberDeclaration {
            name,
            target,
            traits: traits.into_iter().collect(),
        });
        self
    }

    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.insert(t);
        self
    }

    pub fn with_trait_value(self, trait_id: ShapeId, value: Value) -> Self {
        self.with_trait(Trait::new(trait_id, value))
    }

    /// Apply an annotation trait (empty object value)
    pub fn annotate(self, trait_id: ShapeId) -> Self {
        self.with_trait(Trait::annotation(trait_id))
    }

    pub fn mixin(mut self, mixin: ShapeId) -> Self {
        self.mixins.push(mixin);
        self
    }

    // ------------------------------------------------------------------
    // Resource bindings
    // ------------------------------------------------------------------

    pub fn identifier(self, name: impl Into<String>, target: ShapeId) -> Self {
        let name = name.into();
        self.with_resource("identifier", |r| r.identifiers.insert(name, target))
    }

    pub fn property(self, name: impl Into<String>, target: ShapeId) -> Self {
        let name = name.into();
        self.with_resource("property", |r| r.properties.insert(name, target))
    }

    pub fn create(self, operation: ShapeId) -> Self {
        self.with_resource("create", |r| r.create = Some(operation))
    }

    pub fn put(self, operation: ShapeId) -> Self {
        self.with_resource("put", |r| r.put = Some(operation))
    }

    pub fn read(self, operation: ShapeId) -> Self {
        self.with_resource("read", |r| r.read = Some(operation))
    }

    pub fn update(self, operation: ShapeId) -> Self {
        self.with_resource("update", |r| r.update = Some(operation))
    }

    pub fn delete(self, operation: ShapeId) -> Self {
        self.with_resource("delete", |r| r.delete = Some(operation))
    }

    pub fn list_operation(self, operation: ShapeId) -> Self {
        self.with_resource("list", |r| r.list = Some(operation))
    }

    pub fn collection_operation(self, operation: ShapeId) -> Self {
        self.with_resource("collectionOperation", |r| {
            r.collection_operations.push(operation)
        })
    }

    /// Bind an operation to a resource or service
    pub fn bind_operation(mut self, operation: ShapeId) -> Self {
        match &mut self.payload {
            DeclaredPayload::Resource(r) => r.operations.push(operation),
            DeclaredPayload::Service(s) => s.operations.push(operation),
            _ => self.misuse.push(format!(
                "`{}` shapes cannot bind operation `{operation}`",
                self.shape_type
            )),
        }
        self
    }

    /// Bind a child resource to a resource or service
    pub fn bind_resource(mut self, resource: ShapeId) -> Self {
        match &mut self.payload {
            DeclaredPayload::Resource(r) => r.resources.push(resource),
            DeclaredPayload::Service(s) => s.resources.push(resource),
            _ => self.misuse.push(format!(
                "`{}` shapes cannot bind resource `{resource}`",
                self.shape_type
            )),
        }
        self
    }

    // ------------------------------------------------------------------
    // Operation / service
    // ------------------------------------------------------------------

    pub fn input(self, input: ShapeId) -> Self {
        self.with_operation("input", |o| o.input = Some(input))
    }

    pub fn output(self, output: ShapeId) -> Self {
        self.with_operation("output", |o| o.output = Some(output))
    }

    /// Add an error to an operation or service
    pub fn error(mut self, error: ShapeId) -> Self {
        match &mut self.payload {
            DeclaredPayload::Operation(o) => o.errors.push(error),
            DeclaredPayload::Service(s) => s.errors.push(error),
            _ => self.misuse.push(format!(
                "`{}` shapes cannot declare error `{error}`",
                self.shape_type
            )),
        }
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        match &mut self.payload {
            DeclaredPayload::Service(s) => s.version = version.into(),
            _ => self
                .misuse
                .push(format!("`{}` shapes have no version", self.shape_type)),
        }
        self
    }

    fn has_members(&self) -> bool {
        matches!(
            self.shape_type,
            ShapeType::List
                | ShapeType::Set
                | ShapeType::Map
                | ShapeType::Structure
                | ShapeType::Union
        )
    }

    fn with_resource(mut self, what: &str, apply: impl FnOnce(&mut ResourceShape)) -> Self {
        match &mut self.payload {
            DeclaredPayload::Resource(r) => apply(r),
            _ => self
                .misuse
                .push(format!("`{what}` requires a resource, found `{}`", self.shape_type)),
        }
        self
    }

    fn with_operation(mut self, what: &str, apply: impl FnOnce(&mut OperationShape)) -> Self {
        match &mut self.payload {
            DeclaredPayload::Operation(o) => apply(o),
            _ => self
                .misuse
                .push(format!("`{what}` requires an operation, found `{}`", self.shape_type)),
        }
        self
    }
}
