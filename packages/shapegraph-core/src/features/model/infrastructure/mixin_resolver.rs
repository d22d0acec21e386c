// Infrastructure: Mixin Resolver - effective members and traits
//
// Mixins are resolved in topological order over the mixin dependency graph,
// so every mixin is frozen before anything that mixes it in. Cycles are
// rejected before any merge happens.
//
// Precedence:
// - traits: mixins in declaration order (later wins), then local traits
// - members: mixin members in declaration order, then local members;
//   a local member refines an inherited one of the same name and target
// - the `smithy.api#mixin` trait, and the traits its `localTraits` names,
//   stay on the mixin

use ahash::{AHashMap, AHashSet};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::prelude::mixin_trait_id;
use crate::config::MixinConflictPolicy;
use crate::features::model::domain::shape_builder::DeclaredPayload;
use crate::features::model::domain::{ModelError, ModelResult, ShapeBuilder};
use crate::shared::models::{
    MemberShape, Members, OperationShape, ResourceShape, ServiceShape, Shape, ShapeId, ShapeKind,
    ShapeType, TraitMap, PRELUDE_NAMESPACE,
};

/// Member being assembled for one container
struct EffectiveMember {
    name: String,
    target: ShapeId,
    traits: TraitMap,
    mixins: Vec<ShapeId>,
}

pub struct MixinResolver<'a> {
    declared: &'a AHashMap<ShapeId, ShapeBuilder>,
    policy: MixinConflictPolicy,
}

impl<'a> MixinResolver<'a> {
    pub fn new(declared: &'a AHashMap<ShapeId, ShapeBuilder>, policy: MixinConflictPolicy) -> Self {
        Self { declared, policy }
    }

    /// Freeze every declared shape, mixins resolved
    ///
    /// Returns top-level shapes in resolution order.
    pub fn resolve_all(&self) -> ModelResult<Vec<Arc<Shape>>> {
        let order = self.resolution_order()?;
        let mut resolved: AHashMap<ShapeId, Arc<Shape>> = AHashMap::with_capacity(order.len());
        let mut frozen = Vec::with_capacity(order.len());

        for id in order {
            let Some(decl) = self.declared.get(&id) else {
                continue;
            };
            let shape = Arc::new(self.resolve_shape(decl, &resolved)?);
            resolved.insert(id, shape.clone());
            frozen.push(shape);
        }

        Ok(frozen)
    }

    /// Topological order over `mixin -> shape` edges
    fn resolution_order(&self) -> ModelResult<Vec<ShapeId>> {
        let mut ids: Vec<&ShapeId> = self.declared.keys().collect();
        ids.sort();

        for id in &ids {
            self.check_mixins(id)?;
        }

        let mut graph: DiGraphMap<&ShapeId, ()> = DiGraphMap::new();
        for id in &ids {
            graph.add_node(*id);
        }
        for id in &ids {
            for mixin in &self.declared[*id].mixins {
                graph.add_edge(mixin, *id, ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| ModelError::Cycle {
            shape: cycle.node_id().clone(),
        })?;

        let with_mixins = ids
            .iter()
            .filter(|id| !self.declared[**id].mixins.is_empty())
            .count();
        debug!(shapes = order.len(), with_mixins, "mixin resolution order computed");

        Ok(order.into_iter().cloned().collect())
    }

    fn check_mixins(&self, id: &ShapeId) -> ModelResult<()> {
        let decl = &self.declared[id];
        for mixin in &decl.mixins {
            if mixin == id {
                return Err(ModelError::Cycle { shape: id.clone() });
            }
            let Some(mixin_decl) = self.declared.get(mixin) else {
                return Err(ModelError::UnknownMixin {
                    shape: id.clone(),
                    mixin: mixin.clone(),
                });
            };
            if !mixin_decl.traits.contains(&mixin_trait_id()) {
                return Err(ModelError::InvalidMixin {
                    shape: id.clone(),
                    mixin: mixin.clone(),
                    reason: "target is not marked with `smithy.api#mixin`".to_string(),
                });
            }
            if mixin_decl.shape_type != decl.shape_type {
                return Err(ModelError::InvalidMixin {
                    shape: id.clone(),
                    mixin: mixin.clone(),
                    reason: format!(
                        "a `{}` cannot mix in a `{}`",
                        decl.shape_type, mixin_decl.shape_type
                    ),
                });
            }
        }
        Ok(())
    }

    fn resolve_shape(
        &self,
        decl: &ShapeBuilder,
        resolved: &AHashMap<ShapeId, Arc<Shape>>,
    ) -> ModelResult<Shape> {
        let mixins: Vec<&Arc<Shape>> = decl
            .mixins
            .iter()
            .filter_map(|mixin| resolved.get(mixin))
            .collect();

        let traits = merge_traits(decl, &mixins)?;
        let members = self.merge_members(decl, &mixins)?;
        check_member_names(decl, &members)?;

        let kind = match decl.shape_type {
            ShapeType::List => ShapeKind::List(self.freeze_members(decl, members)?),
            ShapeType::Set => ShapeKind::Set(self.freeze_members(decl, members)?),
            ShapeType::Map => ShapeKind::Map(self.freeze_members(decl, members)?),
            ShapeType::Structure => ShapeKind::Structure(self.freeze_members(decl, members)?),
            ShapeType::Union => ShapeKind::Union(self.freeze_members(decl, members)?),
            ShapeType::Blob => ShapeKind::Blob,
            ShapeType::Boolean => ShapeKind::Boolean,
            ShapeType::String => ShapeKind::String,
            ShapeType::Timestamp => ShapeKind::Timestamp,
            ShapeType::Byte => ShapeKind::Byte,
            ShapeType::Short => ShapeKind::Short,
            ShapeType::Integer => ShapeKind::Integer,
            ShapeType::Long => ShapeKind::Long,
            ShapeType::Float => ShapeKind::Float,
            ShapeType::Double => ShapeKind::Double,
            ShapeType::BigInteger => ShapeKind::BigInteger,
            ShapeType::BigDecimal => ShapeKind::BigDecimal,
            ShapeType::Document => ShapeKind::Document,
            ShapeType::Resource => ShapeKind::Resource(merge_resource(decl, &mixins)),
            ShapeType::Operation => ShapeKind::Operation(merge_operation(decl, &mixins)),
            ShapeType::Service => ShapeKind::Service(merge_service(decl, &mixins)),
            ShapeType::Member => {
                return Err(ModelError::invalid_definition(
                    &decl.id,
                    "member shapes cannot be declared at the top level",
                ))
            }
        };

        Ok(Shape::new(decl.id.clone(), kind, traits, decl.mixins.clone()))
    }

    fn merge_members(
        &self,
        decl: &ShapeBuilder,
        mixins: &[&Arc<Shape>],
    ) -> ModelResult<Vec<EffectiveMember>> {
        let mut effective: Vec<EffectiveMember> = Vec::new();

        for mixin in mixins {
            for member in mixin.members() {
                let (Some(name), Some(target)) = (member.id().member(), member.target()) else {
                    continue;
                };
                match effective.iter_mut().find(|m| m.name == name) {
                    Some(existing) if existing.target == *target => {
                        existing.mixins.push(member.id().clone());
                        for t in member.traits() {
                            if !existing.traits.contains(t.id()) {
                                existing.traits.insert(t.clone());
                            }
                        }
                    }
                    Some(existing) => match self.policy {
                        MixinConflictPolicy::Error => {
                            return Err(ModelError::conflict(
                                &decl.id,
                                name,
                                format!(
                                    "mixin `{}` targets `{target}`, an earlier mixin targets `{}`",
                                    mixin.id(),
                                    existing.target
                                ),
                            ))
                        }
                        MixinConflictPolicy::FirstWins => {
                            debug!(
                                shape = %decl.id,
                                member = name,
                                ignored = %member.id(),
                                "conflicting mixin member ignored"
                            );
                        }
                    },
                    None => effective.push(EffectiveMember {
                        name: name.to_string(),
                        target: target.clone(),
                        traits: member.traits().clone(),
                        mixins: vec![member.id().clone()],
                    }),
                }
            }
        }

        let mut seen: AHashSet<&str> = AHashSet::new();
        for local in &decl.members {
            if !seen.insert(local.name.as_str()) {
                return Err(ModelError::DuplicateMember {
                    shape: decl.id.clone(),
                    member: local.name.clone(),
                });
            }
            match effective.iter_mut().find(|m| m.name == local.name) {
                Some(existing) if existing.target != local.target => {
                    return Err(ModelError::conflict(
                        &decl.id,
                        &local.name,
                        format!(
                            "local target `{}` differs from inherited target `{}`",
                            local.target, existing.target
                        ),
                    ))
                }
                Some(existing) => {
                    for t in &local.traits {
                        existing.traits.insert(t.clone());
                    }
                }
                None => effective.push(EffectiveMember {
                    name: local.name.clone(),
                    target: local.target.clone(),
                    traits: local.traits.clone(),
                    mixins: Vec::new(),
                }),
            }
        }

        Ok(effective)
    }

    fn freeze_members(
        &self,
        decl: &ShapeBuilder,
        members: Vec<EffectiveMember>,
    ) -> ModelResult<Members> {
        let mut frozen = Vec::with_capacity(members.len());
        for member in members {
            let id = decl.id.with_member(&member.name)?;
            frozen.push(Arc::new(Shape::new(
                id,
                ShapeKind::Member(MemberShape {
                    container: decl.id.clone(),
                    target: member.target,
                }),
                member.traits,
                member.mixins,
            )));
        }
        Ok(Members::new(frozen))
    }
}

/// Mixin traits in declaration order, then local traits
fn merge_traits(decl: &ShapeBuilder, mixins: &[&Arc<Shape>]) -> ModelResult<TraitMap> {
    let mut traits = TraitMap::new();
    for mixin in mixins {
        let excluded = non_inherited_traits(&decl.id, mixin)?;
        for t in mixin.traits() {
            if !excluded.contains(t.id()) {
                traits.insert(t.clone());
            }
        }
    }
    for t in &decl.traits {
        traits.insert(t.clone());
    }
    Ok(traits)
}

/// The mixin trait itself plus its `localTraits`
fn non_inherited_traits(shape: &ShapeId, mixin: &Shape) -> ModelResult<AHashSet<ShapeId>> {
    let mixin_trait = mixin_trait_id();
    let mut excluded = AHashSet::new();

    if let Some(Value::Array(local)) = mixin
        .get_trait(&mixin_trait)
        .and_then(|t| t.value().get("localTraits"))
    {
        for entry in local {
            let Some(text) = entry.as_str() else {
                return Err(ModelError::InvalidMixin {
                    shape: shape.clone(),
                    mixin: mixin.id().clone(),
                    reason: format!("`localTraits` entries must be shape ids, found {entry}"),
                });
            };
            excluded.insert(ShapeId::from_relative(text, PRELUDE_NAMESPACE)?);
        }
    }

    excluded.insert(mixin_trait);
    Ok(excluded)
}

/// Aggregates with a fixed member layout
fn check_member_names(decl: &ShapeBuilder, members: &[EffectiveMember]) -> ModelResult<()> {
    let expected: &[&str] = match decl.shape_type {
        ShapeType::List | ShapeType::Set => &["member"],
        ShapeType::Map => &["key", "value"],
        _ => return Ok(()),
    };

    let mut names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    names.sort_unstable();
    if names != expected {
        return Err(ModelError::invalid_definition(
            &decl.id,
            format!(
                "a `{}` must declare exactly the members {expected:?}, found {names:?}",
                decl.shape_type
            ),
        ));
    }
    Ok(())
}

fn extend_unique(into: &mut Vec<ShapeId>, from: &[ShapeId]) {
    for id in from {
        if !into.contains(id) {
            into.push(id.clone());
        }
    }
}

fn merge_resource(decl: &ShapeBuilder, mixins: &[&Arc<Shape>]) -> ResourceShape {
    let mut merged = ResourceShape::default();
    let inherited = mixins.iter().filter_map(|m| m.as_resource());
    let local = match &decl.payload {
        DeclaredPayload::Resource(r) => Some(r),
        _ => None,
    };

    for source in inherited.chain(local) {
        for (name, target) in source.identifiers.iter() {
            merged.identifiers.insert(name, target.clone());
        }
        for (name, target) in source.properties.iter() {
            merged.properties.insert(name, target.clone());
        }
        let lifecycle = [
            (&mut merged.create, &source.create),
            (&mut merged.put, &source.put),
            (&mut merged.read, &source.read),
            (&mut merged.update, &source.update),
            (&mut merged.delete, &source.delete),
            (&mut merged.list, &source.list),
        ];
        for (slot, value) in lifecycle {
            if value.is_some() {
                *slot = value.clone();
            }
        }
        extend_unique(&mut merged.operations, &source.operations);
        extend_unique(&mut merged.collection_operations, &source.collection_operations);
        extend_unique(&mut merged.resources, &source.resources);
    }

    merged
}

fn merge_operation(decl: &ShapeBuilder, mixins: &[&Arc<Shape>]) -> OperationShape {
    let mut merged = OperationShape::default();
    let inherited = mixins.iter().filter_map(|m| m.as_operation());
    let local = match &decl.payload {
        DeclaredPayload::Operation(o) => Some(o),
        _ => None,
    };

    for source in inherited.chain(local) {
        if source.input.is_some() {
            merged.input = source.input.clone();
        }
        if source.output.is_some() {
            merged.output = source.output.clone();
        }
        extend_unique(&mut merged.errors, &source.errors);
    }

    merged
}

fn merge_service(decl: &ShapeBuilder, mixins: &[&Arc<Shape>]) -> ServiceShape {
    let mut merged = ServiceShape::default();
    let inherited = mixins.iter().filter_map(|m| m.as_service());
    let local = match &decl.payload {
        DeclaredPayload::Service(s) => Some(s),
        _ => None,
    };

    for source in inherited.chain(local) {
        if !source.version.is_empty() {
            merged.version = source.version.clone();
        }
        extend_unique(&mut merged.operations, &source.operations);
        extend_unique(&mut merged.resources, &source.resources);
        extend_unique(&mut merged.errors, &source.errors);
    }

    merged
}
