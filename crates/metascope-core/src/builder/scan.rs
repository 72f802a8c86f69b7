//! Member scanning listeners: naming, the depth-first walk over properties
//! and operations (embedded members flattened through a `PathBuilder`),
//! type-level aliases and the final materialization of member builders.

use crate::{
    builder::{BuildError, BuilderContext, EntityState, OperationBuilder, PropertyBuilder},
    event::{EntityTypeUpdated, ListenerError, PreBuildEntity},
    marker::{AliasOf, Relation},
    member::{Member, OperationMember, PropertyMember, TypeMembers},
    model::{RelationKind, RelationModel},
    path::PathBuilder,
    qualifier::{InheritedDetails, Qualifier},
    reference::{EmbeddedOperationReference, OperationReference},
};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Scan {
    Properties,
    Operations,
}

pub(crate) fn resolve_name(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    if state.name.is_none() {
        state.name = state
            .members
            .as_ref()
            .map(|members| state.ctx.entity_name(members));
    }

    Ok(())
}

pub(crate) fn scan_properties(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    scan(state, Scan::Properties)
}

pub(crate) fn scan_operations(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    scan(state, Scan::Operations)
}

/// Root-level `AliasOf` markers; nested ones are collected during the walk.
pub(crate) fn register_type_aliases(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    if let Some(members) = state.members.clone() {
        let path = PathBuilder::new(state.ctx.indicator(), None);
        collect_type_aliases(&members, &path, state);
    }

    Ok(())
}

/// Turn the pending member builders into descriptors. Every builder sees
/// the qualifiers known to the whole entity, so unknown-to-the-member
/// qualifiers still get an overlay inheriting the entity's view.
pub(crate) fn materialize(
    _: &PreBuildEntity,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    let qualifiers: Vec<Qualifier> = state.details.qualifiers().iter().copied().collect();

    for mut builder in std::mem::take(&mut state.properties) {
        builder.register_qualifiers(qualifiers.iter().copied());
        state.built_properties.push(Arc::new(builder.build()?));
    }
    for mut builder in std::mem::take(&mut state.operations) {
        builder.register_qualifiers(qualifiers.iter().copied());
        state.built_operations.push(Arc::new(builder.build()?));
    }

    Ok(())
}

fn scan(state: &mut EntityState, kind: Scan) -> Result<(), ListenerError> {
    let Some(members) = state.members.clone() else {
        return Ok(());
    };
    let ctx = state.ctx.clone();
    let mut path = PathBuilder::new(ctx.indicator(), ctx.object_factory().cloned());

    walk(&ctx, &members, &mut path, state, kind)?;

    Ok(())
}

fn walk(
    ctx: &BuilderContext,
    members: &TypeMembers,
    path: &mut PathBuilder,
    state: &mut EntityState,
    scan: Scan,
) -> Result<(), BuildError> {
    if scan == Scan::Operations {
        for operation in members.operations() {
            add_operation(ctx, operation, path, state)?;
        }
    }

    let attributes = ctx.attributes();
    for member in members.properties() {
        if attributes.is_ignore(member) {
            continue;
        }
        let local = attributes.name(member);

        if attributes.is_embedded(member) {
            let nested = embedded_members(ctx, member, &local, path, state)?;

            path.push_property(member, local);
            walk(ctx, &nested, path, state, scan)?;
            if scan == Scan::Properties {
                collect_type_aliases(&nested, path, state);
            }
            path.pop_property();
        } else if scan == Scan::Properties {
            add_property(ctx, member, local, path, state)?;
        }
    }

    Ok(())
}

// Members of the type an embedded property holds; a type already on the
// path (or the root itself) would embed forever.
fn embedded_members(
    ctx: &BuilderContext,
    member: &PropertyMember,
    local: &str,
    path: &PathBuilder,
    state: &EntityState,
) -> Result<Arc<TypeMembers>, BuildError> {
    let nested = member.value_type().object_type();

    if state.entity_type == Some(nested) || path.is_walking(&nested) {
        return Err(BuildError::RecursiveEmbedding {
            ty: nested.name(),
            path: path.resolve_operation_name(local),
        });
    }

    ctx.entities()
        .resolve_entity(&nested)
        .ok_or(BuildError::UnknownType { ty: nested.name() })
}

fn add_property(
    ctx: &BuilderContext,
    member: &PropertyMember,
    local: String,
    path: &mut PathBuilder,
    state: &mut EntityState,
) -> Result<(), BuildError> {
    path.push_property(member, local);
    let name = path.resolve_name();
    let segments = path.segments();
    let reference = path.current_reference();
    path.pop_property();

    let Some(reference) = reference else {
        return Ok(());
    };

    let mut builder = PropertyBuilder::new(ctx.clone());
    builder
        .apply_markers(member.markers())
        .set_name(name.clone())
        .set_segments(segments)
        .inherit(InheritedDetails::new(
            state.details.clone(),
            ctx.config().base_detail(),
        ));
    builder.set_value_type(member.value_type())?;
    builder.set_reference(reference)?;
    if let Some(ops) = member.collection() {
        builder.set_collection(Arc::clone(ops));
    }
    if let Some(relation) = detect_relation(ctx, member) {
        builder.set_relation(relation);
    }

    for alias in ctx.attributes().aliases(member) {
        state
            .aliases
            .push((path.resolve_operation_name(&alias), name.clone()));
    }
    state.details.register_all(builder.qualifiers());
    state.properties.push(builder);

    Ok(())
}

fn add_operation(
    ctx: &BuilderContext,
    member: &OperationMember,
    path: &PathBuilder,
    state: &mut EntityState,
) -> Result<(), BuildError> {
    let attributes = ctx.attributes();
    if attributes.is_ignore(member) {
        return Ok(());
    }

    let local = attributes.name(member);
    let name = path.resolve_operation_name(&local);
    let mut segments = path.segments();
    segments.push(local);
    let reference: Arc<dyn OperationReference> = match path.current_reference() {
        Some(outer) => Arc::new(EmbeddedOperationReference::new(
            name.clone(),
            outer,
            Arc::clone(member.reference()),
        )),
        None => Arc::clone(member.reference()),
    };

    let mut builder = OperationBuilder::new(ctx.clone());
    builder
        .apply_markers(member.markers())
        .set_name(name.clone())
        .set_segments(segments)
        .set_signature(member.parameters().to_vec(), member.result_type())
        .inherit(InheritedDetails::new(
            state.details.clone(),
            ctx.config().base_detail(),
        ));
    builder.set_reference(reference)?;

    for alias in attributes.aliases(member) {
        state
            .aliases
            .push((path.resolve_operation_name(&alias), name.clone()));
    }
    state.details.register_all(builder.qualifiers());
    state.operations.push(builder);

    Ok(())
}

// Registered object types are references to other entities unless the
// member says otherwise.
fn detect_relation(ctx: &BuilderContext, member: &PropertyMember) -> Option<RelationModel> {
    let explicit = member
        .markers()
        .all::<Relation>()
        .any(|relation| relation.qualifier.is_none());
    let target = member.value_type().object_type();

    if explicit || !target.is_object() {
        return None;
    }

    let members = ctx.enumerator().members(&target)?;

    Some(RelationModel::new(
        RelationKind::Reference,
        Some(ctx.entity_name(&members)),
    ))
}

fn collect_type_aliases(members: &TypeMembers, path: &PathBuilder, state: &mut EntityState) {
    for alias in members.markers().all::<AliasOf>() {
        state.aliases.push((
            path.resolve_operation_name(&alias.alias),
            path.resolve_operation_name(&alias.target),
        ));
    }
}
