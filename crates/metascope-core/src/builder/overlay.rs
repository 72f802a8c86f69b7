//! Qualifier listeners: declare presentation details while scanning and
//! fill each descriptor's overlay cache once the descriptor exists.

use crate::{
    builder::{EntityState, OperationState, PropertyState},
    event::{BuildEntity, BuildOperation, BuildProperty, EntityTypeUpdated, ListenerError},
    marker::Presentation,
    model::QualifiedOperation,
    qualifier::{Overlay, Qualifier},
};
use std::sync::Arc;

/// Type-level `Presentation` markers become the entity's own details.
pub(crate) fn declare_entity_details(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    if let Some(members) = &state.members {
        for presentation in members.markers().all::<Presentation>() {
            state.details.declare(presentation);
        }
    }

    Ok(())
}

pub(crate) fn cache_entity_overlays(
    event: &BuildEntity,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    let base = state.ctx.config().base_detail();

    for qualifier in qualifiers(state.details.qualifiers()) {
        let detail = state.details.detail_for(&qualifier, &base);
        let overlay = Overlay::new(Some(qualifier), detail, Arc::clone(&event.entity));

        state.overlays.insert(qualifier, overlay);
        trace_overlay(event.entity.name(), qualifier);
    }

    Ok(())
}

pub(crate) fn cache_property_overlays(
    event: &BuildProperty,
    state: &mut PropertyState,
) -> Result<(), ListenerError> {
    for qualifier in qualifiers(state.details.qualifiers()) {
        let base = state.inherited.base_for(Some(&qualifier));
        let detail = state.details.detail_for(&qualifier, &base);
        let relation = state.qualified_relations.get(&qualifier).cloned();
        let overlay = Overlay::new(Some(qualifier), detail, Arc::clone(&event.property))
            .with_relation(relation);

        state.overlays.insert(qualifier, overlay);
        trace_overlay(event.property.name(), qualifier);
    }

    Ok(())
}

// Parameters and the result resolve under the same qualifier as their
// operation, over the operation's visibility.
pub(crate) fn cache_operation_overlays(
    event: &BuildOperation,
    state: &mut OperationState,
) -> Result<(), ListenerError> {
    let operation = &event.operation;

    for qualifier in qualifiers(state.details.qualifiers()) {
        let base = state.inherited.base_for(Some(&qualifier));
        let detail = state.details.detail_for(&qualifier, &base);
        let member_base = state.member_base(Some(&qualifier));

        let parameters = operation
            .parameters()
            .iter()
            .map(|parameter| {
                let detail = state.parameter_details.get(parameter.index()).map_or_else(
                    || member_base.clone(),
                    |details| details.detail_for(&qualifier, &member_base),
                );

                Arc::new(Overlay::new(Some(qualifier), detail, Arc::clone(parameter)))
            })
            .collect();
        let result = Arc::new(Overlay::new(
            Some(qualifier),
            state.result_details.detail_for(&qualifier, &member_base),
            Arc::clone(operation.result()),
        ));
        let overlay = QualifiedOperation::new(
            Overlay::new(Some(qualifier), detail, Arc::clone(operation)),
            parameters,
            result,
        );

        state.overlays.insert(qualifier, overlay);
        trace_overlay(operation.name(), qualifier);
    }

    Ok(())
}

fn qualifiers<'a>(set: impl IntoIterator<Item = &'a Qualifier>) -> Vec<Qualifier> {
    set.into_iter().copied().collect()
}

fn trace_overlay(descriptor: &str, qualifier: Qualifier) {
    tracing::trace!(descriptor, %qualifier, "cached qualifier overlay");
}
