//! Creational strategy discovery, run once per entity on `EntityTypeUpdated`.
//!
//! Registration order is fixed:
//! 1. the entity's own factory methods
//! 2. factory methods of the `ImplementedBy` type
//! 3. per `FactoryRef`, factory-instance strategies whose factory object
//!    comes from the object factory, the instance registry or the factory
//!    type's constructor
//! 4. without a usable `FactoryRef`: object factory, instance registry,
//!    constructor, implementation constructor

use crate::{
    builder::{BuilderContext, EntityState},
    create::{
        ConstructorStrategy, CreationalStrategy, FactoryInstanceStrategy, FactoryMethodStrategy,
        ObjectFactoryStrategy, RegistryStrategy,
    },
    event::{EntityTypeUpdated, ListenerError},
    marker::{FactoryRef, ImplementedBy, RegistryKey},
    member::TypeMembers,
    types::TypeToken,
};
use std::sync::Arc;

pub(crate) fn register_strategies(
    _: &EntityTypeUpdated,
    state: &mut EntityState,
) -> Result<(), ListenerError> {
    let (Some(target), Some(members)) = (state.entity_type, state.members.clone()) else {
        return Ok(());
    };
    let ctx = state.ctx.clone();
    let mut problems = Vec::new();

    let implementation = members.markers().first::<ImplementedBy>().map(|m| m.0);
    let implementation_members = implementation.and_then(|ty| {
        let found = ctx.enumerator().members(&ty);
        if found.is_none() {
            problems.push(format!("implementation type '{}' is not registered", ty.name()));
        }
        found
    });
    let accepted: Vec<TypeToken> = implementation.into_iter().collect();

    let mut chain = Chain::new(target);

    for method in members.factory_methods() {
        if assignable(method.return_type(), target, &accepted) {
            chain.push(FactoryMethodStrategy::new(target, accepted.clone(), method.clone()));
        }
    }
    if let Some(implementation) = &implementation_members {
        for method in implementation.factory_methods() {
            if assignable(method.return_type(), target, &accepted) {
                chain.push(FactoryMethodStrategy::new(target, accepted.clone(), method.clone()));
            }
        }
    }

    let mut bound = false;
    for factory_ref in members.markers().all::<FactoryRef>() {
        match factory_instance_strategies(&ctx, target, &accepted, factory_ref) {
            Ok(strategies) if strategies.is_empty() => problems.push(format!(
                "factory '{}' cannot be obtained: no object factory, registry or constructor",
                factory_ref.factory.name()
            )),
            Ok(strategies) => {
                bound = true;
                for strategy in strategies {
                    chain.push(strategy);
                }
            }
            Err(message) => problems.push(message),
        }
    }

    if !bound {
        if let Some(factory) = ctx.object_factory() {
            chain.push(
                ObjectFactoryStrategy::new(target, Arc::clone(factory))
                    .with_accepted(accepted.clone()),
            );
        }
        if let Some(instances) = ctx.instances() {
            let key = members.markers().first::<RegistryKey>().map(|k| k.0.clone());
            chain.push(
                RegistryStrategy::new(target, key, Arc::clone(instances))
                    .with_accepted(accepted.clone()),
            );
        }
        if let Some(constructor) = members.constructor() {
            chain.push(ConstructorStrategy::new(target, constructor.clone()));
        }
        if let Some(constructor) = implementation_members
            .as_deref()
            .and_then(TypeMembers::constructor)
        {
            chain.push(ConstructorStrategy::new(target, constructor.clone()));
        }
    }

    state.strategies.extend(chain.strategies);

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ListenerError::recoverable(problems.join("; ")))
    }
}

// One factory-instance strategy per way of obtaining the factory object.
fn factory_instance_strategies(
    ctx: &BuilderContext,
    target: TypeToken,
    accepted: &[TypeToken],
    factory_ref: &FactoryRef,
) -> Result<Vec<FactoryInstanceStrategy>, String> {
    let factory = factory_ref.factory;
    let factory_members = ctx
        .enumerator()
        .members(&factory)
        .ok_or_else(|| format!("factory type '{}' is not registered", factory.name()))?;
    let method = factory_members
        .instance_factory_method(&factory_ref.method)
        .ok_or_else(|| {
            format!(
                "factory type '{}' has no instance factory method '{}'",
                factory.name(),
                factory_ref.method
            )
        })?;

    if !assignable(method.return_type(), target, accepted) {
        return Err(format!(
            "factory method '{}' returns '{}', not '{}'",
            factory_ref.method,
            method.return_type().name(),
            target.name()
        ));
    }

    let mut sources: Vec<Arc<dyn CreationalStrategy>> = Vec::new();
    if let Some(object_factory) = ctx.object_factory() {
        sources.push(Arc::new(ObjectFactoryStrategy::new(
            factory,
            Arc::clone(object_factory),
        )));
    }
    if let Some(instances) = ctx.instances() {
        sources.push(Arc::new(RegistryStrategy::new(
            factory,
            factory_ref.key.clone(),
            Arc::clone(instances),
        )));
    }
    if let Some(constructor) = factory_members.constructor() {
        sources.push(Arc::new(ConstructorStrategy::new(factory, constructor.clone())));
    }

    Ok(sources
        .into_iter()
        .map(|source| {
            FactoryInstanceStrategy::new(target, accepted.to_vec(), source, method.clone())
        })
        .collect())
}

fn assignable(returns: TypeToken, target: TypeToken, accepted: &[TypeToken]) -> bool {
    returns == target || accepted.contains(&returns)
}

struct Chain {
    target: TypeToken,
    strategies: Vec<Arc<dyn CreationalStrategy>>,
}

impl Chain {
    const fn new(target: TypeToken) -> Self {
        Self {
            target,
            strategies: Vec::new(),
        }
    }

    fn push<S: CreationalStrategy + 'static>(&mut self, strategy: S) {
        tracing::trace!(
            entity = self.target.name(),
            strategy = %strategy.kind(),
            position = self.strategies.len(),
            "registered creational strategy"
        );
        self.strategies.push(Arc::new(strategy));
    }
}
