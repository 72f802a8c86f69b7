use crate::{
    builder::{
        ALIASES, BuildError, BuilderContext, CREATIONAL, MATERIALIZER, NAMING, OPERATIONS,
        OVERLAYS, OperationBuilder, PROPERTIES, PropertyBuilder, QUALIFIERS, creational, overlay,
        scan,
    },
    create::{CreationChain, CreationalStrategy},
    event::{BuildEntity, EntityTypeUpdated, EventBus, ListenerOwner, PreBuildEntity},
    member::TypeMembers,
    model::{Entity, EntityMember, EntityModel, Extensions, Operation, Property, QualifiedEntity},
    qualifier::{OverlayCache, QualifiedDetails},
    types::TypeToken,
};
use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::Arc,
};

///
/// EntityState
///
/// Mutable state of one entity under construction.
///

#[derive(Debug)]
pub struct EntityState {
    pub(crate) ctx: BuilderContext,
    pub(crate) entity_type: Option<TypeToken>,
    pub(crate) members: Option<Arc<TypeMembers>>,
    pub(crate) name: Option<String>,
    pub(crate) details: QualifiedDetails,
    pub(crate) properties: Vec<PropertyBuilder>,
    pub(crate) operations: Vec<OperationBuilder>,
    pub(crate) aliases: Vec<(String, String)>,
    pub(crate) strategies: Vec<Arc<dyn CreationalStrategy>>,
    pub(crate) extensions: Extensions,
    pub(crate) built_properties: Vec<Arc<Property>>,
    pub(crate) built_operations: Vec<Arc<Operation>>,
    pub(crate) overlays: OverlayCache<QualifiedEntity>,
}

impl EntityState {
    fn new(ctx: BuilderContext) -> Self {
        Self {
            ctx,
            entity_type: None,
            members: None,
            name: None,
            details: QualifiedDetails::new(),
            properties: Vec::new(),
            operations: Vec::new(),
            aliases: Vec::new(),
            strategies: Vec::new(),
            extensions: Extensions::new(),
            built_properties: Vec::new(),
            built_operations: Vec::new(),
            overlays: OverlayCache::new(),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &BuilderContext {
        &self.ctx
    }

    #[must_use]
    pub const fn entity_type(&self) -> Option<TypeToken> {
        self.entity_type
    }

    #[must_use]
    pub const fn members(&self) -> Option<&Arc<TypeMembers>> {
        self.members.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Pending property names, in scan order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter_map(|builder| builder.state().name())
            .collect()
    }

    pub const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

///
/// EntityBuilder
///
/// One entity per builder. `set_type` runs the scanning listeners;
/// `build` materializes members and validates the result.
///

#[derive(Debug)]
pub struct EntityBuilder {
    bus: EventBus<EntityState>,
    state: EntityState,
}

impl EntityBuilder {
    pub fn new(ctx: BuilderContext) -> Result<Self, BuildError> {
        let mut bus = EventBus::new();

        bus.add_listener::<EntityTypeUpdated, _>(NAMING, scan::resolve_name);
        bus.add_listener::<EntityTypeUpdated, _>(PROPERTIES, scan::scan_properties);
        bus.add_listener::<EntityTypeUpdated, _>(OPERATIONS, scan::scan_operations);
        bus.add_listener_before::<EntityTypeUpdated, _>(
            QUALIFIERS,
            PROPERTIES,
            overlay::declare_entity_details,
        )?;
        bus.add_listener::<EntityTypeUpdated, _>(ALIASES, scan::register_type_aliases);
        bus.add_listener::<EntityTypeUpdated, _>(CREATIONAL, creational::register_strategies);
        for processor in ctx.entity_processors() {
            let processor = Arc::clone(processor);

            bus.add_listener::<EntityTypeUpdated, _>(
                ListenerOwner::new(processor.name()),
                move |_: &EntityTypeUpdated, state: &mut EntityState| processor.process(state),
            );
        }
        bus.add_listener::<PreBuildEntity, _>(MATERIALIZER, scan::materialize);
        bus.add_listener::<BuildEntity, _>(OVERLAYS, overlay::cache_entity_overlays);

        Ok(Self {
            bus,
            state: EntityState::new(ctx),
        })
    }

    /// Bind the raw type; fires `EntityTypeUpdated`.
    pub fn set_type(&mut self, entity_type: TypeToken) -> Result<&mut Self, BuildError> {
        let members = self
            .state
            .ctx
            .enumerator()
            .members(&entity_type)
            .ok_or(BuildError::UnknownType {
                ty: entity_type.name(),
            })?;

        let span = tracing::debug_span!("entity", ty = entity_type.name());
        let _guard = span.enter();

        self.state.entity_type = Some(entity_type);
        self.state.members = Some(members);

        let report = self
            .bus
            .handle_event(&EntityTypeUpdated { entity_type }, &mut self.state)?;
        tracing::debug!(
            delivered = report.delivered,
            failures = report.failures.len(),
            "scanned entity type"
        );

        Ok(self)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.state.name = Some(name.into());
        self
    }

    /// Register `alias` for the member named `member`; checked in `build`.
    pub fn add_alias(&mut self, member: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.state.aliases.push((alias.into(), member.into()));
        self
    }

    #[must_use]
    pub const fn state(&self) -> &EntityState {
        &self.state
    }

    pub fn build(mut self) -> Result<Entity, BuildError> {
        let entity_type = self.state.entity_type.ok_or(BuildError::MissingField {
            kind: "entity",
            field: "type",
        })?;
        let name = self.state.name.clone().ok_or(BuildError::MissingField {
            kind: "entity",
            field: "name",
        })?;
        self.state.ctx.check_name("entity", &name)?;

        let span = tracing::debug_span!("entity", ty = entity_type.name(), %name);
        let _guard = span.enter();

        self.bus
            .handle_event(&PreBuildEntity { entity_type }, &mut self.state)?;

        let state = &mut self.state;
        let properties = std::mem::take(&mut state.built_properties);
        let operations = std::mem::take(&mut state.built_operations);

        let mut members = BTreeMap::new();
        let mut key_property: Option<Arc<Property>> = None;
        for property in &properties {
            insert_member(&mut members, &name, EntityMember::Property(Arc::clone(property)))?;

            if property.is_key() {
                if let Some(first) = &key_property {
                    return Err(BuildError::DuplicateKey {
                        entity: name,
                        first: first.name().to_string(),
                        second: property.name().to_string(),
                    });
                }
                key_property = Some(Arc::clone(property));
            }
        }
        for operation in &operations {
            insert_member(&mut members, &name, EntityMember::Operation(Arc::clone(operation)))?;
        }

        let aliases = resolve_aliases(&members, std::mem::take(&mut state.aliases))?;

        let model = Arc::new(EntityModel {
            creation: CreationChain::new(name.clone(), std::mem::take(&mut state.strategies)),
            detail: state
                .details
                .default_detail(&state.ctx.config().base_detail()),
            extensions: std::mem::take(&mut state.extensions),
            name,
            entity_type,
            properties,
            operations,
            members,
            aliases,
            key_property,
        });

        self.bus.handle_event(
            &BuildEntity {
                entity: Arc::clone(&model),
            },
            &mut self.state,
        )?;
        tracing::debug!(
            properties = model.properties().len(),
            operations = model.operations().len(),
            qualifiers = self.state.overlays.len(),
            "built entity"
        );

        Ok(Entity::new(model, std::mem::take(&mut self.state.overlays)))
    }
}

fn insert_member(
    members: &mut BTreeMap<String, EntityMember>,
    entity: &str,
    member: EntityMember,
) -> Result<(), BuildError> {
    match members.entry(member.name().to_string()) {
        Entry::Occupied(entry) => Err(BuildError::DuplicateMember {
            entity: entity.to_string(),
            name: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(member);
            Ok(())
        }
    }
}

// Aliases must name an existing member, never themselves, and never
// shadow a member or an earlier alias.
fn resolve_aliases(
    members: &BTreeMap<String, EntityMember>,
    declared: Vec<(String, String)>,
) -> Result<BTreeMap<String, String>, BuildError> {
    let mut aliases = BTreeMap::new();

    for (alias, target) in declared {
        if alias == target {
            return Err(BuildError::SelfAlias { alias });
        }
        if !members.contains_key(&target) {
            return Err(BuildError::UnknownAliasTarget { alias, target });
        }
        if members.contains_key(&alias) {
            return Err(BuildError::AliasCollision { alias });
        }

        match aliases.entry(alias) {
            Entry::Occupied(entry) if entry.get() == &target => {}
            Entry::Occupied(entry) => {
                return Err(BuildError::AliasCollision {
                    alias: entry.key().clone(),
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(target);
            }
        }
    }

    Ok(aliases)
}
