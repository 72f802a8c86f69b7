//! Event-driven builders for entity, property and operation descriptors.
//!
//! A builder owns an `EventBus` over its own state. Concerns such as
//! naming, member scanning, aliases, qualifier details and creational
//! strategies are plain listeners registered in the builder's
//! constructor; the builder itself only fires lifecycle events and
//! validates what the listeners left behind.

mod creational;
mod entity;
mod operation;
mod overlay;
mod processor;
mod property;
mod scan;

#[cfg(test)]
mod tests;

pub use entity::{EntityBuilder, EntityState};
pub use operation::{OperationBuilder, OperationState};
pub use processor::{EntityPostProcessor, PropertyPostProcessor};
pub use property::{PropertyBuilder, PropertyState};

use crate::{
    ThisError,
    config::{ConfigError, ModelConfig, NamePattern},
    create::{InstanceRegistry, ObjectFactoryRef},
    event::{EventError, ListenerOwner},
    marker::EntityName,
    member::{
        AttributeResolver, EntityResolver, MarkerAttributeResolver, MemberEnumerator, TypeMembers,
        TypeRegistry,
    },
};
use std::{fmt, sync::Arc};

///
/// BuildError
///
/// Structural failures: the descriptor cannot be built at all.
///

#[derive(Debug, ThisError)]
pub enum BuildError {
    #[error("invalid {kind} name '{name}': segment '{segment}' does not match '{pattern}'")]
    InvalidName {
        kind: &'static str,
        name: String,
        segment: String,
        pattern: String,
    },

    #[error("{kind} is missing required field '{field}'")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("alias '{alias}' refers to itself")]
    SelfAlias { alias: String },

    #[error("alias '{alias}' targets unknown member '{target}'")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("alias '{alias}' collides with an existing member or alias")]
    AliasCollision { alias: String },

    #[error("entity '{entity}' declares member '{name}' more than once")]
    DuplicateMember { entity: String, name: String },

    #[error("entity '{entity}' declares more than one key property ('{first}', '{second}')")]
    DuplicateKey {
        entity: String,
        first: String,
        second: String,
    },

    #[error("type '{ty}' embeds itself through '{path}'")]
    RecursiveEmbedding { ty: &'static str, path: String },

    #[error("type '{ty}' is not registered")]
    UnknownType { ty: &'static str },

    #[error("property '{name}' is multi-valued but has no collection capability")]
    CollectionAccess { name: String },

    #[error(transparent)]
    Event(#[from] EventError),
}

//
// Listener owners
//

pub const NAMING: ListenerOwner = ListenerOwner::new("naming");
pub const QUALIFIERS: ListenerOwner = ListenerOwner::new("qualifiers");
pub const PROPERTIES: ListenerOwner = ListenerOwner::new("properties");
pub const OPERATIONS: ListenerOwner = ListenerOwner::new("operations");
pub const ALIASES: ListenerOwner = ListenerOwner::new("aliases");
pub const CREATIONAL: ListenerOwner = ListenerOwner::new("creational");
pub const MATERIALIZER: ListenerOwner = ListenerOwner::new("materializer");
pub const OVERLAYS: ListenerOwner = ListenerOwner::new("overlays");
pub const CARDINALITY: ListenerOwner = ListenerOwner::new("cardinality");
pub const ACCESS: ListenerOwner = ListenerOwner::new("access");
pub const SIGNATURE: ListenerOwner = ListenerOwner::new("signature");

///
/// BuilderContext
///
/// Everything a build pass depends on, passed explicitly. Cheap to clone;
/// every builder in a pass holds its own copy.
///

#[derive(Clone)]
pub struct BuilderContext {
    config: Arc<ModelConfig>,
    names: NamePattern,
    enumerator: Arc<dyn MemberEnumerator>,
    entities: Arc<dyn EntityResolver>,
    attributes: Arc<dyn AttributeResolver>,
    object_factory: Option<ObjectFactoryRef>,
    instances: Option<Arc<dyn InstanceRegistry>>,
    entity_processors: Vec<Arc<dyn EntityPostProcessor>>,
    property_processors: Vec<Arc<dyn PropertyPostProcessor>>,
}

impl BuilderContext {
    /// Context over `registry`, which serves as both member enumerator and
    /// entity resolver.
    pub fn new(config: ModelConfig, registry: Arc<TypeRegistry>) -> Result<Self, ConfigError> {
        let names = config.naming.compile()?;

        Ok(Self {
            config: Arc::new(config),
            names,
            enumerator: Arc::clone(&registry) as Arc<dyn MemberEnumerator>,
            entities: registry,
            attributes: Arc::new(MarkerAttributeResolver),
            object_factory: None,
            instances: None,
            entity_processors: Vec::new(),
            property_processors: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_object_factory(mut self, factory: ObjectFactoryRef) -> Self {
        self.object_factory = Some(factory);
        self
    }

    #[must_use]
    pub fn with_instance_registry(mut self, registry: Arc<dyn InstanceRegistry>) -> Self {
        self.instances = Some(registry);
        self
    }

    #[must_use]
    pub fn with_attribute_resolver(mut self, resolver: Arc<dyn AttributeResolver>) -> Self {
        self.attributes = resolver;
        self
    }

    #[must_use]
    pub fn with_entity_resolver(mut self, resolver: Arc<dyn EntityResolver>) -> Self {
        self.entities = resolver;
        self
    }

    #[must_use]
    pub fn with_entity_processor(mut self, processor: Arc<dyn EntityPostProcessor>) -> Self {
        self.entity_processors.push(processor);
        self
    }

    #[must_use]
    pub fn with_property_processor(mut self, processor: Arc<dyn PropertyPostProcessor>) -> Self {
        self.property_processors.push(processor);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    #[must_use]
    pub const fn names(&self) -> &NamePattern {
        &self.names
    }

    #[must_use]
    pub fn indicator(&self) -> char {
        self.names.indicator()
    }

    #[must_use]
    pub fn enumerator(&self) -> &dyn MemberEnumerator {
        self.enumerator.as_ref()
    }

    #[must_use]
    pub fn entities(&self) -> &dyn EntityResolver {
        self.entities.as_ref()
    }

    #[must_use]
    pub fn attributes(&self) -> &dyn AttributeResolver {
        self.attributes.as_ref()
    }

    #[must_use]
    pub const fn object_factory(&self) -> Option<&ObjectFactoryRef> {
        self.object_factory.as_ref()
    }

    #[must_use]
    pub const fn instances(&self) -> Option<&Arc<dyn InstanceRegistry>> {
        self.instances.as_ref()
    }

    /// Entity name for a type: its `EntityName` marker, or the short type
    /// name with the configured case applied.
    #[must_use]
    pub fn entity_name(&self, members: &TypeMembers) -> String {
        members.markers().first::<EntityName>().map_or_else(
            || {
                self.config
                    .naming
                    .entity_name(members.type_token().short_name())
            },
            |name| name.0.clone(),
        )
    }

    /// A name that was never flattened must match as a whole.
    pub(crate) fn check_name(&self, kind: &'static str, name: &str) -> Result<(), BuildError> {
        if self.names.matches(name) {
            Ok(())
        } else {
            Err(self.invalid_name(kind, name, name))
        }
    }

    /// A flattened name is valid when each of its local segments is.
    pub(crate) fn check_segments(
        &self,
        kind: &'static str,
        name: &str,
        segments: &[String],
    ) -> Result<(), BuildError> {
        match self.names.offending_segment(segments) {
            Some(segment) => Err(self.invalid_name(kind, name, segment)),
            None => Ok(()),
        }
    }

    fn invalid_name(&self, kind: &'static str, name: &str, segment: &str) -> BuildError {
        BuildError::InvalidName {
            kind,
            name: name.to_string(),
            segment: segment.to_string(),
            pattern: self.names.as_str().to_string(),
        }
    }

    pub(crate) fn entity_processors(&self) -> &[Arc<dyn EntityPostProcessor>] {
        &self.entity_processors
    }

    pub(crate) fn property_processors(&self) -> &[Arc<dyn PropertyPostProcessor>] {
        &self.property_processors
    }
}

impl fmt::Debug for BuilderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderContext")
            .field("config", &self.config)
            .field("attributes", &self.attributes)
            .field("object_factory", &self.object_factory.is_some())
            .field("instances", &self.instances.is_some())
            .field("entity_processors", &self.entity_processors.len())
            .field("property_processors", &self.property_processors.len())
            .finish_non_exhaustive()
    }
}
