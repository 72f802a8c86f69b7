use crate::core::{
    Error,
    builder::{BuilderContext, EntityBuilder},
    config::ModelConfig,
    member::TypeRegistry,
    model::Entity,
    types::{TypeToken, Typed},
};
use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

///
/// MetaModel
///
/// Builds entity descriptors on demand and keeps them. Each root type is
/// built once per model; later lookups return the cached descriptor.
///

pub struct MetaModel {
    context: BuilderContext,
    registry: Arc<TypeRegistry>,
    entities: RwLock<HashMap<TypeId, Arc<Entity>>>,
}

impl MetaModel {
    #[must_use]
    pub fn new(context: BuilderContext, registry: Arc<TypeRegistry>) -> Self {
        Self {
            context,
            registry,
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Model over `registry` with the default configuration.
    pub fn with_registry(registry: TypeRegistry) -> Result<Self, Error> {
        Self::with_config(ModelConfig::default(), registry)
    }

    pub fn with_config(config: ModelConfig, registry: TypeRegistry) -> Result<Self, Error> {
        let registry = Arc::new(registry);
        let context = BuilderContext::new(config, Arc::clone(&registry))?;

        Ok(Self::new(context, registry))
    }

    #[must_use]
    pub const fn context(&self) -> &BuilderContext {
        &self.context
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Descriptor for `ty`, built on first request.
    pub fn entity_of(&self, ty: &TypeToken) -> Result<Arc<Entity>, Error> {
        if let Some(entity) = self.cached(ty) {
            return Ok(entity);
        }

        let mut builder = EntityBuilder::new(self.context.clone())?;
        builder.set_type(*ty)?;
        let entity = Arc::new(builder.build()?);

        let mut entities = self.entities.write().unwrap_or_else(PoisonError::into_inner);
        let entity = entities.entry(ty.id()).or_insert(entity);
        tracing::debug!(ty = ty.name(), entity = entity.name(), "cached entity");

        Ok(Arc::clone(entity))
    }

    pub fn entity<T: Typed>(&self) -> Result<Arc<Entity>, Error> {
        self.entity_of(&T::type_token())
    }

    /// Build (or reuse) the descriptor of `T` and run its creational chain.
    pub fn create<T: Typed>(&self) -> Result<T, Error> {
        Ok(self.entity::<T>()?.create::<T>()?)
    }

    /// Entities built so far, sorted by name.
    #[must_use]
    pub fn entities(&self) -> Vec<Arc<Entity>> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);
        let mut built: Vec<_> = entities.values().cloned().collect();
        built.sort_by(|a, b| a.name().cmp(b.name()));

        built
    }

    fn cached(&self, ty: &TypeToken) -> Option<Arc<Entity>> {
        let entities = self.entities.read().unwrap_or_else(PoisonError::into_inner);

        entities.get(&ty.id()).cloned()
    }
}

impl fmt::Debug for MetaModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .entities()
            .iter()
            .map(|entity| entity.name().to_string())
            .collect();

        f.debug_struct("MetaModel")
            .field("registry", &self.registry)
            .field("entities", &names)
            .finish_non_exhaustive()
    }
}
