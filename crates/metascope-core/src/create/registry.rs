use crate::{create::CreationError, types::TypeToken, value::Instance};
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

///
/// InstanceRegistry
///
/// Pre-registered instances and named providers, looked up by type or by
/// (type, key).
///

pub trait InstanceRegistry: fmt::Debug + Send + Sync {
    fn lookup(&self, ty: &TypeToken, key: Option<&str>) -> Result<Option<Instance>, CreationError>;
}

type Provider = Arc<dyn Fn() -> Instance + Send + Sync>;

///
/// SimpleInstanceRegistry
///

#[derive(Default)]
pub struct SimpleInstanceRegistry {
    instances: HashMap<TypeId, Instance>,
    providers: HashMap<(TypeId, String), Provider>,
}

impl SimpleInstanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_instance<T>(mut self, value: T) -> Self
    where
        T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
    {
        self.register_instance(value);
        self
    }

    #[must_use]
    pub fn with_provider<T, F>(mut self, key: impl Into<String>, provider: F) -> Self
    where
        T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register_provider(key, provider);
        self
    }

    pub fn register_instance<T>(&mut self, value: T)
    where
        T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
    {
        self.instances.insert(TypeId::of::<T>(), Instance::new(value));
    }

    pub fn register_provider<T, F>(&mut self, key: impl Into<String>, provider: F)
    where
        T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.providers.insert(
            (TypeId::of::<T>(), key.into()),
            Arc::new(move || Instance::new(provider())),
        );
    }
}

impl fmt::Debug for SimpleInstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.providers.keys().map(|(_, key)| key.as_str()).collect();

        f.debug_struct("SimpleInstanceRegistry")
            .field("instances", &self.instances.len())
            .field("providers", &keys)
            .finish()
    }
}

impl InstanceRegistry for SimpleInstanceRegistry {
    fn lookup(&self, ty: &TypeToken, key: Option<&str>) -> Result<Option<Instance>, CreationError> {
        let found = match key {
            Some(key) => self
                .providers
                .get(&(ty.id(), key.to_string()))
                .map(|provider| provider()),
            None => self.instances.get(&ty.id()).cloned(),
        };

        Ok(found)
    }
}
