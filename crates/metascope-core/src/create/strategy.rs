use crate::{
    create::{
        CreationError, CreationalStrategy, InstanceRegistry, ObjectFactoryRef, StrategyKind,
        check_assignable,
    },
    member::{Constructor, FactoryMethod, InstanceFactoryMethod},
    types::TypeToken,
    value::Instance,
};
use std::sync::Arc;

///
/// ConstructorStrategy
///
/// Zero-argument constructor of the target, or of its implementation type.
///

#[derive(Debug)]
pub struct ConstructorStrategy {
    target: TypeToken,
    constructor: Constructor,
}

impl ConstructorStrategy {
    #[must_use]
    pub const fn new(target: TypeToken, constructor: Constructor) -> Self {
        Self {
            target,
            constructor,
        }
    }
}

impl CreationalStrategy for ConstructorStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Constructor
    }

    fn target(&self) -> TypeToken {
        self.target
    }

    fn get_instance(&self) -> Result<Option<Instance>, CreationError> {
        self.constructor.construct().map(Some)
    }
}

///
/// FactoryMethodStrategy
///
/// Static no-argument factory method returning the target (or an accepted
/// substitute type).
///

#[derive(Debug)]
pub struct FactoryMethodStrategy {
    target: TypeToken,
    accepted: Vec<TypeToken>,
    method: FactoryMethod,
}

impl FactoryMethodStrategy {
    #[must_use]
    pub const fn new(target: TypeToken, accepted: Vec<TypeToken>, method: FactoryMethod) -> Self {
        Self {
            target,
            accepted,
            method,
        }
    }
}

impl CreationalStrategy for FactoryMethodStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FactoryMethod
    }

    fn target(&self) -> TypeToken {
        self.target
    }

    fn get_instance(&self) -> Result<Option<Instance>, CreationError> {
        let instance = self.method.invoke()?;

        check_assignable(self.kind(), &self.target, &self.accepted, instance).map(Some)
    }
}

///
/// FactoryInstanceStrategy
///
/// Obtain a factory object through a nested strategy, then call an
/// instance-level factory method on it.
///

#[derive(Debug)]
pub struct FactoryInstanceStrategy {
    target: TypeToken,
    accepted: Vec<TypeToken>,
    factory: Arc<dyn CreationalStrategy>,
    method: InstanceFactoryMethod,
}

impl FactoryInstanceStrategy {
    #[must_use]
    pub fn new(
        target: TypeToken,
        accepted: Vec<TypeToken>,
        factory: Arc<dyn CreationalStrategy>,
        method: InstanceFactoryMethod,
    ) -> Self {
        Self {
            target,
            accepted,
            factory,
            method,
        }
    }

    #[must_use]
    pub fn factory_kind(&self) -> StrategyKind {
        self.factory.kind()
    }
}

impl CreationalStrategy for FactoryInstanceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FactoryInstance
    }

    fn target(&self) -> TypeToken {
        self.target
    }

    fn get_instance(&self) -> Result<Option<Instance>, CreationError> {
        let factory = match self.factory.get_instance() {
            Ok(Some(factory)) => factory,
            Ok(None) => return Ok(None),
            Err(err) => {
                return Err(CreationError::Factory {
                    factory: self.factory.target().name().to_string(),
                    source: Box::new(err),
                });
            }
        };

        let instance = self.method.invoke(factory.as_any())?;

        check_assignable(self.kind(), &self.target, &self.accepted, instance).map(Some)
    }
}

///
/// ObjectFactoryStrategy
///

#[derive(Debug)]
pub struct ObjectFactoryStrategy {
    target: TypeToken,
    accepted: Vec<TypeToken>,
    factory: ObjectFactoryRef,
}

impl ObjectFactoryStrategy {
    #[must_use]
    pub fn new(target: TypeToken, factory: ObjectFactoryRef) -> Self {
        Self {
            target,
            accepted: Vec::new(),
            factory,
        }
    }

    /// Substitute types the factory may hand back instead of the target.
    #[must_use]
    pub fn with_accepted(mut self, accepted: Vec<TypeToken>) -> Self {
        self.accepted = accepted;
        self
    }
}

impl CreationalStrategy for ObjectFactoryStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ObjectFactory
    }

    fn target(&self) -> TypeToken {
        self.target
    }

    fn get_instance(&self) -> Result<Option<Instance>, CreationError> {
        match self.factory.create(&self.target)? {
            Some(instance) => {
                check_assignable(self.kind(), &self.target, &self.accepted, instance).map(Some)
            }
            None => Ok(None),
        }
    }
}

///
/// RegistryStrategy
///

#[derive(Debug)]
pub struct RegistryStrategy {
    target: TypeToken,
    accepted: Vec<TypeToken>,
    key: Option<String>,
    registry: Arc<dyn InstanceRegistry>,
}

impl RegistryStrategy {
    #[must_use]
    pub fn new(target: TypeToken, key: Option<String>, registry: Arc<dyn InstanceRegistry>) -> Self {
        Self {
            target,
            accepted: Vec::new(),
            key,
            registry,
        }
    }

    /// Substitute types the registry may hand back instead of the target.
    #[must_use]
    pub fn with_accepted(mut self, accepted: Vec<TypeToken>) -> Self {
        self.accepted = accepted;
        self
    }
}

impl CreationalStrategy for RegistryStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Registry
    }

    fn target(&self) -> TypeToken {
        self.target
    }

    fn get_instance(&self) -> Result<Option<Instance>, CreationError> {
        match self.registry.lookup(&self.target, self.key.as_deref())? {
            Some(instance) => {
                check_assignable(self.kind(), &self.target, &self.accepted, instance).map(Some)
            }
            None => Ok(None),
        }
    }
}
