//! Creational strategies: how an instance of a described type is produced.
//!
//! An entity carries an ordered `CreationChain`. Strategies are tried in
//! registration order; the first one that yields an instance wins, and
//! failures are collected so the aggregate error carries every cause.

mod factory;
mod registry;
mod strategy;


pub use factory::{ObjectFactory, ObjectFactoryRef, RegistryObjectFactory};
pub use registry::{InstanceRegistry, SimpleInstanceRegistry};
pub use strategy::{
    ConstructorStrategy, FactoryInstanceStrategy, FactoryMethodStrategy, ObjectFactoryStrategy,
    RegistryStrategy,
};

use crate::{ThisError, types::TypeToken, value::Instance};
use derive_more::Display;
use std::{any::Any, fmt, sync::Arc};

///
/// CreationError
///

#[derive(Debug, ThisError)]
pub enum CreationError {
    #[error("no creational strategy configured for '{entity}'")]
    NoStrategy { entity: String },

    #[error("{kind} strategy for '{target}' failed: {message}")]
    Failed {
        kind: StrategyKind,
        target: String,
        message: String,
    },

    #[error("{kind} strategy for '{target}' produced no instance")]
    Unavailable { kind: StrategyKind, target: String },

    #[error("{kind} strategy for '{target}' produced a '{found}'")]
    Mismatch {
        kind: StrategyKind,
        target: String,
        found: &'static str,
    },

    #[error("created instance is a '{found}', not a '{target}'")]
    Downcast { target: &'static str, found: &'static str },

    #[error("factory object '{factory}' unavailable: {source}")]
    Factory {
        factory: String,
        #[source]
        source: Box<Self>,
    },

    #[error("all {} creational strategies failed for '{entity}'", causes.len())]
    Exhausted {
        entity: String,
        causes: Vec<Self>,
    },
}

impl CreationError {
    pub fn failed(kind: StrategyKind, target: &TypeToken, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            target: target.name().to_string(),
            message: message.into(),
        }
    }

    /// Every underlying failure; a single-element slice for leaf errors.
    #[must_use]
    pub fn causes(&self) -> &[Self] {
        match self {
            Self::Exhausted { causes, .. } => causes,
            other => std::slice::from_ref(other),
        }
    }
}

///
/// StrategyKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum StrategyKind {
    #[display("constructor")]
    Constructor,
    #[display("factory-instance")]
    FactoryInstance,
    #[display("factory-method")]
    FactoryMethod,
    #[display("object-factory")]
    ObjectFactory,
    #[display("registry")]
    Registry,
}

///
/// CreationalStrategy
///
/// `Ok(None)` means the mechanism had nothing to offer; the chain moves on.
///

pub trait CreationalStrategy: fmt::Debug + Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn target(&self) -> TypeToken;

    fn get_instance(&self) -> Result<Option<Instance>, CreationError>;
}

///
/// CreationChain
///

#[derive(Clone, Debug, Default)]
pub struct CreationChain {
    entity: String,
    strategies: Vec<Arc<dyn CreationalStrategy>>,
}

impl CreationChain {
    pub fn new(entity: impl Into<String>, strategies: Vec<Arc<dyn CreationalStrategy>>) -> Self {
        Self {
            entity: entity.into(),
            strategies,
        }
    }

    #[must_use]
    pub fn strategies(&self) -> &[Arc<dyn CreationalStrategy>] {
        &self.strategies
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Try each strategy in order; the first instance wins.
    pub fn create(&self) -> Result<Instance, CreationError> {
        if self.strategies.is_empty() {
            return Err(CreationError::NoStrategy {
                entity: self.entity.clone(),
            });
        }

        let mut causes = Vec::new();

        for strategy in &self.strategies {
            match strategy.get_instance() {
                Ok(Some(instance)) => return Ok(instance),
                Ok(None) => causes.push(CreationError::Unavailable {
                    kind: strategy.kind(),
                    target: strategy.target().name().to_string(),
                }),
                Err(err) => {
                    tracing::debug!(
                        entity = %self.entity,
                        strategy = %strategy.kind(),
                        error = %err,
                        "creational strategy failed"
                    );
                    causes.push(err);
                }
            }
        }

        Err(CreationError::Exhausted {
            entity: self.entity.clone(),
            causes,
        })
    }

    /// Create and downcast to the concrete type.
    pub fn create_as<T: Any>(&self) -> Result<T, CreationError> {
        let instance = self.create()?;
        let found = instance.type_name();

        instance.take::<T>().ok_or(CreationError::Downcast {
            target: std::any::type_name::<T>(),
            found,
        })
    }
}

// Reject instances that are neither the target nor its substitute.
pub(crate) fn check_assignable(
    kind: StrategyKind,
    target: &TypeToken,
    accepted: &[TypeToken],
    instance: Instance,
) -> Result<Instance, CreationError> {
    let id = instance.type_id();

    if id == target.id() || accepted.iter().any(|token| token.id() == id) {
        Ok(instance)
    } else {
        Err(CreationError::Mismatch {
            kind,
            target: target.name().to_string(),
            found: instance.type_name(),
        })
    }
}
