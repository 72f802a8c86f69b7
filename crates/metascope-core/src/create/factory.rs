use crate::{
    create::CreationError,
    member::{MemberEnumerator, TypeRegistry},
    types::TypeToken,
    value::Instance,
};
use std::{fmt, sync::Arc};

///
/// ObjectFactory
///
/// External object factory keyed by target type. `Ok(None)` means the
/// factory does not know how to build that type.
///

pub trait ObjectFactory: fmt::Debug + Send + Sync {
    fn create(&self, ty: &TypeToken) -> Result<Option<Instance>, CreationError>;
}

/// Shared handle to an injected object factory.
pub type ObjectFactoryRef = Arc<dyn ObjectFactory>;

///
/// RegistryObjectFactory
///
/// Object factory backed by the constructors registered in a `TypeRegistry`.
///

#[derive(Clone, Debug)]
pub struct RegistryObjectFactory {
    registry: Arc<TypeRegistry>,
}

impl RegistryObjectFactory {
    #[must_use]
    pub const fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl ObjectFactory for RegistryObjectFactory {
    fn create(&self, ty: &TypeToken) -> Result<Option<Instance>, CreationError> {
        let Some(members) = self.registry.members(ty) else {
            return Ok(None);
        };

        match members.constructor() {
            Some(constructor) => constructor.construct().map(Some),
            None => Ok(None),
        }
    }
}
