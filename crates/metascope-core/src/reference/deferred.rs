use crate::{
    create::ObjectFactoryRef,
    reference::{AccessError, ValueReference},
    types::TypeToken,
    value::Value,
};
use std::{any::Any, fmt, sync::Arc};

///
/// DeferredReference
///
/// Reads `outer` first, then delegates to `inner` on the value found there.
///
/// - read through an absent outer value yields `Value::Null`
/// - write through an absent outer value creates it with the object factory
///   when one is configured, and fails otherwise
///

pub struct DeferredReference {
    name: String,
    outer: Arc<dyn ValueReference>,
    inner: Arc<dyn ValueReference>,
    factory: Option<ObjectFactoryRef>,
}

impl DeferredReference {
    pub fn new(
        name: impl Into<String>,
        outer: Arc<dyn ValueReference>,
        inner: Arc<dyn ValueReference>,
        factory: Option<ObjectFactoryRef>,
    ) -> Self {
        Self {
            name: name.into(),
            outer,
            inner,
            factory,
        }
    }

    #[must_use]
    pub fn outer(&self) -> &Arc<dyn ValueReference> {
        &self.outer
    }

    #[must_use]
    pub fn inner(&self) -> &Arc<dyn ValueReference> {
        &self.inner
    }

    fn null_intermediate(&self) -> AccessError {
        AccessError::NullIntermediate {
            name: self.outer.name().to_string(),
        }
    }

    // Populate the absent outer value through the object factory.
    fn create_intermediate(&self, target: &mut dyn Any) -> Result<(), AccessError> {
        let Some(factory) = &self.factory else {
            return Err(self.null_intermediate());
        };

        let object_type = self.outer.value_type().object_type();
        let instance = factory
            .create(&object_type)
            .map_err(|err| AccessError::Creation {
                name: self.outer.name().to_string(),
                source: Box::new(err),
            })?
            .ok_or_else(|| self.null_intermediate())?;

        tracing::trace!(
            reference = %self.name,
            intermediate = object_type.name(),
            "created missing intermediate"
        );

        self.outer.set_value(target, Value::Instance(instance))
    }
}

impl fmt::Debug for DeferredReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredReference")
            .field("name", &self.name)
            .field("outer", &self.outer)
            .field("inner", &self.inner)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

impl ValueReference for DeferredReference {
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> TypeToken {
        self.inner.value_type()
    }

    fn is_read_only(&self) -> bool {
        self.outer.is_read_only() || self.inner.is_read_only()
    }

    fn get_value(&self, target: &dyn Any) -> Result<Value, AccessError> {
        match self.outer.resolve(target)? {
            Some(object) => self.inner.get_value(object),
            None => Ok(Value::Null),
        }
    }

    fn set_value(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        if self.outer.resolve_mut(target)?.is_none() {
            self.create_intermediate(target)?;
        }

        match self.outer.resolve_mut(target)? {
            Some(object) => self.inner.set_value(object, value),
            None => Err(self.null_intermediate()),
        }
    }

    fn resolve<'a>(&self, target: &'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError> {
        match self.outer.resolve(target)? {
            Some(object) => self.inner.resolve(object),
            None => Ok(None),
        }
    }

    fn resolve_mut<'a>(
        &self,
        target: &'a mut dyn Any,
    ) -> Result<Option<&'a mut dyn Any>, AccessError> {
        match self.outer.resolve_mut(target)? {
            Some(object) => self.inner.resolve_mut(object),
            None => Ok(None),
        }
    }
}
