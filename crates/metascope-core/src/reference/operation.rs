use crate::{
    reference::{AccessError, ValueReference, target_mut},
    value::Value,
};
use std::{any::Any, fmt, sync::Arc};

///
/// OperationReference
///
/// Invocation handle for an operation on a type-erased target.
///

pub trait OperationReference: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn invoke(&self, target: &mut dyn Any, args: &[Value]) -> Result<Value, AccessError>;
}

/// Typed invoker registered for an operation of `T`.
pub type Invoker<T> = Arc<dyn Fn(&mut T, &[Value]) -> Result<Value, AccessError> + Send + Sync>;

///
/// MethodReference
///

pub struct MethodReference<T> {
    name: String,
    invoker: Invoker<T>,
}

impl<T: Any> MethodReference<T> {
    pub fn new(name: impl Into<String>, invoker: Invoker<T>) -> Self {
        Self {
            name: name.into(),
            invoker,
        }
    }
}

impl<T> fmt::Debug for MethodReference<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodReference")
            .field("name", &self.name)
            .field("owner", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: Any> OperationReference for MethodReference<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, target: &mut dyn Any, args: &[Value]) -> Result<Value, AccessError> {
        let target = target_mut::<T>(target)?;

        (self.invoker)(target, args)
    }
}

///
/// EmbeddedOperationReference
///
/// Operation declared on an embedded object: navigate `path` from the root,
/// then invoke on the object found there.
///

#[derive(Debug)]
pub struct EmbeddedOperationReference {
    name: String,
    path: Arc<dyn ValueReference>,
    inner: Arc<dyn OperationReference>,
}

impl EmbeddedOperationReference {
    pub fn new(
        name: impl Into<String>,
        path: Arc<dyn ValueReference>,
        inner: Arc<dyn OperationReference>,
    ) -> Self {
        Self {
            name: name.into(),
            path,
            inner,
        }
    }
}

impl OperationReference for EmbeddedOperationReference {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke(&self, target: &mut dyn Any, args: &[Value]) -> Result<Value, AccessError> {
        match self.path.resolve_mut(target)? {
            Some(object) => self.inner.invoke(object, args),
            None => Err(AccessError::NullIntermediate {
                name: self.path.name().to_string(),
            }),
        }
    }
}
