//! Value references: composable get/set accessors decoupled from storage.
//!
//! A reference reads and writes one value on a type-erased target. Chains
//! through embedded objects are built by nesting `DeferredReference`s, so a
//! single reference can reach any depth.

mod collection;
mod deferred;
mod field;
mod operation;

#[cfg(test)]
mod tests;

pub use collection::{CollectionAccess, CollectionOps, CollectionValue};
pub use deferred::DeferredReference;
pub use field::FieldReference;
pub use operation::{EmbeddedOperationReference, Invoker, MethodReference, OperationReference};

use crate::{ThisError, create::CreationError, types::TypeToken, value::Value};
use std::{any::Any, fmt};

///
/// AccessError
///
/// Failures reading, writing or invoking through a reference. These are
/// reported to the caller of the accessor and never retried.
///

#[derive(Debug, ThisError)]
pub enum AccessError {
    #[error("target is not a '{expected}'")]
    WrongTarget { expected: &'static str },

    #[error("'{name}' expects a {expected} value, got {found}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{name}' is read-only")]
    ReadOnly { name: String },

    #[error("'{name}' has no value to navigate through")]
    NullIntermediate { name: String },

    #[error("'{name}' expects {expected} arguments, got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("'{name}' failed: {message}")]
    Invocation { name: String, message: String },

    #[error("could not create intermediate '{name}': {source}")]
    Creation {
        name: String,
        #[source]
        source: Box<CreationError>,
    },
}

impl AccessError {
    pub fn invocation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invocation {
            name: name.into(),
            message: message.into(),
        }
    }
}

///
/// ValueReference
///
/// `resolve`/`resolve_mut` expose the referenced value as a navigable object
/// (`None` when it is absent); they are what deferred chains walk through.
///

pub trait ValueReference: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn value_type(&self) -> TypeToken;

    fn is_read_only(&self) -> bool;

    fn get_value(&self, target: &dyn Any) -> Result<Value, AccessError>;

    fn set_value(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError>;

    fn resolve<'a>(&self, target: &'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError>;

    fn resolve_mut<'a>(
        &self,
        target: &'a mut dyn Any,
    ) -> Result<Option<&'a mut dyn Any>, AccessError>;
}

// Downcast a reference target.
pub(crate) fn target_ref<T: Any>(target: &dyn Any) -> Result<&T, AccessError> {
    target
        .downcast_ref::<T>()
        .ok_or_else(|| AccessError::WrongTarget {
            expected: std::any::type_name::<T>(),
        })
}

// Downcast a mutable reference target.
pub(crate) fn target_mut<T: Any>(target: &mut dyn Any) -> Result<&mut T, AccessError> {
    target
        .downcast_mut::<T>()
        .ok_or_else(|| AccessError::WrongTarget {
            expected: std::any::type_name::<T>(),
        })
}
