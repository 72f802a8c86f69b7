use crate::{
    reference::{AccessError, ValueReference, target_mut, target_ref},
    types::{TypeToken, Typed},
    value::{FieldValue, Value},
};
use std::{any::Any, fmt};

///
/// FieldReference
///
/// Direct accessor for one field of `T`. Without a mutable accessor the
/// reference is read-only.
///

pub struct FieldReference<T, F> {
    name: String,
    value_type: TypeToken,
    get: fn(&T) -> &F,
    get_mut: Option<fn(&mut T) -> &mut F>,
}

impl<T, F> FieldReference<T, F>
where
    T: Any,
    F: FieldValue + Typed,
{
    pub fn new(name: impl Into<String>, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self {
        Self {
            name: name.into(),
            value_type: F::type_token(),
            get,
            get_mut: Some(get_mut),
        }
    }

    pub fn read_only(name: impl Into<String>, get: fn(&T) -> &F) -> Self {
        Self {
            name: name.into(),
            value_type: F::type_token(),
            get,
            get_mut: None,
        }
    }

    fn accessor_mut(&self) -> Result<fn(&mut T) -> &mut F, AccessError> {
        self.get_mut.ok_or_else(|| AccessError::ReadOnly {
            name: self.name.clone(),
        })
    }
}

impl<T, F> fmt::Debug for FieldReference<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldReference")
            .field("name", &self.name)
            .field("owner", &std::any::type_name::<T>())
            .field("value_type", &self.value_type.name())
            .field("read_only", &self.get_mut.is_none())
            .finish()
    }
}

impl<T, F> ValueReference for FieldReference<T, F>
where
    T: Any,
    F: FieldValue + Typed,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn value_type(&self) -> TypeToken {
        self.value_type
    }

    fn is_read_only(&self) -> bool {
        self.get_mut.is_none()
    }

    fn get_value(&self, target: &dyn Any) -> Result<Value, AccessError> {
        let target = target_ref::<T>(target)?;

        Ok((self.get)(target).to_value())
    }

    fn set_value(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let get_mut = self.accessor_mut()?;
        let target = target_mut::<T>(target)?;
        let typed = F::from_value(&value).ok_or_else(|| AccessError::TypeMismatch {
            name: self.name.clone(),
            expected: self.value_type.name(),
            found: value.kind(),
        })?;

        *get_mut(target) = typed;

        Ok(())
    }

    fn resolve<'a>(&self, target: &'a dyn Any) -> Result<Option<&'a dyn Any>, AccessError> {
        let target = target_ref::<T>(target)?;

        Ok((self.get)(target).as_object())
    }

    fn resolve_mut<'a>(
        &self,
        target: &'a mut dyn Any,
    ) -> Result<Option<&'a mut dyn Any>, AccessError> {
        let get_mut = self.accessor_mut()?;
        let target = target_mut::<T>(target)?;

        Ok(get_mut(target).as_object_mut())
    }
}
