use std::{
    any::{Any, TypeId},
    fmt,
};

///
/// DynInstance
///
/// Object-safe view of a domain object that can be cloned, compared and
/// downcast. Implemented for every `Clone + Debug + PartialEq` type.
///

pub trait DynInstance: Any + fmt::Debug + Send + Sync {
    fn clone_box(&self) -> Box<dyn DynInstance>;

    fn eq_dyn(&self, other: &dyn DynInstance) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn type_name(&self) -> &'static str;
}

impl<T> DynInstance for T
where
    T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
{
    fn clone_box(&self) -> Box<dyn DynInstance> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DynInstance) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

///
/// Instance
///
/// An owned, type-erased domain object: what creational strategies produce
/// and what `Value::Instance` carries.
///

pub struct Instance(Box<dyn DynInstance>);

impl Instance {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Clone + fmt::Debug + PartialEq + Send + Sync,
    {
        Self(Box::new(value))
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.as_any_mut().downcast_mut::<T>()
    }

    /// Take the concrete value out; `None` when the instance is another type.
    #[must_use]
    pub fn take<T: Any>(self) -> Option<T> {
        self.0.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    #[must_use]
    pub fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }

    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self.0.as_any_mut()
    }
}

impl Clone for Instance {
    fn clone(&self) -> Self {
        Self(self.0.clone_box())
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}
