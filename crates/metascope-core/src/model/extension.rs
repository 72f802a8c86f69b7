use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::Arc,
};

///
/// Extensions
///
/// Typed side data attached by post-processors, one value per type.
///

#[derive(Clone, Default)]
pub struct Extensions {
    items: HashMap<TypeId, (&'static str, Arc<dyn Any + Send + Sync>)>,
}

impl Extensions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a previous value of the same type was replaced.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> bool {
        self.items
            .insert(
                TypeId::of::<T>(),
                (std::any::type_name::<T>(), Arc::new(value)),
            )
            .is_some()
    }

    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.items
            .get(&TypeId::of::<T>())
            .and_then(|(_, value)| value.downcast_ref::<T>())
    }

    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.items.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.items.values().map(|(name, _)| *name).collect();
        names.sort_unstable();

        f.debug_set().entries(names).finish()
    }
}
