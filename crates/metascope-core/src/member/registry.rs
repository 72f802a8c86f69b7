use crate::{
    member::{
        EntityResolver, Introspect, MemberEnumerator, OperationMember, PropertyMember,
        TypeBuilder, TypeMembers,
    },
    types::TypeToken,
};
use std::{
    any::TypeId,
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

type Introspector = fn() -> TypeMembers;

struct Entry {
    token: TypeToken,
    introspect: Introspector,
    members: OnceLock<Arc<TypeMembers>>,
}

impl Entry {
    fn members(&self) -> Arc<TypeMembers> {
        Arc::clone(self.members.get_or_init(|| Arc::new((self.introspect)())))
    }
}

///
/// TypeRegistry
///
/// Introspectable types known to a model. Registration only records the
/// introspection function; members are materialized on first use.
///

#[derive(Default)]
pub struct TypeRegistry {
    entries: RwLock<HashMap<TypeId, Arc<Entry>>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with<T: Introspect>(self) -> Self {
        self.register::<T>();
        self
    }

    /// Returns false if `T` was already registered.
    pub fn register<T: Introspect>(&self) -> bool {
        let token = T::type_token();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.contains_key(&token.id()) {
            return false;
        }

        entries.insert(
            token.id(),
            Arc::new(Entry {
                token,
                introspect: introspect::<T>,
                members: OnceLock::new(),
            }),
        );
        tracing::trace!(ty = token.name(), "registered type");

        true
    }

    #[must_use]
    pub fn is_registered(&self, ty: &TypeToken) -> bool {
        self.entry(ty).is_some()
    }

    /// Registered types, sorted by name.
    #[must_use]
    pub fn types(&self) -> Vec<TypeToken> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut types: Vec<_> = entries.values().map(|entry| entry.token).collect();
        types.sort();

        types
    }

    #[must_use]
    pub fn members(&self, ty: &TypeToken) -> Option<Arc<TypeMembers>> {
        self.entry(ty).map(|entry| entry.members())
    }

    /// Re-resolve a property member from its stable identifiers.
    #[must_use]
    pub fn property(&self, ty: &TypeToken, name: &str) -> Option<PropertyMember> {
        self.members(ty)?.property(name).cloned()
    }

    /// Re-resolve an operation member from its stable identifiers.
    #[must_use]
    pub fn operation(&self, ty: &TypeToken, name: &str) -> Option<OperationMember> {
        self.members(ty)?.operation(name).cloned()
    }

    fn entry(&self, ty: &TypeToken) -> Option<Arc<Entry>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        entries.get(&ty.id()).cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.types().iter().map(TypeToken::short_name).collect();

        f.debug_struct("TypeRegistry").field("types", &names).finish()
    }
}

impl MemberEnumerator for TypeRegistry {
    fn members(&self, ty: &TypeToken) -> Option<Arc<TypeMembers>> {
        Self::members(self, ty)
    }
}

impl EntityResolver for TypeRegistry {
    fn resolve_entity(&self, ty: &TypeToken) -> Option<Arc<TypeMembers>> {
        Self::members(self, ty)
    }
}

fn introspect<T: Introspect>() -> TypeMembers {
    let mut builder = TypeBuilder::<T>::new();
    T::introspect(&mut builder);

    builder.finish()
}
