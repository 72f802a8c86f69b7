//! Declarative marker metadata attached to types and members.
//!
//! Markers are plain values kept in a `Markers` bag and queried by their
//! concrete type. Any `Debug + Send + Sync` type can serve as a marker; the
//! built-in ones below are the ones the builder pipeline understands.

use crate::{
    detail::DetailPatch,
    model::RelationKind,
    qualifier::Qualifier,
    types::{TypeToken, Typed},
};
use std::{any::Any, fmt, sync::Arc};

///
/// Marker
///

pub trait Marker: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

impl<T> Marker for T
where
    T: Any + fmt::Debug + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

///
/// Markers
///

#[derive(Clone, Debug, Default)]
pub struct Markers {
    items: Vec<Arc<dyn Marker>>,
}

impl Markers {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Attach a marker; chainable from the member registration calls.
    pub fn mark<M: Marker>(&mut self, marker: M) -> &mut Self {
        self.items.push(Arc::new(marker));
        self
    }

    #[must_use]
    pub fn with<M: Marker>(mut self, marker: M) -> Self {
        self.items.push(Arc::new(marker));
        self
    }

    /// Every marker of type `M`, in attachment order.
    pub fn all<M: Marker>(&self) -> impl Iterator<Item = &M> {
        self.items
            .iter()
            .filter_map(|item| item.as_ref().as_any().downcast_ref::<M>())
    }

    #[must_use]
    pub fn first<M: Marker>(&self) -> Option<&M> {
        self.all::<M>().next()
    }

    #[must_use]
    pub fn has<M: Marker>(&self) -> bool {
        self.first::<M>().is_some()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//
// Member markers
//

/// Skip the member entirely.
#[derive(Clone, Copy, Debug)]
pub struct Ignore;

/// Inline the nested object's members into the owner's namespace.
#[derive(Clone, Copy, Debug)]
pub struct Embedded;

/// Marks the key property of an entity.
#[derive(Clone, Copy, Debug)]
pub struct Key;

/// Marks a property as not writable through its descriptor.
#[derive(Clone, Copy, Debug)]
pub struct Immutable;

/// Additional name the member can be looked up by.
#[derive(Clone, Debug)]
pub struct Alias(pub String);

impl Alias {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Rename the member.
#[derive(Clone, Debug)]
pub struct Named(pub String);

impl Named {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

///
/// Relation
///
/// Explicit relation metadata. With a qualifier it only applies to that
/// qualifier's overlay.
///

#[derive(Clone, Debug)]
pub struct Relation {
    pub kind: RelationKind,
    pub target: Option<String>,
    pub qualifier: Option<Qualifier>,
}

impl Relation {
    #[must_use]
    pub const fn new(kind: RelationKind) -> Self {
        Self {
            kind,
            target: None,
            qualifier: None,
        }
    }

    pub fn reference(target: impl Into<String>) -> Self {
        Self::new(RelationKind::Reference).target(target)
    }

    pub fn composition(target: impl Into<String>) -> Self {
        Self::new(RelationKind::Composition).target(target)
    }

    #[must_use]
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn qualified<Q: Any>(mut self) -> Self {
        self.qualifier = Some(Qualifier::of::<Q>());
        self
    }
}

///
/// Presentation
///
/// Presentation details for a type or member. Unset fields inherit; a
/// qualifier scopes the details to that qualifier's overlay.
///

#[derive(Clone, Debug, Default)]
pub struct Presentation {
    pub qualifier: Option<Qualifier>,
    pub detail: DetailPatch,
}

impl Presentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn qualified<Q: Any>(mut self) -> Self {
        self.qualifier = Some(Qualifier::of::<Q>());
        self
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.detail.visible = Some(visible);
        self
    }

    #[must_use]
    pub fn label(mut self, key: impl Into<String>) -> Self {
        self.detail.label = Some(key.into());
        self
    }

    #[must_use]
    pub fn description(mut self, key: impl Into<String>) -> Self {
        self.detail.description = Some(key.into());
        self
    }

    #[must_use]
    pub const fn order(mut self, order: i32) -> Self {
        self.detail.order = Some(order);
        self
    }

    #[must_use]
    pub fn render(mut self, hint: impl Into<String>) -> Self {
        self.detail
            .render_hints
            .get_or_insert_with(Vec::new)
            .push(hint.into());
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.detail.format = Some(format.into());
        self
    }

    #[must_use]
    pub const fn inline(mut self, inline: bool) -> Self {
        self.detail.inline = Some(inline);
        self
    }
}

//
// Type markers
//

/// Explicit entity name; otherwise the short type name is used.
#[derive(Clone, Debug)]
pub struct EntityName(pub String);

impl EntityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Type-level alias declaration: `alias` resolves to the member `target`.
#[derive(Clone, Debug)]
pub struct AliasOf {
    pub alias: String,
    pub target: String,
}

impl AliasOf {
    pub fn new(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            target: target.into(),
        }
    }
}

/// Concrete type substituted for the entity when creating instances.
#[derive(Clone, Copy, Debug)]
pub struct ImplementedBy(pub TypeToken);

impl ImplementedBy {
    #[must_use]
    pub fn of<T: Typed>() -> Self {
        Self(T::type_token())
    }
}

///
/// FactoryRef
///
/// External factory binding: an instance of `factory` is obtained first,
/// then its instance factory method `method` produces the entity.
///

#[derive(Clone, Debug)]
pub struct FactoryRef {
    pub factory: TypeToken,
    pub method: String,
    pub key: Option<String>,
}

impl FactoryRef {
    pub fn of<F: Typed>(method: impl Into<String>) -> Self {
        Self {
            factory: F::type_token(),
            method: method.into(),
            key: None,
        }
    }

    /// Key used when the factory object is looked up in the instance registry.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Key used to look the entity itself up in the instance registry.
#[derive(Clone, Debug)]
pub struct RegistryKey(pub String);

impl RegistryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}
