use crate::{
    detail::Detail,
    model::{Extensions, RelationModel},
    qualifier::{Overlay, OverlayCache, Qualifier},
    reference::{AccessError, CollectionOps, ValueReference},
    types::{Cardinality, TypeToken},
    value::Value,
};
use derive_more::Deref;
use std::{any::Any, fmt, sync::Arc};

///
/// CollectionModel
///
/// Collection capability: element type plus collection-shaped operations.
///

#[derive(Clone, Debug)]
pub struct CollectionModel {
    pub(crate) element_type: TypeToken,
    pub(crate) ops: Arc<dyn CollectionOps>,
}

impl CollectionModel {
    pub(crate) fn new(ops: Arc<dyn CollectionOps>) -> Self {
        Self {
            element_type: ops.element_type(),
            ops,
        }
    }

    #[must_use]
    pub const fn element_type(&self) -> TypeToken {
        self.element_type
    }
}

///
/// PropertyModel
///
/// Unqualified property descriptor. The name is final: aliases and
/// embedding prefixes are already applied.
///

#[derive(Debug)]
pub struct PropertyModel {
    pub(crate) name: String,
    pub(crate) value_type: TypeToken,
    pub(crate) cardinality: Cardinality,
    pub(crate) immutable: bool,
    pub(crate) key: bool,
    pub(crate) relation: Option<RelationModel>,
    pub(crate) reference: Arc<dyn ValueReference>,
    pub(crate) collection: Option<CollectionModel>,
    pub(crate) extensions: Extensions,
    pub(crate) detail: Detail,
}

impl PropertyModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> TypeToken {
        self.value_type
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn is_immutable(&self) -> bool {
        self.immutable
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.key
    }

    /// Composed accessor from the entity root.
    #[must_use]
    pub const fn reference(&self) -> &Arc<dyn ValueReference> {
        &self.reference
    }

    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    #[must_use]
    pub fn extension<T: Any>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    /// Unqualified presentation detail.
    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    #[must_use]
    pub const fn as_relation(&self) -> Option<&RelationModel> {
        self.relation.as_ref()
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<CollectionProperty<'_>> {
        self.collection.as_ref().map(|collection| CollectionProperty {
            property: self,
            collection,
        })
    }

    pub fn get_value(&self, root: &dyn Any) -> Result<Value, AccessError> {
        self.reference.get_value(root)
    }

    pub fn set_value(&self, root: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        if self.immutable {
            return Err(AccessError::ReadOnly {
                name: self.name.clone(),
            });
        }

        self.reference.set_value(root, value)
    }
}

impl fmt::Display for PropertyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}]",
            self.name,
            self.value_type.short_name(),
            self.cardinality
        )?;

        if self.key {
            f.write_str(" key")?;
        }
        if self.immutable {
            f.write_str(" immutable")?;
        }
        if let Some(relation) = &self.relation {
            write!(f, " ({relation})")?;
        }

        Ok(())
    }
}

///
/// CollectionProperty
///
/// Collection view of a property; every call navigates from the entity
/// root through the property's composed reference.
///

#[derive(Clone, Copy, Debug)]
pub struct CollectionProperty<'a> {
    property: &'a PropertyModel,
    collection: &'a CollectionModel,
}

impl CollectionProperty<'_> {
    #[must_use]
    pub const fn element_type(&self) -> TypeToken {
        self.collection.element_type
    }

    pub fn add(&self, root: &mut dyn Any, element: &Value) -> Result<bool, AccessError> {
        let collection = self.resolve_mut(root)?;

        self.collection.ops.add(collection, element)
    }

    pub fn remove(&self, root: &mut dyn Any, element: &Value) -> Result<bool, AccessError> {
        let collection = self.resolve_mut(root)?;

        self.collection.ops.remove(collection, element)
    }

    pub fn contains(&self, root: &dyn Any, element: &Value) -> Result<bool, AccessError> {
        match self.property.reference.resolve(root)? {
            Some(collection) => self.collection.ops.contains(collection, element),
            None => Ok(false),
        }
    }

    /// Elements in iteration order of the underlying collection.
    pub fn values(&self, root: &dyn Any) -> Result<Vec<Value>, AccessError> {
        match self.property.reference.resolve(root)? {
            Some(collection) => self.collection.ops.values(collection),
            None => Ok(Vec::new()),
        }
    }

    pub fn size(&self, root: &dyn Any) -> Result<usize, AccessError> {
        match self.property.reference.resolve(root)? {
            Some(collection) => self.collection.ops.size(collection),
            None => Ok(0),
        }
    }

    pub fn clear(&self, root: &mut dyn Any) -> Result<(), AccessError> {
        let collection = self.resolve_mut(root)?;

        self.collection.ops.clear(collection)
    }

    fn resolve_mut<'r>(&self, root: &'r mut dyn Any) -> Result<&'r mut dyn Any, AccessError> {
        if self.property.immutable {
            return Err(AccessError::ReadOnly {
                name: self.property.name.clone(),
            });
        }

        self.property
            .reference
            .resolve_mut(root)?
            .ok_or_else(|| AccessError::NullIntermediate {
                name: self.property.name.clone(),
            })
    }
}

///
/// QualifiedProperty
///

pub type QualifiedProperty = Overlay<PropertyModel>;

impl Overlay<PropertyModel> {
    /// A relation declared for this overlay's qualifier shadows the
    /// property's own.
    #[must_use]
    pub fn as_relation(&self) -> Option<&RelationModel> {
        self.own_relation().or_else(|| self.delegate().as_relation())
    }
}

///
/// Property
///
/// A property descriptor with its qualifier overlays.
///

#[derive(Debug, Deref)]
pub struct Property {
    #[deref(forward)]
    model: Arc<PropertyModel>,
    unqualified: Arc<QualifiedProperty>,
    overlays: OverlayCache<QualifiedProperty>,
}

impl Property {
    pub(crate) fn new(
        model: Arc<PropertyModel>,
        overlays: OverlayCache<QualifiedProperty>,
    ) -> Self {
        let unqualified = Arc::new(Overlay::new(
            None,
            model.detail.clone(),
            Arc::clone(&model),
        ));

        Self {
            model,
            unqualified,
            overlays,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &Arc<PropertyModel> {
        &self.model
    }

    #[must_use]
    pub const fn unqualified(&self) -> &Arc<QualifiedProperty> {
        &self.unqualified
    }

    /// Overlay for `qualifier`, or the unqualified view when there is none.
    #[must_use]
    pub fn qualified(&self, qualifier: &Qualifier) -> &Arc<QualifiedProperty> {
        self.overlays.get(qualifier).unwrap_or(&self.unqualified)
    }

    #[must_use]
    pub fn overlay(&self, qualifier: &Qualifier) -> Option<&Arc<QualifiedProperty>> {
        self.overlays.get(qualifier)
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Qualifier> {
        self.overlays.qualifiers()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.model.as_ref(), f)
    }
}
