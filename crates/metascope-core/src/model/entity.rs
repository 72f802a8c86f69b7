use crate::{
    create::{CreationChain, CreationError},
    detail::Detail,
    model::{Extensions, Operation, Property, QualifiedOperation, QualifiedProperty},
    qualifier::{Overlay, OverlayCache, Qualifier},
    types::TypeToken,
    value::Instance,
};
use derive_more::Deref;
use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

///
/// EntityMember
///
/// Uniform lookup result over properties and operations.
///

#[derive(Clone, Debug)]
pub enum EntityMember {
    Property(Arc<Property>),
    Operation(Arc<Operation>),
}

impl EntityMember {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Property(property) => property.name(),
            Self::Operation(operation) => operation.name(),
        }
    }

    #[must_use]
    pub const fn as_property(&self) -> Option<&Arc<Property>> {
        match self {
            Self::Property(property) => Some(property),
            Self::Operation(_) => None,
        }
    }

    #[must_use]
    pub const fn as_operation(&self) -> Option<&Arc<Operation>> {
        match self {
            Self::Operation(operation) => Some(operation),
            Self::Property(_) => None,
        }
    }
}

///
/// EntityModel
///
/// Unqualified entity descriptor.
///
/// Invariants established by the builder:
/// - every alias target is a key of `members`
/// - no alias names itself
/// - member names are unique across properties and operations
///

#[derive(Debug)]
pub struct EntityModel {
    pub(crate) name: String,
    pub(crate) entity_type: TypeToken,
    pub(crate) properties: Vec<Arc<Property>>,
    pub(crate) operations: Vec<Arc<Operation>>,
    pub(crate) members: BTreeMap<String, EntityMember>,
    pub(crate) aliases: BTreeMap<String, String>,
    pub(crate) key_property: Option<Arc<Property>>,
    pub(crate) extensions: Extensions,
    pub(crate) creation: CreationChain,
    pub(crate) detail: Detail,
}

impl EntityModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn entity_type(&self) -> TypeToken {
        self.entity_type
    }

    /// Properties in declaration order, embedded ones flattened in place.
    #[must_use]
    pub fn properties(&self) -> &[Arc<Property>] {
        &self.properties
    }

    #[must_use]
    pub fn operations(&self) -> &[Arc<Operation>] {
        &self.operations
    }

    #[must_use]
    pub const fn members(&self) -> &BTreeMap<String, EntityMember> {
        &self.members
    }

    #[must_use]
    pub const fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Canonical member name for `name`, following an alias if there is one.
    #[must_use]
    pub fn resolve_alias<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Member by canonical name or alias.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&EntityMember> {
        self.members.get(self.resolve_alias(name))
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        self.member(name).and_then(EntityMember::as_property)
    }

    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Arc<Operation>> {
        self.member(name).and_then(EntityMember::as_operation)
    }

    #[must_use]
    pub const fn key_property(&self) -> Option<&Arc<Property>> {
        self.key_property.as_ref()
    }

    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    #[must_use]
    pub fn extension<T: Any>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    #[must_use]
    pub const fn creation(&self) -> &CreationChain {
        &self.creation
    }

    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    /// Run the creational chain; the first strategy to produce an instance
    /// wins.
    pub fn create_entity(&self) -> Result<Instance, CreationError> {
        self.creation.create()
    }

    pub fn create<T: Any>(&self) -> Result<T, CreationError> {
        self.creation.create_as::<T>()
    }
}

impl fmt::Display for EntityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "entity {} ({})", self.name, self.entity_type.short_name())?;

        for property in &self.properties {
            writeln!(f, "  {property}")?;
        }
        for operation in &self.operations {
            writeln!(f, "  {operation}")?;
        }
        for (alias, target) in &self.aliases {
            writeln!(f, "  alias {alias} -> {target}")?;
        }

        Ok(())
    }
}

///
/// QualifiedEntity
///

pub type QualifiedEntity = Overlay<EntityModel>;

impl Overlay<EntityModel> {
    /// Property seen through this overlay's qualifier.
    #[must_use]
    pub fn qualified_property(&self, name: &str) -> Option<&Arc<QualifiedProperty>> {
        let property = self.delegate().property(name)?;

        Some(match self.qualifier() {
            Some(qualifier) => property.qualified(&qualifier),
            None => property.unqualified(),
        })
    }

    #[must_use]
    pub fn qualified_operation(&self, name: &str) -> Option<&Arc<QualifiedOperation>> {
        let operation = self.delegate().operation(name)?;

        Some(match self.qualifier() {
            Some(qualifier) => operation.qualified(&qualifier),
            None => operation.unqualified(),
        })
    }

    /// Visible properties under this qualifier, ordered by their `order`
    /// detail, then declaration order.
    #[must_use]
    pub fn visible_properties(&self) -> Vec<&Arc<QualifiedProperty>> {
        let mut visible: Vec<_> = self
            .delegate()
            .properties()
            .iter()
            .map(|property| match self.qualifier() {
                Some(qualifier) => property.qualified(&qualifier),
                None => property.unqualified(),
            })
            .filter(|property| property.is_visible())
            .collect();
        visible.sort_by_key(|property| property.order().unwrap_or(i32::MAX));

        visible
    }
}

///
/// Entity
///

#[derive(Debug, Deref)]
pub struct Entity {
    #[deref(forward)]
    model: Arc<EntityModel>,
    unqualified: Arc<QualifiedEntity>,
    overlays: OverlayCache<QualifiedEntity>,
}

impl Entity {
    pub(crate) fn new(model: Arc<EntityModel>, overlays: OverlayCache<QualifiedEntity>) -> Self {
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
    pub const fn model(&self) -> &Arc<EntityModel> {
        &self.model
    }

    #[must_use]
    pub const fn unqualified(&self) -> &Arc<QualifiedEntity> {
        &self.unqualified
    }

    #[must_use]
    pub fn qualified(&self, qualifier: &Qualifier) -> &Arc<QualifiedEntity> {
        self.overlays.get(qualifier).unwrap_or(&self.unqualified)
    }

    #[must_use]
    pub fn overlay(&self, qualifier: &Qualifier) -> Option<&Arc<QualifiedEntity>> {
        self.overlays.get(qualifier)
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Qualifier> {
        self.overlays.qualifiers()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.model.as_ref(), f)
    }
}
