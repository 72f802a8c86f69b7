//! Member enumeration: the structural introspection boundary.
//!
//! Domain types describe themselves by implementing `Introspect`, filling a
//! `TypeBuilder` with typed accessors, invokers and constructors. The
//! `TypeRegistry` keeps those registrations and hands out `TypeMembers`
//! on demand.

mod builder;
mod registry;
mod resolver;


pub use builder::TypeBuilder;
pub use registry::TypeRegistry;
pub use resolver::{AttributeResolver, MarkerAttributeResolver};

use crate::{
    create::CreationError,
    marker::{Marker, Markers},
    reference::{CollectionOps, OperationReference, ValueReference},
    types::{TypeToken, Typed},
    value::Instance,
};
use std::{any::Any, fmt, sync::Arc};

///
/// Introspect
///
/// Implemented by every type the engine can describe.
///

pub trait Introspect: Typed + Clone + fmt::Debug + PartialEq + Send + Sync {
    fn introspect(ty: &mut TypeBuilder<Self>);
}

///
/// Member
///
/// Common view over declared properties and operations.
///

pub trait Member: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn declaring_type(&self) -> TypeToken;

    /// Declared value type; for operations this is the result type.
    fn value_type(&self) -> TypeToken;

    fn markers(&self) -> &Markers;
}

///
/// MemberEnumerator
///

pub trait MemberEnumerator: fmt::Debug + Send + Sync {
    fn members(&self, ty: &TypeToken) -> Option<Arc<TypeMembers>>;
}

///
/// EntityResolver
///
/// Resolves the member wrapper for a value type met while walking
/// embedded members.
///

pub trait EntityResolver: fmt::Debug + Send + Sync {
    fn resolve_entity(&self, ty: &TypeToken) -> Option<Arc<TypeMembers>>;
}

///
/// PropertyMember
///

#[derive(Clone, Debug)]
pub struct PropertyMember {
    name: String,
    declaring: TypeToken,
    value_type: TypeToken,
    reference: Arc<dyn ValueReference>,
    collection: Option<Arc<dyn CollectionOps>>,
    markers: Markers,
}

impl PropertyMember {
    pub fn new(
        name: impl Into<String>,
        declaring: TypeToken,
        reference: Arc<dyn ValueReference>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring,
            value_type: reference.value_type(),
            reference,
            collection: None,
            markers: Markers::new(),
        }
    }

    #[must_use]
    pub fn with_collection(mut self, ops: Arc<dyn CollectionOps>) -> Self {
        self.collection = Some(ops);
        self
    }

    /// Direct accessor on the declaring type.
    #[must_use]
    pub const fn reference(&self) -> &Arc<dyn ValueReference> {
        &self.reference
    }

    #[must_use]
    pub const fn collection(&self) -> Option<&Arc<dyn CollectionOps>> {
        self.collection.as_ref()
    }

    pub(crate) const fn markers_mut(&mut self) -> &mut Markers {
        &mut self.markers
    }
}

impl Member for PropertyMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn declaring_type(&self) -> TypeToken {
        self.declaring
    }

    fn value_type(&self) -> TypeToken {
        self.value_type
    }

    fn markers(&self) -> &Markers {
        &self.markers
    }
}

///
/// ParameterMember
///

#[derive(Clone, Debug)]
pub struct ParameterMember {
    name: String,
    value_type: TypeToken,
    markers: Markers,
}

impl ParameterMember {
    pub fn of<P: Typed>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: P::type_token(),
            markers: Markers::new(),
        }
    }

    #[must_use]
    pub fn with_marker<M: Marker>(mut self, marker: M) -> Self {
        self.markers.mark(marker);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> TypeToken {
        self.value_type
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }
}

///
/// OperationMember
///

#[derive(Clone, Debug)]
pub struct OperationMember {
    name: String,
    declaring: TypeToken,
    parameters: Vec<ParameterMember>,
    result: TypeToken,
    reference: Arc<dyn OperationReference>,
    markers: Markers,
}

impl OperationMember {
    pub fn new(
        name: impl Into<String>,
        declaring: TypeToken,
        parameters: Vec<ParameterMember>,
        result: TypeToken,
        reference: Arc<dyn OperationReference>,
    ) -> Self {
        Self {
            name: name.into(),
            declaring,
            parameters,
            result,
            reference,
            markers: Markers::new(),
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterMember] {
        &self.parameters
    }

    #[must_use]
    pub const fn result_type(&self) -> TypeToken {
        self.result
    }

    #[must_use]
    pub const fn reference(&self) -> &Arc<dyn OperationReference> {
        &self.reference
    }

    pub(crate) const fn markers_mut(&mut self) -> &mut Markers {
        &mut self.markers
    }
}

impl Member for OperationMember {
    fn name(&self) -> &str {
        &self.name
    }

    fn declaring_type(&self) -> TypeToken {
        self.declaring
    }

    fn value_type(&self) -> TypeToken {
        self.result
    }

    fn markers(&self) -> &Markers {
        &self.markers
    }
}

type Construct = Arc<dyn Fn() -> Result<Instance, CreationError> + Send + Sync>;
type ConstructFrom = Arc<dyn Fn(&dyn Any) -> Result<Instance, CreationError> + Send + Sync>;

///
/// Constructor
///
/// Zero-argument constructor of a registered type.
///

#[derive(Clone)]
pub struct Constructor {
    declaring: TypeToken,
    construct: Construct,
}

impl Constructor {
    pub fn new<F>(declaring: TypeToken, construct: F) -> Self
    where
        F: Fn() -> Result<Instance, CreationError> + Send + Sync + 'static,
    {
        Self {
            declaring,
            construct: Arc::new(construct),
        }
    }

    #[must_use]
    pub const fn declaring_type(&self) -> TypeToken {
        self.declaring
    }

    pub fn construct(&self) -> Result<Instance, CreationError> {
        (self.construct)()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({})", self.declaring.short_name())
    }
}

///
/// FactoryMethod
///
/// Static no-argument factory method.
///

#[derive(Clone)]
pub struct FactoryMethod {
    name: String,
    declaring: TypeToken,
    returns: TypeToken,
    invoke: Construct,
}

impl FactoryMethod {
    pub fn new<F>(name: impl Into<String>, declaring: TypeToken, returns: TypeToken, invoke: F) -> Self
    where
        F: Fn() -> Result<Instance, CreationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            declaring,
            returns,
            invoke: Arc::new(invoke),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn declaring_type(&self) -> TypeToken {
        self.declaring
    }

    #[must_use]
    pub const fn return_type(&self) -> TypeToken {
        self.returns
    }

    pub fn invoke(&self) -> Result<Instance, CreationError> {
        (self.invoke)()
    }
}

impl fmt::Debug for FactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethod")
            .field("name", &self.name)
            .field("declaring", &self.declaring.short_name())
            .field("returns", &self.returns.short_name())
            .finish()
    }
}

///
/// InstanceFactoryMethod
///
/// No-argument method invoked on a factory object.
///

#[derive(Clone)]
pub struct InstanceFactoryMethod {
    name: String,
    declaring: TypeToken,
    returns: TypeToken,
    invoke: ConstructFrom,
}

impl InstanceFactoryMethod {
    pub fn new<F>(name: impl Into<String>, declaring: TypeToken, returns: TypeToken, invoke: F) -> Self
    where
        F: Fn(&dyn Any) -> Result<Instance, CreationError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            declaring,
            returns,
            invoke: Arc::new(invoke),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn declaring_type(&self) -> TypeToken {
        self.declaring
    }

    #[must_use]
    pub const fn return_type(&self) -> TypeToken {
        self.returns
    }

    pub fn invoke(&self, factory: &dyn Any) -> Result<Instance, CreationError> {
        (self.invoke)(factory)
    }
}

impl fmt::Debug for InstanceFactoryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceFactoryMethod")
            .field("name", &self.name)
            .field("declaring", &self.declaring.short_name())
            .field("returns", &self.returns.short_name())
            .finish()
    }
}

///
/// TypeMembers
///
/// Everything declared by one type, in declaration order.
///

#[derive(Clone, Debug)]
pub struct TypeMembers {
    ty: TypeToken,
    markers: Markers,
    properties: Vec<PropertyMember>,
    operations: Vec<OperationMember>,
    constructor: Option<Constructor>,
    factory_methods: Vec<FactoryMethod>,
    instance_factory_methods: Vec<InstanceFactoryMethod>,
}

impl TypeMembers {
    #[must_use]
    pub fn new(ty: TypeToken) -> Self {
        Self {
            ty,
            markers: Markers::new(),
            properties: Vec::new(),
            operations: Vec::new(),
            constructor: None,
            factory_methods: Vec::new(),
            instance_factory_methods: Vec::new(),
        }
    }

    #[must_use]
    pub const fn type_token(&self) -> TypeToken {
        self.ty
    }

    /// Type-level markers.
    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyMember] {
        &self.properties
    }

    #[must_use]
    pub fn operations(&self) -> &[OperationMember] {
        &self.operations
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyMember> {
        self.properties.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationMember> {
        self.operations.iter().find(|o| o.name == name)
    }

    #[must_use]
    pub const fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    #[must_use]
    pub fn factory_methods(&self) -> &[FactoryMethod] {
        &self.factory_methods
    }

    #[must_use]
    pub fn instance_factory_method(&self, name: &str) -> Option<&InstanceFactoryMethod> {
        self.instance_factory_methods.iter().find(|m| m.name == name)
    }

    #[must_use]
    pub fn instance_factory_methods(&self) -> &[InstanceFactoryMethod] {
        &self.instance_factory_methods
    }
}
