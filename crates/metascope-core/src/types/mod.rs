//! Type tokens and the value-shape taxonomy used to classify members.
//!
//! A `TypeToken` stands in for the runtime type handle a reflective host
//! would provide: identity (`TypeId`), a display name, and a `Shape` that
//! exposes element/inner types for collections and optionals.

mod cardinality;
mod primitive;

#[cfg(test)]
mod tests;

pub use cardinality::Cardinality;
pub use primitive::Primitive;

use std::{
    any::{Any, TypeId},
    cmp::Ordering,
    collections::{BTreeSet, HashSet, VecDeque},
    fmt,
    hash::{Hash, Hasher},
};

///
/// Shape
///
/// Structural classification of a type. Nested shapes are resolved lazily
/// through function pointers so that `TypeToken` stays `Copy`.
///

#[derive(Clone, Copy)]
pub enum Shape {
    Unit,
    Scalar(Primitive),
    Text,
    Optional(fn() -> TypeToken),
    Collection(fn() -> TypeToken),
    Object,
}

impl Shape {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Scalar(_) => "scalar",
            Self::Text => "text",
            Self::Optional(_) => "optional",
            Self::Collection(_) => "collection",
            Self::Object => "object",
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(p) => write!(f, "Scalar({p})"),
            Self::Optional(inner) => write!(f, "Optional({})", inner().name()),
            Self::Collection(element) => write!(f, "Collection({})", element().name()),
            other => f.write_str(other.label()),
        }
    }
}

///
/// TypeToken
///
/// Identity is the `TypeId`; ordering is by name so that maps keyed by
/// tokens iterate deterministically.
///

#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
    shape: Shape,
}

impl TypeToken {
    #[must_use]
    pub fn of<T: Typed>() -> Self {
        T::type_token()
    }

    #[must_use]
    pub fn new<T: Any>(shape: Shape) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            shape,
        }
    }

    /// Token for a domain object type (anything introspected member by member).
    #[must_use]
    pub fn object<T: Any>() -> Self {
        Self::new::<T>(Shape::Object)
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Last path segment of the type name, without generic arguments.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);

        base.rsplit("::").next().unwrap_or(base)
    }

    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[must_use]
    pub const fn is_unit(&self) -> bool {
        matches!(self.shape, Shape::Unit)
    }

    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self.shape, Shape::Object)
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        matches!(self.shape, Shape::Collection(_))
    }

    /// Element type of a collection shape.
    #[must_use]
    pub fn element(&self) -> Option<Self> {
        match self.shape {
            Shape::Collection(element) => Some(element()),
            _ => None,
        }
    }

    /// Inner type of an optional shape.
    #[must_use]
    pub fn inner(&self) -> Option<Self> {
        match self.shape {
            Shape::Optional(inner) => Some(inner()),
            _ => None,
        }
    }

    /// The type an instance must have to stand in for a value of this
    /// type: optionals unwrap to their inner type, everything else is itself.
    #[must_use]
    pub fn object_type(&self) -> Self {
        match self.shape {
            Shape::Optional(inner) => inner().object_type(),
            _ => *self,
        }
    }

    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        Cardinality::of(self)
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeToken")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .finish()
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Ord for TypeToken {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for TypeToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

///
/// Typed
///
/// Types that can describe themselves with a `TypeToken`. Domain objects get
/// an implementation through `object_type!`.
///

pub trait Typed: Any {
    fn type_token() -> TypeToken;
}

macro_rules! impl_typed_scalar {
    ( $( $type:ty => $primitive:ident ),* $(,)? ) => {
        $(
            impl Typed for $type {
                fn type_token() -> TypeToken {
                    TypeToken::new::<$type>(Shape::Scalar(Primitive::$primitive))
                }
            }
        )*
    };
}

impl_typed_scalar!(
    bool => Bool,
    char => Char,
    f32 => Float32,
    f64 => Float64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Isize,
    u8 => Nat8,
    u16 => Nat16,
    u32 => Nat32,
    u64 => Nat64,
    usize => Usize,
);

impl Typed for () {
    fn type_token() -> TypeToken {
        TypeToken::new::<()>(Shape::Unit)
    }
}

impl Typed for String {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Text)
    }
}

impl<T: Typed> Typed for Option<T> {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Optional(T::type_token))
    }
}

impl<T: Typed> Typed for Vec<T> {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Collection(T::type_token))
    }
}

impl<T: Typed> Typed for VecDeque<T> {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Collection(T::type_token))
    }
}

impl<T: Typed> Typed for BTreeSet<T> {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Collection(T::type_token))
    }
}

impl<T: Typed> Typed for HashSet<T> {
    fn type_token() -> TypeToken {
        TypeToken::new::<Self>(Shape::Collection(T::type_token))
    }
}

// Boxes are transparent: a `Box<T>` field describes a `T`.
impl<T: Typed> Typed for Box<T> {
    fn type_token() -> TypeToken {
        T::type_token()
    }
}
