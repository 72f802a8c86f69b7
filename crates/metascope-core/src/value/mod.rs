//! Dynamic values exchanged through value references.
//!
//! `Value` is the currency of every get/set/invoke call on a descriptor;
//! `FieldValue` is the conversion boundary between typed fields and `Value`.

mod instance;

#[cfg(test)]
mod tests;

pub use instance::{DynInstance, Instance};

use std::{
    any::Any,
    collections::{BTreeSet, HashSet, VecDeque},
    hash::Hash,
};

///
/// Value
///
/// `Null` is the domain "no value": what a read through an absent
/// intermediate returns.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Unit,
    Bool(bool),
    Char(char),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    List(Vec<Self>),
    Instance(Instance),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short variant label used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Instance(_) => "instance",
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Self::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Wrap a domain object.
    pub fn instance<T>(value: T) -> Self
    where
        T: Any + Clone + std::fmt::Debug + PartialEq + Send + Sync,
    {
        Self::Instance(Instance::new(value))
    }

    /// Convert into a typed value, if the conversion is lossless.
    #[must_use]
    pub fn to<T: FieldValue>(&self) -> Option<T> {
        T::from_value(self)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Uint(n)
    }
}

///
/// FieldValue
///
/// Conversion boundary between typed fields and `Value`.
///
/// `as_object`/`as_object_mut` expose the field as a navigable object for
/// reference chains; optionals expose their content, or nothing when empty.
///

pub trait FieldValue: Sized + 'static {
    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>;

    fn as_object(&self) -> Option<&dyn Any> {
        Some(self)
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

// Integers accept either integer variant as long as the value fits.
macro_rules! impl_field_value_int {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl FieldValue for $type {
                fn to_value(&self) -> Value {
                    Value::$variant((*self).try_into().unwrap_or_default())
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => (*v).try_into().ok(),
                        Value::Uint(v) => (*v).try_into().ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_field_value_int!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    isize => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    usize => Uint,
);

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[expect(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as Self),
            Value::Uint(v) => Some(*v as Self),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        f64::from_value(value).map(|v| v as Self)
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for char {
    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }
}

impl FieldValue for () {
    fn to_value(&self) -> Value {
        Value::Unit
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Unit | Value::Null => Some(()),
            _ => None,
        }
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn as_object(&self) -> Option<&dyn Any> {
        self.as_ref().and_then(FieldValue::as_object)
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn Any> {
        self.as_mut().and_then(FieldValue::as_object_mut)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FieldValue + Ord> FieldValue for BTreeSet<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FieldValue + Eq + Hash> FieldValue for HashSet<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::from_value(value).map(Self::new)
    }

    fn as_object(&self) -> Option<&dyn Any> {
        (**self).as_object()
    }

    fn as_object_mut(&mut self) -> Option<&mut dyn Any> {
        (**self).as_object_mut()
    }
}

///
/// object_type
///
/// Implements `Typed` and `FieldValue` for domain object types so they can
/// be used as property values, embedded objects and creation targets.
///

#[macro_export]
macro_rules! object_type {
    ( $( $type:ty ),+ $(,)? ) => {
        $(
            impl $crate::types::Typed for $type {
                fn type_token() -> $crate::types::TypeToken {
                    $crate::types::TypeToken::object::<Self>()
                }
            }

            impl $crate::value::FieldValue for $type {
                fn to_value(&self) -> $crate::value::Value {
                    $crate::value::Value::Instance($crate::value::Instance::new(
                        ::std::clone::Clone::clone(self),
                    ))
                }

                fn from_value(value: &$crate::value::Value) -> ::std::option::Option<Self> {
                    match value {
                        $crate::value::Value::Instance(instance) => {
                            instance.downcast_ref::<Self>().cloned()
                        }
                        _ => ::std::option::Option::None,
                    }
                }
            }
        )+
    };
}
