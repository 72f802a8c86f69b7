use crate::types::{Shape, TypeToken};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Cardinality
///
/// Multiplicity of a property, parameter or result value.
///
/// - `None`: no value at all (`()`)
/// - `Single`: exactly one scalar, never absent
/// - `Nullable`: text, optionals and object references
/// - `Multiple`: any collection shape
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
pub enum Cardinality {
    None,
    Single,
    Nullable,
    Multiple,
}

impl Cardinality {
    #[must_use]
    pub const fn of(token: &TypeToken) -> Self {
        Self::from_shape(token.shape())
    }

    #[must_use]
    pub const fn from_shape(shape: Shape) -> Self {
        match shape {
            Shape::Unit => Self::None,
            Shape::Scalar(_) => Self::Single,
            Shape::Collection(_) => Self::Multiple,
            Shape::Text | Shape::Optional(_) | Shape::Object => Self::Nullable,
        }
    }

    #[must_use]
    pub const fn is_multiple(self) -> bool {
        matches!(self, Self::Multiple)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}
