use derive_more::Display;

///
/// Primitive
///
/// Scalar value types that can never be absent.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
pub enum Primitive {
    Bool,
    Char,
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Isize,
    Nat8,
    Nat16,
    Nat32,
    Nat64,
    Usize,
}

impl Primitive {
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    #[must_use]
    pub const fn is_signed_int(self) -> bool {
        matches!(
            self,
            Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64 | Self::Isize
        )
    }

    #[must_use]
    pub const fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Self::Nat8 | Self::Nat16 | Self::Nat32 | Self::Nat64 | Self::Usize
        )
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_float() || self.is_signed_int() || self.is_unsigned_int()
    }
}
