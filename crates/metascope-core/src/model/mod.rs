//! The descriptor graph produced by a build pass.
//!
//! Each descriptor kind comes in two layers: an unqualified `*Model` held
//! behind an `Arc`, and a wrapper that owns the per-qualifier overlay cache
//! and derefs to the model. Everything here is immutable once built.
//!
//! - `builder` decides *what is described*
//! - `model` is *what consumers query*

mod entity;
mod extension;
mod operation;
mod property;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityMember, EntityModel, QualifiedEntity};
pub use extension::Extensions;
pub use operation::{
    Operation, OperationModel, ParameterModel, QualifiedOperation, QualifiedParameter,
    QualifiedResult, ResultModel,
};
pub use property::{CollectionModel, CollectionProperty, Property, PropertyModel, QualifiedProperty};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// RelationKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationKind {
    Aggregation,
    Composition,
    Reference,
}

///
/// RelationModel
///
/// Relation capability of a property: what kind of link it is and the
/// name of the related entity, when known.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RelationModel {
    pub kind: RelationKind,
    pub target: Option<String>,
}

impl RelationModel {
    #[must_use]
    pub const fn new(kind: RelationKind, target: Option<String>) -> Self {
        Self { kind, target }
    }
}

impl fmt::Display for RelationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "{} -> {target}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}
