//! Descriptor construction engine for metascope: type tokens, dynamic values,
//! value reference chains, the event-driven builder pipeline, qualifier
//! overlays and creational strategies.
//!
//! The output of a build pass is an immutable descriptor graph (`Entity`,
//! `Property`, `Operation`, ...) that is safe to share across threads.

pub mod builder;
pub mod config;
pub mod create;
pub mod detail;
pub mod error;
pub mod event;
pub mod marker;
pub mod member;
pub mod model;
pub mod path;
pub mod qualifier;
pub mod reference;
pub mod types;
pub mod value;

pub use error::Error;

use thiserror::Error as ThisError;

///
/// CONSTANTS
///

/// Separator used when flattening embedded property names.
pub const DEFAULT_EMBEDDED_INDICATOR: char = '.';

/// Pattern every name segment must match unless configured otherwise.
pub const DEFAULT_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

///
/// Prelude
///
/// Domain vocabulary only; builders and processors stay one module down.
///

pub mod prelude {
    pub use crate::{
        marker::{
            Alias, AliasOf, Embedded, EntityName, FactoryRef, Ignore, Immutable, ImplementedBy,
            Key, Named, Presentation, RegistryKey, Relation,
        },
        member::{Introspect, ParameterMember, TypeBuilder},
        model::{Entity, Operation, Property},
        object_type,
        qualifier::Qualifier,
        types::{Cardinality, TypeToken, Typed},
        value::{FieldValue, Instance, Value},
    };
}
