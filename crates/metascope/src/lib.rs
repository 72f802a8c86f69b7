//! ## Crate layout
//! - `core`: the descriptor construction engine (types, values, references,
//!   event-driven builders, qualifier overlays, creational strategies).
//! - `meta`: `MetaModel`, one build pass per root type with the resulting
//!   descriptors cached for the lifetime of the model.
//!
//! The `prelude` module exposes what domain code needs to describe its
//! types and query the built descriptors.

pub use metascope_core as core;

pub mod meta;

pub use core::Error;
pub use meta::MetaModel;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        MetaModel,
        core::{
            config::ModelConfig,
            member::TypeRegistry,
            model::{QualifiedEntity, QualifiedOperation, QualifiedProperty, RelationKind},
            prelude::*,
        },
    };
}
