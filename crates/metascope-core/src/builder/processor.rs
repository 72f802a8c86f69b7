use crate::{
    builder::{EntityState, PropertyState},
    event::ListenerError,
};
use std::fmt;

///
/// EntityPostProcessor
///
/// Runs on `EntityTypeUpdated`, after the built-in listeners, and may
/// attach typed extensions to the entity.
///

pub trait EntityPostProcessor: fmt::Debug + Send + Sync {
    /// Listener owner name; also used in log output.
    fn name(&self) -> &'static str;

    fn process(&self, entity: &mut EntityState) -> Result<(), ListenerError>;
}

///
/// PropertyPostProcessor
///
/// Runs on `UpdatedPropertyType` for every property of every entity.
///

pub trait PropertyPostProcessor: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn process(&self, property: &mut PropertyState) -> Result<(), ListenerError>;
}
