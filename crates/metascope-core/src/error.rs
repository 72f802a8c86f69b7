use crate::{
    ThisError, builder::BuildError, config::ConfigError, create::CreationError,
    event::EventError, reference::AccessError,
};

///
/// Error
///
/// Crate-level error. Each variant wraps the error of the concern that
/// produced it; `class()` maps it onto the recovery taxonomy.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Creation(#[from] CreationError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) | Self::Build(_) => ErrorClass::Configuration,
            Self::Event(_) => ErrorClass::EventProcessing,
            Self::Access(_) => ErrorClass::ValueAccess,
            Self::Creation(_) => ErrorClass::Creation,
        }
    }
}

///
/// ErrorClass
///
/// Configuration errors abort a build call; event-processing and creation
/// errors are recovered locally; value-access errors go to the caller.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    Configuration,
    Creation,
    EventProcessing,
    ValueAccess,
}
