//! Lifecycle events fired by the entity, property and operation builders,
//! in causal order per build.

use crate::{
    model::{EntityModel, OperationModel, PropertyModel},
    types::TypeToken,
};
use std::sync::Arc;

//
// Entity
//

/// The raw type was bound to an entity builder.
#[derive(Clone, Copy, Debug)]
pub struct EntityTypeUpdated {
    pub entity_type: TypeToken,
}

/// About to materialize member builders into descriptors.
#[derive(Clone, Copy, Debug)]
pub struct PreBuildEntity {
    pub entity_type: TypeToken,
}

/// The entity descriptor exists.
#[derive(Clone, Debug)]
pub struct BuildEntity {
    pub entity: Arc<EntityModel>,
}

//
// Property
//

#[derive(Clone, Copy, Debug)]
pub struct UpdatedPropertyType {
    pub value_type: TypeToken,
}

#[derive(Clone, Copy, Debug)]
pub struct UpdatedPropertyValueReference {
    pub read_only: bool,
}

#[derive(Clone, Debug)]
pub struct BuildProperty {
    pub property: Arc<PropertyModel>,
}

//
// Operation
//

#[derive(Clone, Debug)]
pub struct UpdatedOperationReference {
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct BuildOperation {
    pub operation: Arc<OperationModel>,
}
