use crate::{
    builder::{ACCESS, BuildError, BuilderContext, CARDINALITY, OVERLAYS, overlay},
    event::{
        BuildProperty, EventBus, ListenerError, ListenerOwner, UpdatedPropertyType,
        UpdatedPropertyValueReference,
    },
    marker::{Immutable, Key, Markers, Presentation, Relation},
    model::{CollectionModel, Extensions, Property, PropertyModel, QualifiedProperty, RelationModel},
    qualifier::{InheritedDetails, OverlayCache, QualifiedDetails, Qualifier},
    reference::{CollectionOps, ValueReference},
    types::{Cardinality, TypeToken},
};
use std::{collections::BTreeMap, sync::Arc};

///
/// PropertyState
///
/// Mutable state of one property under construction. Listeners and
/// post-processors see it through the accessors below.
///

#[derive(Debug)]
pub struct PropertyState {
    pub(crate) ctx: BuilderContext,
    pub(crate) name: Option<String>,
    pub(crate) segments: Vec<String>,
    pub(crate) value_type: Option<TypeToken>,
    pub(crate) cardinality: Cardinality,
    pub(crate) reference: Option<Arc<dyn ValueReference>>,
    pub(crate) collection: Option<Arc<dyn CollectionOps>>,
    pub(crate) markers: Markers,
    pub(crate) immutable: bool,
    pub(crate) key: bool,
    pub(crate) relation: Option<RelationModel>,
    pub(crate) qualified_relations: BTreeMap<Qualifier, RelationModel>,
    pub(crate) details: QualifiedDetails,
    pub(crate) inherited: InheritedDetails,
    pub(crate) extensions: Extensions,
    pub(crate) overlays: OverlayCache<QualifiedProperty>,
}

impl PropertyState {
    fn new(ctx: BuilderContext) -> Self {
        Self {
            ctx,
            name: None,
            segments: Vec::new(),
            value_type: None,
            cardinality: Cardinality::Nullable,
            reference: None,
            collection: None,
            markers: Markers::new(),
            immutable: false,
            key: false,
            relation: None,
            qualified_relations: BTreeMap::new(),
            details: QualifiedDetails::new(),
            inherited: InheritedDetails::default(),
            extensions: Extensions::new(),
            overlays: OverlayCache::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn value_type(&self) -> Option<TypeToken> {
        self.value_type
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    #[must_use]
    pub const fn context(&self) -> &BuilderContext {
        &self.ctx
    }

    pub const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

///
/// PropertyBuilder
///

#[derive(Debug)]
pub struct PropertyBuilder {
    bus: EventBus<PropertyState>,
    state: PropertyState,
}

impl PropertyBuilder {
    #[must_use]
    pub fn new(ctx: BuilderContext) -> Self {
        let mut bus = EventBus::new();

        bus.add_listener::<UpdatedPropertyType, _>(
            CARDINALITY,
            |event: &UpdatedPropertyType, state: &mut PropertyState| -> Result<(), ListenerError> {
                state.cardinality = Cardinality::of(&event.value_type);
                Ok(())
            },
        );
        bus.add_listener::<UpdatedPropertyValueReference, _>(
            ACCESS,
            |event: &UpdatedPropertyValueReference,
             state: &mut PropertyState|
             -> Result<(), ListenerError> {
                if event.read_only {
                    state.immutable = true;
                }
                Ok(())
            },
        );
        for processor in ctx.property_processors() {
            let processor = Arc::clone(processor);

            bus.add_listener::<UpdatedPropertyType, _>(
                ListenerOwner::new(processor.name()),
                move |_: &UpdatedPropertyType, state: &mut PropertyState| processor.process(state),
            );
        }
        bus.add_listener::<BuildProperty, _>(OVERLAYS, overlay::cache_property_overlays);

        Self {
            bus,
            state: PropertyState::new(ctx),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.state.name = Some(name.into());
        self
    }

    /// Local names along the embedding path, outermost first. When set, the
    /// name is validated per segment instead of as a whole.
    pub fn set_segments(&mut self, segments: Vec<String>) -> &mut Self {
        self.state.segments = segments;
        self
    }

    pub fn set_value_type(&mut self, value_type: TypeToken) -> Result<&mut Self, BuildError> {
        self.state.value_type = Some(value_type);
        self.bus
            .handle_event(&UpdatedPropertyType { value_type }, &mut self.state)?;

        Ok(self)
    }

    /// Composed reference from the entity root.
    pub fn set_reference(
        &mut self,
        reference: Arc<dyn ValueReference>,
    ) -> Result<&mut Self, BuildError> {
        let read_only = reference.is_read_only();
        self.state.reference = Some(reference);
        self.bus
            .handle_event(&UpdatedPropertyValueReference { read_only }, &mut self.state)?;

        Ok(self)
    }

    pub fn set_collection(&mut self, ops: Arc<dyn CollectionOps>) -> &mut Self {
        self.state.collection = Some(ops);
        self
    }

    pub fn set_relation(&mut self, relation: RelationModel) -> &mut Self {
        self.state.relation = Some(relation);
        self
    }

    /// Fold the member's markers in: flags, relations and presentation.
    pub fn apply_markers(&mut self, markers: &Markers) -> &mut Self {
        let state = &mut self.state;

        state.immutable |= markers.has::<Immutable>();
        state.key |= markers.has::<Key>();

        for relation in markers.all::<Relation>() {
            let model = RelationModel::new(relation.kind, relation.target.clone());

            match relation.qualifier {
                Some(qualifier) => {
                    state.details.register(qualifier);
                    state.qualified_relations.insert(qualifier, model);
                }
                None => state.relation = Some(model),
            }
        }
        for presentation in markers.all::<Presentation>() {
            state.details.declare(presentation);
        }
        state.markers = markers.clone();

        self
    }

    pub fn inherit(&mut self, inherited: InheritedDetails) -> &mut Self {
        self.state.inherited = inherited;
        self
    }

    pub fn register_qualifiers(&mut self, qualifiers: impl IntoIterator<Item = Qualifier>) -> &mut Self {
        self.state.details.register_all(qualifiers);
        self
    }

    /// Qualifiers this property declares itself.
    #[must_use]
    pub fn qualifiers(&self) -> Vec<Qualifier> {
        self.state.details.qualifiers().iter().copied().collect()
    }

    #[must_use]
    pub const fn state(&self) -> &PropertyState {
        &self.state
    }

    pub fn build(mut self) -> Result<Property, BuildError> {
        let state = &mut self.state;
        let name = state.name.clone().ok_or(BuildError::MissingField {
            kind: "property",
            field: "name",
        })?;
        if state.segments.is_empty() {
            state.ctx.check_name("property", &name)?;
        } else {
            state.ctx.check_segments("property", &name, &state.segments)?;
        }

        let value_type = state.value_type.ok_or(BuildError::MissingField {
            kind: "property",
            field: "value_type",
        })?;
        let reference = state.reference.clone().ok_or(BuildError::MissingField {
            kind: "property",
            field: "reference",
        })?;

        let collection = match (state.cardinality, state.collection.clone()) {
            (Cardinality::Multiple, Some(ops)) => Some(CollectionModel::new(ops)),
            (Cardinality::Multiple, None) => return Err(BuildError::CollectionAccess { name }),
            _ => None,
        };

        let detail = state.details.default_detail(&state.inherited.base_for(None));
        let model = Arc::new(PropertyModel {
            name,
            value_type,
            cardinality: state.cardinality,
            immutable: state.immutable,
            key: state.key,
            relation: state.relation.clone(),
            reference,
            collection,
            extensions: std::mem::take(&mut state.extensions),
            detail,
        });

        self.bus.handle_event(
            &BuildProperty {
                property: Arc::clone(&model),
            },
            &mut self.state,
        )?;

        Ok(Property::new(model, std::mem::take(&mut self.state.overlays)))
    }
}
