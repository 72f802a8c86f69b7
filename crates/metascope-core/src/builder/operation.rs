use crate::{
    builder::{BuildError, BuilderContext, OVERLAYS, SIGNATURE, overlay},
    detail::Detail,
    event::{BuildOperation, EventBus, ListenerError, UpdatedOperationReference},
    marker::{Markers, Presentation},
    member::ParameterMember,
    model::{Extensions, Operation, OperationModel, ParameterModel, QualifiedOperation, ResultModel},
    qualifier::{InheritedDetails, OverlayCache, QualifiedDetails, Qualifier},
    reference::OperationReference,
    types::{Cardinality, TypeToken},
};
use std::sync::Arc;

///
/// OperationState
///

#[derive(Debug)]
pub struct OperationState {
    pub(crate) ctx: BuilderContext,
    pub(crate) name: Option<String>,
    pub(crate) segments: Vec<String>,
    pub(crate) reference: Option<Arc<dyn OperationReference>>,
    pub(crate) parameters: Vec<ParameterMember>,
    pub(crate) result_type: Option<TypeToken>,
    pub(crate) markers: Markers,
    pub(crate) details: QualifiedDetails,
    pub(crate) parameter_details: Vec<QualifiedDetails>,
    pub(crate) result_details: QualifiedDetails,
    pub(crate) inherited: InheritedDetails,
    pub(crate) extensions: Extensions,
    pub(crate) overlays: OverlayCache<QualifiedOperation>,
}

impl OperationState {
    fn new(ctx: BuilderContext) -> Self {
        Self {
            ctx,
            name: None,
            segments: Vec::new(),
            reference: None,
            parameters: Vec::new(),
            result_type: None,
            markers: Markers::new(),
            details: QualifiedDetails::new(),
            parameter_details: Vec::new(),
            result_details: QualifiedDetails::new(),
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
    pub const fn markers(&self) -> &Markers {
        &self.markers
    }

    pub const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    // Base for parameters and the result: the operation's own detail under
    // `qualifier`, reduced to the inherited flags.
    pub(crate) fn member_base(&self, qualifier: Option<&Qualifier>) -> Detail {
        let base = self.inherited.base_for(qualifier);
        let detail = match qualifier {
            Some(qualifier) => self.details.detail_for(qualifier, &base),
            None => self.details.default_detail(&base),
        };

        Detail::new(detail.visible, detail.inline)
    }
}

///
/// OperationBuilder
///

#[derive(Debug)]
pub struct OperationBuilder {
    bus: EventBus<OperationState>,
    state: OperationState,
}

impl OperationBuilder {
    #[must_use]
    pub fn new(ctx: BuilderContext) -> Self {
        let mut bus = EventBus::new();

        bus.add_listener::<UpdatedOperationReference, _>(SIGNATURE, declare_signature_details);
        bus.add_listener::<BuildOperation, _>(OVERLAYS, overlay::cache_operation_overlays);

        Self {
            bus,
            state: OperationState::new(ctx),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.state.name = Some(name.into());
        self
    }

    /// Embedding prefixes plus the local name; validated per segment.
    pub fn set_segments(&mut self, segments: Vec<String>) -> &mut Self {
        self.state.segments = segments;
        self
    }

    pub fn set_signature(
        &mut self,
        parameters: Vec<ParameterMember>,
        result_type: TypeToken,
    ) -> &mut Self {
        self.state.parameters = parameters;
        self.state.result_type = Some(result_type);
        self
    }

    /// Reference invoked on the entity root.
    pub fn set_reference(
        &mut self,
        reference: Arc<dyn OperationReference>,
    ) -> Result<&mut Self, BuildError> {
        let name = reference.name().to_string();
        self.state.reference = Some(reference);
        self.bus
            .handle_event(&UpdatedOperationReference { name }, &mut self.state)?;

        Ok(self)
    }

    pub fn apply_markers(&mut self, markers: &Markers) -> &mut Self {
        for presentation in markers.all::<Presentation>() {
            self.state.details.declare(presentation);
        }
        self.state.markers = markers.clone();

        self
    }

    pub fn inherit(&mut self, inherited: InheritedDetails) -> &mut Self {
        self.state.inherited = inherited;
        self
    }

    pub fn register_qualifiers(
        &mut self,
        qualifiers: impl IntoIterator<Item = Qualifier>,
    ) -> &mut Self {
        self.state.details.register_all(qualifiers);
        self
    }

    /// Qualifiers declared by the operation or its parameters.
    #[must_use]
    pub fn qualifiers(&self) -> Vec<Qualifier> {
        self.state.details.qualifiers().iter().copied().collect()
    }

    pub fn build(mut self) -> Result<Operation, BuildError> {
        let state = &mut self.state;
        let name = state.name.clone().ok_or(BuildError::MissingField {
            kind: "operation",
            field: "name",
        })?;
        if state.segments.is_empty() {
            state.ctx.check_name("operation", &name)?;
        } else {
            state.ctx.check_segments("operation", &name, &state.segments)?;
        }

        let reference = state.reference.clone().ok_or(BuildError::MissingField {
            kind: "operation",
            field: "reference",
        })?;
        let result_type = state.result_type.ok_or(BuildError::MissingField {
            kind: "operation",
            field: "result_type",
        })?;

        let member_base = state.member_base(None);
        let mut parameters = Vec::with_capacity(state.parameters.len());
        for (index, parameter) in state.parameters.iter().enumerate() {
            state.ctx.check_name("parameter", parameter.name())?;

            let value_type = parameter.value_type();
            let detail = state
                .parameter_details
                .get(index)
                .map_or_else(|| member_base.clone(), |d| d.default_detail(&member_base));

            parameters.push(Arc::new(ParameterModel {
                name: parameter.name().to_string(),
                index,
                value_type,
                cardinality: Cardinality::of(&value_type),
                element_type: value_type.element(),
                detail,
            }));
        }

        let result = Arc::new(ResultModel {
            value_type: result_type,
            cardinality: Cardinality::of(&result_type),
            element_type: result_type.element(),
            detail: state.result_details.default_detail(&member_base),
        });

        let detail = state
            .details
            .default_detail(&state.inherited.base_for(None));
        let model = Arc::new(OperationModel {
            name,
            parameters,
            result,
            reference,
            extensions: std::mem::take(&mut state.extensions),
            detail,
        });

        self.bus.handle_event(
            &BuildOperation {
                operation: Arc::clone(&model),
            },
            &mut self.state,
        )?;

        Ok(Operation::new(model, std::mem::take(&mut self.state.overlays)))
    }
}

// Parameter presentation comes from the parameter markers; qualifiers
// they mention become qualifiers of the operation.
fn declare_signature_details(
    _: &UpdatedOperationReference,
    state: &mut OperationState,
) -> Result<(), ListenerError> {
    let mut parameter_details = Vec::with_capacity(state.parameters.len());

    for parameter in &state.parameters {
        let mut details = QualifiedDetails::new();

        for presentation in parameter.markers().all::<Presentation>() {
            details.declare(presentation);
        }
        state.details.register_all(details.qualifiers().iter().copied());
        parameter_details.push(details);
    }

    state.parameter_details = parameter_details;

    Ok(())
}
