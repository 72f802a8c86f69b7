use crate::{
    detail::Detail,
    model::Extensions,
    qualifier::{Overlay, OverlayCache, Qualifier},
    reference::{AccessError, OperationReference},
    types::{Cardinality, TypeToken},
    value::Value,
};
use derive_more::Deref;
use std::{any::Any, fmt, sync::Arc};

///
/// ParameterModel
///

#[derive(Debug)]
pub struct ParameterModel {
    pub(crate) name: String,
    pub(crate) index: usize,
    pub(crate) value_type: TypeToken,
    pub(crate) cardinality: Cardinality,
    pub(crate) element_type: Option<TypeToken>,
    pub(crate) detail: Detail,
}

impl ParameterModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn value_type(&self) -> TypeToken {
        self.value_type
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Element type of a collection-flavored parameter.
    #[must_use]
    pub const fn element_type(&self) -> Option<TypeToken> {
        self.element_type
    }

    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }
}

impl fmt::Display for ParameterModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value_type.short_name())
    }
}

///
/// ResultModel
///

#[derive(Debug)]
pub struct ResultModel {
    pub(crate) value_type: TypeToken,
    pub(crate) cardinality: Cardinality,
    pub(crate) element_type: Option<TypeToken>,
    pub(crate) detail: Detail,
}

impl ResultModel {
    #[must_use]
    pub const fn value_type(&self) -> TypeToken {
        self.value_type
    }

    #[must_use]
    pub const fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    #[must_use]
    pub const fn element_type(&self) -> Option<TypeToken> {
        self.element_type
    }

    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }
}

pub type QualifiedParameter = Overlay<ParameterModel>;
pub type QualifiedResult = Overlay<ResultModel>;

///
/// OperationModel
///

#[derive(Debug)]
pub struct OperationModel {
    pub(crate) name: String,
    pub(crate) parameters: Vec<Arc<ParameterModel>>,
    pub(crate) result: Arc<ResultModel>,
    pub(crate) reference: Arc<dyn OperationReference>,
    pub(crate) extensions: Extensions,
    pub(crate) detail: Detail,
}

impl OperationModel {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parameters(&self) -> &[Arc<ParameterModel>] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Arc<ParameterModel>> {
        self.parameters.iter().find(|p| p.name == name)
    }

    #[must_use]
    pub const fn result(&self) -> &Arc<ResultModel> {
        &self.result
    }

    #[must_use]
    pub const fn reference(&self) -> &Arc<dyn OperationReference> {
        &self.reference
    }

    #[must_use]
    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    #[must_use]
    pub fn extension<T: Any>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }

    #[must_use]
    pub const fn detail(&self) -> &Detail {
        &self.detail
    }

    /// Invoke on the entity root; the argument count must match.
    pub fn invoke(&self, root: &mut dyn Any, args: &[Value]) -> Result<Value, AccessError> {
        if args.len() != self.parameters.len() {
            return Err(AccessError::Arity {
                name: self.name.clone(),
                expected: self.parameters.len(),
                found: args.len(),
            });
        }

        self.reference.invoke(root, args)
    }
}

impl fmt::Display for OperationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();

        write!(
            f,
            "{}({}) -> {}",
            self.name,
            params.join(", "),
            self.result.value_type.short_name()
        )
    }
}

///
/// QualifiedOperation
///
/// Operation overlay with its parameters and result resolved under the
/// same qualifier.
///

#[derive(Debug, Deref)]
pub struct QualifiedOperation {
    #[deref]
    overlay: Overlay<OperationModel>,
    parameters: Vec<Arc<QualifiedParameter>>,
    result: Arc<QualifiedResult>,
}

impl QualifiedOperation {
    pub(crate) fn new(
        overlay: Overlay<OperationModel>,
        parameters: Vec<Arc<QualifiedParameter>>,
        result: Arc<QualifiedResult>,
    ) -> Self {
        Self {
            overlay,
            parameters,
            result,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &[Arc<QualifiedParameter>] {
        &self.parameters
    }

    #[must_use]
    pub const fn result(&self) -> &Arc<QualifiedResult> {
        &self.result
    }
}

///
/// Operation
///

#[derive(Debug, Deref)]
pub struct Operation {
    #[deref(forward)]
    model: Arc<OperationModel>,
    unqualified: Arc<QualifiedOperation>,
    overlays: OverlayCache<QualifiedOperation>,
}

impl Operation {
    pub(crate) fn new(
        model: Arc<OperationModel>,
        overlays: OverlayCache<QualifiedOperation>,
    ) -> Self {
        let unqualified = Arc::new(unqualified_operation(&model));

        Self {
            model,
            unqualified,
            overlays,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &Arc<OperationModel> {
        &self.model
    }

    #[must_use]
    pub const fn unqualified(&self) -> &Arc<QualifiedOperation> {
        &self.unqualified
    }

    #[must_use]
    pub fn qualified(&self, qualifier: &Qualifier) -> &Arc<QualifiedOperation> {
        self.overlays.get(qualifier).unwrap_or(&self.unqualified)
    }

    #[must_use]
    pub fn overlay(&self, qualifier: &Qualifier) -> Option<&Arc<QualifiedOperation>> {
        self.overlays.get(qualifier)
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &Qualifier> {
        self.overlays.qualifiers()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.model.as_ref(), f)
    }
}

fn unqualified_operation(model: &Arc<OperationModel>) -> QualifiedOperation {
    let parameters = model
        .parameters
        .iter()
        .map(|p| Arc::new(Overlay::new(None, p.detail.clone(), Arc::clone(p))))
        .collect();
    let result = Arc::new(Overlay::new(
        None,
        model.result.detail.clone(),
        Arc::clone(&model.result),
    ));

    QualifiedOperation::new(
        Overlay::new(None, model.detail.clone(), Arc::clone(model)),
        parameters,
        result,
    )
}
