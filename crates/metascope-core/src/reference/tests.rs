use super::*;
use crate::{
    create::{CreationError, ObjectFactory, ObjectFactoryRef},
    types::TypeToken,
    value::Instance,
};
use std::{collections::BTreeSet, sync::Arc};

#[derive(Clone, Debug, Default, PartialEq)]
struct Inner {
    count: i64,
    tags: BTreeSet<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Outer {
    inner: Option<Inner>,
    label: String,
}

crate::object_type!(Inner, Outer);

#[derive(Debug)]
struct InnerFactory;

impl ObjectFactory for InnerFactory {
    fn create(&self, ty: &TypeToken) -> Result<Option<Instance>, CreationError> {
        Ok(ty.is::<Inner>().then(|| Instance::new(Inner::default())))
    }
}

fn inner_ref() -> Arc<dyn ValueReference> {
    Arc::new(FieldReference::new(
        "inner",
        |o: &Outer| &o.inner,
        |o: &mut Outer| &mut o.inner,
    ))
}

fn count_ref() -> Arc<dyn ValueReference> {
    Arc::new(FieldReference::new(
        "count",
        |i: &Inner| &i.count,
        |i: &mut Inner| &mut i.count,
    ))
}

fn chain(factory: Option<ObjectFactoryRef>) -> DeferredReference {
    DeferredReference::new("inner.count", inner_ref(), count_ref(), factory)
}

#[test]
fn field_reference_reads_and_writes() {
    let label = FieldReference::new("label", |o: &Outer| &o.label, |o: &mut Outer| &mut o.label);
    let mut outer = Outer::default();

    label.set_value(&mut outer, Value::from("hello")).unwrap();

    assert_eq!(outer.label, "hello");
    assert_eq!(label.get_value(&outer).unwrap(), Value::from("hello"));
    assert_eq!(label.value_type(), TypeToken::of::<String>());
}

#[test]
fn field_reference_rejects_wrong_value_and_target() {
    let label = FieldReference::new("label", |o: &Outer| &o.label, |o: &mut Outer| &mut o.label);
    let mut outer = Outer::default();
    let mut inner = Inner::default();

    let err = label.set_value(&mut outer, Value::Int(1)).unwrap_err();
    assert!(matches!(err, AccessError::TypeMismatch { .. }));

    let err = label.set_value(&mut inner, Value::from("x")).unwrap_err();
    assert!(matches!(err, AccessError::WrongTarget { .. }));
}

#[test]
fn read_only_field_refuses_writes() {
    let label = FieldReference::read_only("label", |o: &Outer| &o.label);
    let mut outer = Outer::default();

    assert!(label.is_read_only());
    let err = label.set_value(&mut outer, Value::from("x")).unwrap_err();
    assert!(matches!(err, AccessError::ReadOnly { .. }));
}

#[test]
fn deferred_read_through_absent_outer_is_null() {
    let reference = chain(None);
    let outer = Outer::default();

    assert_eq!(reference.get_value(&outer).unwrap(), Value::Null);
    assert!(reference.resolve(&outer).unwrap().is_none());
}

#[test]
fn deferred_write_without_factory_fails() {
    let reference = chain(None);
    let mut outer = Outer::default();

    let err = reference.set_value(&mut outer, Value::Int(3)).unwrap_err();

    assert!(matches!(err, AccessError::NullIntermediate { ref name } if name == "inner"));
    assert!(outer.inner.is_none());
}

#[test]
fn deferred_write_creates_missing_intermediate() {
    let reference = chain(Some(Arc::new(InnerFactory)));
    let mut outer = Outer::default();

    reference.set_value(&mut outer, Value::Int(3)).unwrap();

    assert_eq!(outer.inner.as_ref().map(|i| i.count), Some(3));
    assert_eq!(reference.get_value(&outer).unwrap(), Value::Int(3));
}

#[test]
fn deferred_write_through_present_outer() {
    let reference = chain(None);
    let mut outer = Outer {
        inner: Some(Inner::default()),
        ..Outer::default()
    };

    reference.set_value(&mut outer, Value::Int(-8)).unwrap();

    assert_eq!(outer.inner.unwrap().count, -8);
    assert_eq!(reference.name(), "inner.count");
    assert_eq!(reference.value_type(), TypeToken::of::<i64>());
}

#[test]
fn deferred_through_read_only_outer_is_read_only() {
    let outer: Arc<dyn ValueReference> =
        Arc::new(FieldReference::read_only("inner", |o: &Outer| &o.inner));
    let reference = DeferredReference::new("inner.count", outer, count_ref(), None);

    assert!(reference.is_read_only());
    assert!(!chain(None).is_read_only());
}

#[test]
fn collection_access_routes_through_the_field() {
    let ops = CollectionAccess::<BTreeSet<String>>::new();
    let mut tags: BTreeSet<String> = BTreeSet::new();

    assert!(ops.add(&mut tags, &Value::from("b")).unwrap());
    assert!(ops.add(&mut tags, &Value::from("a")).unwrap());
    assert!(!ops.add(&mut tags, &Value::from("a")).unwrap());

    assert_eq!(ops.size(&tags).unwrap(), 2);
    assert!(ops.contains(&tags, &Value::from("a")).unwrap());
    assert_eq!(
        ops.values(&tags).unwrap(),
        vec![Value::from("a"), Value::from("b")]
    );

    assert!(ops.remove(&mut tags, &Value::from("a")).unwrap());
    ops.clear(&mut tags).unwrap();
    assert_eq!(ops.size(&tags).unwrap(), 0);
    assert_eq!(ops.element_type(), TypeToken::of::<String>());
}

#[test]
fn collection_access_rejects_foreign_elements() {
    let ops = CollectionAccess::<Vec<i64>>::new();
    let mut list: Vec<i64> = Vec::new();

    let err = ops.add(&mut list, &Value::from("x")).unwrap_err();

    assert!(matches!(err, AccessError::TypeMismatch { .. }));
    assert!(list.is_empty());
}

#[test]
fn embedded_operation_navigates_then_invokes() {
    let invoker: Invoker<Inner> = Arc::new(|inner: &mut Inner, args: &[Value]| {
        let by = args.first().and_then(Value::to::<i64>).unwrap_or(1);
        inner.count += by;

        Ok(Value::Int(inner.count))
    });
    let bump = Arc::new(MethodReference::new("bump", invoker));
    let op = EmbeddedOperationReference::new("inner.bump", inner_ref(), bump);

    let mut outer = Outer::default();
    let err = op.invoke(&mut outer, &[]).unwrap_err();
    assert!(matches!(err, AccessError::NullIntermediate { .. }));

    outer.inner = Some(Inner::default());
    assert_eq!(op.invoke(&mut outer, &[Value::Int(4)]).unwrap(), Value::Int(4));
    assert_eq!(op.invoke(&mut outer, &[]).unwrap(), Value::Int(5));
    assert_eq!(op.name(), "inner.bump");
}
