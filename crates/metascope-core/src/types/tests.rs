use super::*;
use proptest::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct Widget;

crate::object_type!(Widget);

#[test]
fn cardinality_follows_shape() {
    let cases = [
        (TypeToken::of::<()>(), Cardinality::None),
        (TypeToken::of::<bool>(), Cardinality::Single),
        (TypeToken::of::<u8>(), Cardinality::Single),
        (TypeToken::of::<f64>(), Cardinality::Single),
        (TypeToken::of::<String>(), Cardinality::Nullable),
        (TypeToken::of::<Option<i32>>(), Cardinality::Nullable),
        (TypeToken::of::<Widget>(), Cardinality::Nullable),
        (TypeToken::of::<Vec<i32>>(), Cardinality::Multiple),
        (TypeToken::of::<VecDeque<String>>(), Cardinality::Multiple),
        (TypeToken::of::<BTreeSet<u64>>(), Cardinality::Multiple),
        (TypeToken::of::<HashSet<char>>(), Cardinality::Multiple),
    ];

    for (token, expected) in cases {
        assert_eq!(
            token.cardinality(),
            expected,
            "cardinality mismatch for {}",
            token.name()
        );
    }
}

#[test]
fn shapes_expose_nested_types() {
    let list = TypeToken::of::<Vec<Option<Widget>>>();
    let element = list.element().unwrap();

    assert!(list.is_collection());
    assert_eq!(element, TypeToken::of::<Option<Widget>>());
    assert_eq!(element.inner(), Some(TypeToken::of::<Widget>()));
    assert_eq!(element.object_type(), TypeToken::of::<Widget>());
    assert!(TypeToken::of::<String>().element().is_none());
}

#[test]
fn short_name_strips_path_and_generics() {
    assert_eq!(TypeToken::of::<Widget>().short_name(), "Widget");
    assert_eq!(TypeToken::of::<Vec<Widget>>().short_name(), "Vec");
    assert_eq!(TypeToken::of::<String>().short_name(), "String");
}

#[test]
fn identity_is_the_type_id() {
    let a = TypeToken::of::<Widget>();
    let b = TypeToken::object::<Widget>();

    assert_eq!(a, b);
    assert!(a.is::<Widget>());
    assert!(a.is_object());
    assert_ne!(a, TypeToken::of::<Option<Widget>>());
    assert_eq!(TypeToken::of::<Box<Widget>>(), a);
}

#[test]
fn primitive_classification() {
    assert!(Primitive::Float32.is_float());
    assert!(Primitive::Isize.is_signed_int());
    assert!(Primitive::Usize.is_unsigned_int());
    assert!(!Primitive::Bool.is_numeric());
    assert!(!Primitive::Char.is_numeric());
}

fn shapes() -> impl Strategy<Value = TypeToken> {
    prop::sample::select(vec![
        TypeToken::of::<()>(),
        TypeToken::of::<bool>(),
        TypeToken::of::<i64>(),
        TypeToken::of::<String>(),
        TypeToken::of::<Widget>(),
        TypeToken::of::<Option<u32>>(),
        TypeToken::of::<Option<Widget>>(),
        TypeToken::of::<Vec<u8>>(),
        TypeToken::of::<BTreeSet<i16>>(),
    ])
}

proptest! {
    #[test]
    fn multiple_iff_collection(token in shapes()) {
        prop_assert_eq!(token.cardinality().is_multiple(), token.element().is_some());
        prop_assert_eq!(token.cardinality().is_none(), token.is_unit());
    }

    #[test]
    fn object_type_is_idempotent(token in shapes()) {
        prop_assert_eq!(token.object_type().object_type(), token.object_type());
    }
}
