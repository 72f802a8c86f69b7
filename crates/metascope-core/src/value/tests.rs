use super::*;
use proptest::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
struct Point {
    x: i64,
    y: i64,
}

crate::object_type!(Point);

#[test]
fn integers_cross_signedness_when_they_fit() {
    assert_eq!(u8::from_value(&Value::Int(200)), Some(200));
    assert_eq!(u8::from_value(&Value::Int(300)), None);
    assert_eq!(i32::from_value(&Value::Uint(7)), Some(7));
    assert_eq!(i8::from_value(&Value::Int(-129)), None);
    assert_eq!(u64::from_value(&Value::Int(-1)), None);
}

#[test]
fn every_integer_scalar_round_trips_at_its_bounds() {
    macro_rules! check_bounds {
        ( $( $type:ty ),* ) => {
            $(
                assert!(matches!(
                    <$type as crate::types::Typed>::type_token().shape(),
                    crate::types::Shape::Scalar(_)
                ));
                assert_eq!(<$type>::from_value(&<$type>::MIN.to_value()), Some(<$type>::MIN));
                assert_eq!(<$type>::from_value(&<$type>::MAX.to_value()), Some(<$type>::MAX));
            )*
        };
    }

    check_bounds!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
}

#[test]
fn floats_accept_integers() {
    assert_eq!(f64::from_value(&Value::Int(3)), Some(3.0));
    assert_eq!(f32::from_value(&Value::Float(1.5)), Some(1.5));
    assert_eq!(f64::from_value(&Value::Text("1".into())), None);
}

#[test]
fn optionals_map_null() {
    assert_eq!(Option::<String>::from_value(&Value::Null), Some(None));
    assert_eq!(
        Option::<String>::from_value(&Value::from("a")),
        Some(Some("a".to_string()))
    );
    assert_eq!(Some(4_u32).to_value(), Value::Uint(4));
    assert_eq!(None::<u32>.to_value(), Value::Null);
}

#[test]
fn optional_objects_navigate_only_when_present() {
    let mut empty: Option<Point> = None;
    let mut full = Some(Point { x: 1, y: 2 });

    assert!(empty.as_object().is_none());
    assert!(empty.as_object_mut().is_none());

    let object = full.as_object().unwrap();
    assert_eq!(object.downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));

    full.as_object_mut()
        .and_then(|object| object.downcast_mut::<Point>())
        .unwrap()
        .x = 9;
    assert_eq!(full.unwrap().x, 9);
}

#[test]
fn lists_reject_mixed_elements() {
    let mixed = Value::List(vec![Value::Int(1), Value::from("two")]);

    assert_eq!(Vec::<i64>::from_value(&mixed), None);
    assert_eq!(
        Vec::<i64>::from_value(&Value::List(vec![Value::Int(1), Value::Int(2)])),
        Some(vec![1, 2])
    );
}

#[test]
fn objects_travel_as_instances() {
    let point = Point { x: 3, y: 4 };
    let value = point.to_value();

    assert_eq!(value.kind(), "instance");
    assert_eq!(value.to::<Point>(), Some(point.clone()));
    assert_eq!(value, Value::instance(point));
    assert_ne!(value, Value::instance(Point::default()));
}

#[test]
fn instances_downcast_and_take() {
    let mut instance = Instance::new(Point { x: 1, y: 1 });

    assert!(instance.is::<Point>());
    assert!(instance.type_name().ends_with("Point"));
    instance.downcast_mut::<Point>().unwrap().y = 5;

    let copy = instance.clone();
    assert_eq!(copy, instance);
    assert_eq!(instance.take::<String>(), None);
    assert_eq!(copy.take::<Point>(), Some(Point { x: 1, y: 5 }));
}

proptest! {
    #[test]
    fn i64_survives_value(n in any::<i64>()) {
        prop_assert_eq!(i64::from_value(&n.to_value()), Some(n));
    }

    #[test]
    fn text_survives_value(s in ".*") {
        prop_assert_eq!(String::from_value(&s.to_value()), Some(s));
    }
}
