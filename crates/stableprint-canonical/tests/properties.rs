use proptest::prelude::*;
use stableprint_canonical::{encode, Map, Number, Value};

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(|f| Value::Number(Number::from_f64(f).unwrap())),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..6).prop_map(Value::Object),
        ]
    })
}

proptest! {
    #[test]
    fn encoding_is_deterministic(v in value()) {
        prop_assert_eq!(encode(&v).unwrap(), encode(&v.clone()).unwrap());
    }

    #[test]
    fn insertion_order_does_not_matter(
        pairs in prop::collection::btree_map("[a-z]{1,6}", leaf(), 1..10)
    ) {
        let forward: Map = pairs.clone().into_iter().collect();
        let reversed: Map = pairs.into_iter().rev().collect();
        prop_assert_eq!(
            encode(&Value::Object(forward)).unwrap(),
            encode(&Value::Object(reversed)).unwrap()
        );
    }

    #[test]
    fn integral_floats_encode_as_integers(n in -(1i64 << 53)..(1i64 << 53)) {
        let from_float = Value::Number(Number::from_f64(n as f64).unwrap());
        prop_assert_eq!(encode(&from_float).unwrap(), encode(&Value::from(n)).unwrap());
    }

    #[test]
    fn distinct_values_encode_differently(a in value(), b in value()) {
        prop_assume!(a != b);
        prop_assert_ne!(encode(&a).unwrap(), encode(&b).unwrap());
    }
}
