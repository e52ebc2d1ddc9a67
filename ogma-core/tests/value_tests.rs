use std::collections::BTreeMap;

use chrono::TimeZone;
use ogma_core::convert::{to_bolt, type_name};
use ogma_core::error::OgmaError;
use ogma_core::traits::FromGraphValue;
use ogma_core::value::{map_of, Value};
use uuid::Uuid;

#[test]
fn test_value_from_scalars() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(42_i64), Value::Int(42));
    assert_eq!(Value::from(42_i32), Value::Int(42));
    assert_eq!(Value::from(2.5_f64), Value::Float(2.5));
    assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
    assert_eq!(Value::from("hello".to_string()), Value::String("hello".to_string()));
}

#[test]
fn test_value_from_option() {
    assert_eq!(Value::from(Option::<i64>::None), Value::Null);
    assert_eq!(Value::from(Some(1_i64)), Value::Int(1));
}

#[test]
fn test_uuid_normalizes_to_string() {
    let id = Uuid::new_v4();
    let v = Value::from(id);
    assert_eq!(v, Value::String(id.to_string()));
}

#[test]
fn test_uuid_list_normalizes_element_wise() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let v = Value::from(vec![a, b]);
    assert_eq!(
        v,
        Value::List(vec![
            Value::String(a.to_string()),
            Value::String(b.to_string())
        ])
    );
}

#[test]
fn test_map_of_builder() {
    let m = map_of([("Id", Value::from(1_i64)), ("Title", Value::from("Alien"))]);
    assert_eq!(m.get("Id"), Some(&Value::Int(1)));
    assert_eq!(m.get("Title"), Some(&Value::String("Alien".to_string())));
}

// --- to_bolt ---

#[test]
fn test_to_bolt_scalars() {
    match to_bolt(Value::Int(42)) {
        neo4rs::BoltType::Integer(i) => assert_eq!(i.value, 42),
        other => panic!("expected Integer, got: {}", type_name(&other)),
    }
    match to_bolt(Value::String("hi".into())) {
        neo4rs::BoltType::String(s) => assert_eq!(s.value, "hi"),
        other => panic!("expected String, got: {}", type_name(&other)),
    }
    match to_bolt(Value::Bool(true)) {
        neo4rs::BoltType::Boolean(b) => assert!(b.value),
        other => panic!("expected Boolean, got: {}", type_name(&other)),
    }
    assert!(matches!(to_bolt(Value::Null), neo4rs::BoltType::Null(_)));
}

#[test]
fn test_to_bolt_datetime_is_rfc3339_string() {
    let dt = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    match to_bolt(Value::DateTime(dt)) {
        neo4rs::BoltType::String(s) => assert_eq!(s.value, dt.to_rfc3339()),
        other => panic!("expected String, got: {}", type_name(&other)),
    }
}

#[test]
fn test_to_bolt_nested_collections() {
    let mut inner = BTreeMap::new();
    inner.insert("Id".to_string(), Value::Int(1));
    let value = Value::List(vec![Value::Map(inner)]);

    match to_bolt(value) {
        neo4rs::BoltType::List(xs) => {
            assert_eq!(xs.value.len(), 1);
            match &xs.value[0] {
                neo4rs::BoltType::Map(m) => assert_eq!(m.value.len(), 1),
                other => panic!("expected Map, got: {}", type_name(other)),
            }
        }
        other => panic!("expected List, got: {}", type_name(&other)),
    }
}

// --- FromGraphValue ---

#[test]
fn test_from_value_integer() {
    let val = neo4rs::BoltType::Integer(neo4rs::BoltInteger { value: 42 });
    let res = i64::from_value(val).unwrap();
    assert_eq!(res, 42);
}

#[test]
fn test_from_value_string() {
    let val = neo4rs::BoltType::String(neo4rs::BoltString { value: "hello".to_string() });
    let res = String::from_value(val).unwrap();
    assert_eq!(res, "hello");
}

#[test]
fn test_from_value_option() {
    let val = neo4rs::BoltType::Null(neo4rs::BoltNull);
    let res = Option::<i64>::from_value(val).unwrap();
    assert_eq!(res, None);

    let val = neo4rs::BoltType::Integer(neo4rs::BoltInteger { value: 42 });
    let res = Option::<i64>::from_value(val).unwrap();
    assert_eq!(res, Some(42));
}

#[test]
fn test_from_value_list() {
    let val = neo4rs::BoltType::List(neo4rs::BoltList {
        value: vec![
            neo4rs::BoltType::Integer(neo4rs::BoltInteger { value: 1 }),
            neo4rs::BoltType::Integer(neo4rs::BoltInteger { value: 2 }),
        ],
    });
    let res = Vec::<i64>::from_value(val).unwrap();
    assert_eq!(res, vec![1, 2]);
}

#[test]
fn test_type_mismatch_error() {
    let val = neo4rs::BoltType::String(neo4rs::BoltString { value: "oops".to_string() });
    let err = i64::from_value(val).unwrap_err();
    match &err {
        OgmaError::TypeMismatch { expected, got, .. } => {
            assert_eq!(expected, "Integer");
            assert_eq!(got, "String");
        }
        other => panic!("expected TypeMismatch, got: {other}"),
    }
}

#[test]
fn test_value_from_bolt_node_unwraps_properties() {
    let node = neo4rs::BoltNode::new(
        neo4rs::BoltInteger::new(1),
        vec![neo4rs::BoltType::from("Movie")].into(),
        vec![
            (neo4rs::BoltString::from("Id"), neo4rs::BoltType::from(42)),
            (neo4rs::BoltString::from("Title"), neo4rs::BoltType::from("Alien")),
        ]
        .into_iter()
        .collect(),
    );
    let val = neo4rs::BoltType::Node(node);
    let value = Value::from_value(val).unwrap();
    let map = value.as_map().expect("node should unwrap to a map");
    assert_eq!(map.get("Id"), Some(&Value::Int(42)));
    assert_eq!(map.get("Title"), Some(&Value::String("Alien".to_string())));
}

// --- Error context chaining ---

#[test]
fn test_error_with_context() {
    let err = OgmaError::type_mismatch("Integer", "String", "age");
    let ctx = err.with_context("MovieRow::age");
    let msg = ctx.to_string();
    assert!(msg.contains("MovieRow::age"));
    assert!(msg.contains("type mismatch"));
}

#[test]
fn test_identifier_errors_name_label_and_depth() {
    let missing = OgmaError::IdentifiersMissing {
        label: "Movie".into(),
        depth: 0,
    };
    assert!(missing.to_string().contains("Movie"));
    assert!(missing.to_string().contains("depth 0"));

    let null = OgmaError::IdentifierNull {
        label: "Person".into(),
        property: "Id".into(),
        depth: 1,
    };
    assert!(null.to_string().contains("Person"));
    assert!(null.to_string().contains("Id"));
    assert!(null.to_string().contains("depth 1"));
}
