
//! The tagged value model every engine stage operates on.
//!
//! Typed structs convert into [`Value`] once (via the `IntoGraphValue`
//! derive or a manual `From` impl) and the flattener, aggregator, and
//! emitter only ever see this enum. Dictionary-shaped anonymous graphs are
//! built from [`Value::Map`] directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A graph property value.
///
/// Maps use [`BTreeMap`] so iteration order, and therefore every emitted
/// Cypher statement, is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Float(f64),
    /// String value. UUIDs and enum-like values land here, stringified,
    /// since Cypher has no native UUID or enum type.
    String(String),
    /// Timestamp value.
    DateTime(DateTime<Utc>),
    /// List value: a to-many relation or a plain array property.
    List(Vec<Value>),
    /// Map value: a flattened node or a to-one relation.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// UUIDs render as their hyphenated string form.
impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => x.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(|x| x.into()).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(v: BTreeMap<String, T>) -> Self {
        Value::Map(v.into_iter().map(|(k, x)| (k, x.into())).collect())
    }
}

/// Shorthand for building a [`Value::Map`] from pairs.
///
/// ```rust
/// # use ogma_core::value::{map_of, Value};
/// let movie = map_of([("Id", Value::from(1_i64)), ("Title", Value::from("Alien"))]);
/// assert_eq!(movie.get("Title"), Some(&Value::from("Alien")));
/// ```
pub fn map_of<const N: usize>(pairs: [(&str, Value); N]) -> BTreeMap<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
