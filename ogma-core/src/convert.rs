
//! Conversions across the bolt boundary.
//!
//! Outgoing: [`to_bolt`] turns a [`Value`] into a `neo4rs::BoltType` query
//! parameter. Incoming: [`FromGraphValue`] implementations map bolt values
//! from result rows back into Rust types. Everything that touches `neo4rs`
//! value types lives here so the engine stays driver-agnostic.

use std::collections::BTreeMap;

use crate::error::OgmaError;
use crate::traits::FromGraphValue;
use crate::value::Value;

/// Returns a human-readable name for a [`neo4rs::BoltType`] variant.
///
/// Used in error messages to describe the actual type received when a
/// conversion fails.
pub fn type_name(v: &neo4rs::BoltType) -> &'static str {
    match v {
        neo4rs::BoltType::Null(_) => "Null",
        neo4rs::BoltType::Boolean(_) => "Boolean",
        neo4rs::BoltType::Integer(_) => "Integer",
        neo4rs::BoltType::Float(_) => "Float",
        neo4rs::BoltType::String(_) => "String",
        neo4rs::BoltType::Bytes(_) => "Bytes",
        neo4rs::BoltType::List(_) => "List",
        neo4rs::BoltType::Map(_) => "Map",
        neo4rs::BoltType::Node(_) => "Node",
        neo4rs::BoltType::Relation(_) => "Relationship",
        neo4rs::BoltType::UnboundedRelation(_) => "UnboundedRelationship",
        neo4rs::BoltType::Path(_) => "Path",
        neo4rs::BoltType::Point2D(_) => "Point2D",
        neo4rs::BoltType::Point3D(_) => "Point3D",
        neo4rs::BoltType::Duration(_) => "Duration",
        neo4rs::BoltType::Date(_) => "Date",
        neo4rs::BoltType::Time(_) => "Time",
        neo4rs::BoltType::LocalTime(_) => "LocalTime",
        neo4rs::BoltType::LocalDateTime(_) => "LocalDateTime",
        neo4rs::BoltType::DateTime(_) => "DateTime",
        neo4rs::BoltType::DateTimeZoneId(_) => "DateTimeZoneId",
    }
}

/// Convert a [`Value`] into a bolt query parameter.
///
/// Timestamps cross the wire as RFC 3339 strings; lists and maps convert
/// element-wise.
pub fn to_bolt(value: Value) -> neo4rs::BoltType {
    match value {
        Value::Null => neo4rs::BoltType::Null(neo4rs::BoltNull),
        Value::Bool(b) => neo4rs::BoltType::Boolean(neo4rs::BoltBoolean { value: b }),
        Value::Int(i) => neo4rs::BoltType::Integer(neo4rs::BoltInteger::new(i)),
        Value::Float(f) => neo4rs::BoltType::Float(neo4rs::BoltFloat::new(f)),
        Value::String(s) => neo4rs::BoltType::String(neo4rs::BoltString { value: s }),
        Value::DateTime(dt) => {
            neo4rs::BoltType::String(neo4rs::BoltString { value: dt.to_rfc3339() })
        }
        Value::List(items) => {
            let converted: Vec<neo4rs::BoltType> = items.into_iter().map(to_bolt).collect();
            neo4rs::BoltType::List(converted.into())
        }
        Value::Map(map) => {
            let converted: neo4rs::BoltMap = map
                .into_iter()
                .map(|(k, v)| (neo4rs::BoltString { value: k }, to_bolt(v)))
                .collect();
            neo4rs::BoltType::Map(converted)
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric macro
// ---------------------------------------------------------------------------

macro_rules! impl_from_val_num {
    ($t:ty, $pat:ident) => {
        impl FromGraphValue for $t {
            fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
                match value {
                    neo4rs::BoltType::$pat(v) => Ok(v.value as $t),
                    other => Err(OgmaError::type_mismatch(
                        stringify!($pat),
                        type_name(&other),
                        stringify!($t),
                    )),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

impl FromGraphValue for String {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::String(s) => Ok(s.value),
            other => Err(OgmaError::type_mismatch("String", type_name(&other), "String")),
        }
    }
}

impl FromGraphValue for bool {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::Boolean(b) => Ok(b.value),
            other => Err(OgmaError::type_mismatch("Boolean", type_name(&other), "bool")),
        }
    }
}

impl_from_val_num!(i64, Integer);
impl_from_val_num!(i32, Integer);
impl_from_val_num!(u32, Integer);
impl_from_val_num!(i16, Integer);
impl_from_val_num!(f64, Float);
impl_from_val_num!(f32, Float);

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

impl<T: FromGraphValue> FromGraphValue for Vec<T> {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::List(xs) => xs.value.into_iter().map(T::from_value).collect(),
            other => Err(OgmaError::type_mismatch("List", type_name(&other), "Vec<T>")),
        }
    }
}

/// Present-but-null maps to `None`; a missing row column is handled by the
/// `FromGraphRow` derive (also `None`).
impl<T: FromGraphValue> FromGraphValue for Option<T> {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::Null(_) => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}

// ---------------------------------------------------------------------------
// Temporal types (chrono)
// ---------------------------------------------------------------------------

impl FromGraphValue for chrono::NaiveDate {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::Date(d) => {
                let date: chrono::NaiveDate = d.try_into().map_err(|e: neo4rs::Error| {
                    OgmaError::Mapping(format!("BoltDate -> NaiveDate: {e}"))
                })?;
                Ok(date)
            }
            other => Err(OgmaError::type_mismatch("Date", type_name(&other), "NaiveDate")),
        }
    }
}

/// Accepts both `DateTime` (fixed offset) and `DateTimeZoneId` (zone name) bolt types.
impl FromGraphValue for chrono::DateTime<chrono::FixedOffset> {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::DateTime(dt) => {
                let cdt: chrono::DateTime<chrono::FixedOffset> =
                    dt.try_into().map_err(|e: neo4rs::Error| {
                        OgmaError::Mapping(format!("BoltDateTime -> DateTime<FixedOffset>: {e}"))
                    })?;
                Ok(cdt)
            }
            neo4rs::BoltType::DateTimeZoneId(dt) => {
                let cdt: chrono::DateTime<chrono::FixedOffset> =
                    (&dt).try_into().map_err(|e: neo4rs::Error| {
                        OgmaError::Mapping(format!(
                            "BoltDateTimeZoneId -> DateTime<FixedOffset>: {e}"
                        ))
                    })?;
                Ok(cdt)
            }
            other => Err(OgmaError::type_mismatch(
                "DateTime",
                type_name(&other),
                "DateTime<FixedOffset>",
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Value — the catch-all for inspecting rows without a typed struct
// ---------------------------------------------------------------------------

/// Converts any bolt value into the engine's [`Value`] model.
///
/// Nodes and relationships unwrap to a [`Value::Map`] of their properties,
/// which is what the round-trip from a `RETURN <alias>` projection needs.
impl FromGraphValue for Value {
    fn from_value(value: neo4rs::BoltType) -> Result<Self, OgmaError> {
        match value {
            neo4rs::BoltType::Null(_) => Ok(Value::Null),
            neo4rs::BoltType::Boolean(b) => Ok(Value::Bool(b.value)),
            neo4rs::BoltType::Integer(i) => Ok(Value::Int(i.value)),
            neo4rs::BoltType::Float(f) => Ok(Value::Float(f.value)),
            neo4rs::BoltType::String(s) => Ok(Value::String(s.value)),
            neo4rs::BoltType::List(xs) => {
                let items: Result<Vec<Value>, OgmaError> =
                    xs.value.into_iter().map(Value::from_value).collect();
                Ok(Value::List(items?))
            }
            neo4rs::BoltType::Map(m) => Ok(Value::Map(bolt_map_to_values(m)?)),
            neo4rs::BoltType::Node(n) => Ok(Value::Map(bolt_map_to_values(n.properties)?)),
            neo4rs::BoltType::Relation(r) => Ok(Value::Map(bolt_map_to_values(r.properties)?)),
            neo4rs::BoltType::DateTime(dt) => {
                let cdt: chrono::DateTime<chrono::FixedOffset> =
                    dt.try_into().map_err(|e: neo4rs::Error| {
                        OgmaError::Mapping(format!("BoltDateTime -> DateTime: {e}"))
                    })?;
                Ok(Value::DateTime(cdt.with_timezone(&chrono::Utc)))
            }
            other => Err(OgmaError::type_mismatch("Value", type_name(&other), "Value")),
        }
    }
}

fn bolt_map_to_values(map: neo4rs::BoltMap) -> Result<BTreeMap<String, Value>, OgmaError> {
    let mut out = BTreeMap::new();
    for (k, v) in map.value {
        out.insert(k.value, Value::from_value(v)?);
    }
    Ok(out)
}
