
//! Row access helpers for the `FromGraphRow` derive.
//!
//! Generated code goes through these functions instead of touching the
//! `neo4rs::Row` API directly, keeping the driver surface in one place.

use neo4rs::{BoltType, Row as Record};

use crate::error::OgmaError;

/// Read a column from a row, `None` when the column does not exist.
pub fn get_value(record: &Record, key: &str) -> Option<BoltType> {
    record.get::<BoltType>(key).ok()
}

/// Read a column that must exist.
///
/// A missing column surfaces as [`OgmaError::MissingField`] naming the
/// struct being mapped, which is how non-`Option` derive fields fail.
pub fn get_required(
    record: &Record,
    key: &str,
    struct_name: &str,
) -> Result<BoltType, OgmaError> {
    get_value(record, key).ok_or_else(|| OgmaError::missing_field(key, struct_name))
}

/// Check whether a column exists in the row.
pub fn has_key(record: &Record, key: &str) -> bool {
    get_value(record, key).is_some()
}
