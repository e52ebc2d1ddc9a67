
//! Core traits for mapping between graph values, result rows, and Rust structs.

use neo4rs::{BoltType, Row as Record};

use crate::error::OgmaError;

/// A type with a fixed graph label.
///
/// Automatically implemented by `#[derive(IntoGraphValue)]`; the label
/// defaults to the struct name and can be overridden with
/// `#[ogma(label = "...")]`.
///
/// ```rust,ignore
/// #[derive(IntoGraphValue)]
/// #[ogma(label = "Movie")]
/// struct Movie {
///     id: i64,
///     title: String,
/// }
///
/// assert_eq!(Movie::LABEL, "Movie");
/// ```
pub trait GraphEntity {
    /// The graph label (e.g. `"Movie"`).
    const LABEL: &'static str;
}

/// Converts a single bolt value into a Rust type.
///
/// This is the core read-side conversion primitive. Implementations exist
/// for primitives, collections, temporal types, and the engine's own
/// [`Value`](crate::value::Value) model (which also unwraps nodes and
/// relationships into property maps).
pub trait FromGraphValue: Sized {
    /// Convert a [`BoltType`] into `Self`.
    fn from_value(value: BoltType) -> Result<Self, OgmaError>;
}

/// Maps a result row into a Rust struct by column name.
///
/// Automatically implemented by `#[derive(FromGraphRow)]`. Each struct field
/// maps to a column name in the row.
///
/// # Field attributes
///
/// - **`Option<T>`** fields tolerate missing columns (become `None`).
/// - **`#[ogma(flatten)]`** delegates to the inner type's `FromGraphRow`
///   impl, passing the same row. Useful for composing result structs.
pub trait FromGraphRow: Sized {
    /// Deserialize a [`Row`](neo4rs::Row) into `Self`.
    fn from_row(record: &Record) -> Result<Self, OgmaError>;
}
