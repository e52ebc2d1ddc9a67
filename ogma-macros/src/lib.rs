
//! Procedural macros for ogma.
//!
//! This crate is not meant to be used directly — use the [`ogma`] facade
//! crate which re-exports both derives.

extern crate proc_macro;

use proc_macro::TokenStream;

mod from_graph_row;
mod into_graph_value;

/// Derive a `Value` conversion and a [`GraphEntity`](ogma_core::traits::GraphEntity) label for a struct.
///
/// Generates `impl From<T> for ogma_core::value::Value`, turning the struct
/// into a `Value::Map` of its fields, which is the form node sets accept.
/// This is the explicit, registration-time replacement for runtime
/// reflection: every savable type declares its conversion once.
///
/// # Attributes
///
/// **Struct-level:**
/// - `#[ogma(label = "...")]` — set the graph label. Defaults to the struct name.
///
/// **Field-level:**
/// - `#[ogma(prop = "...")]` — override the graph property name (default: field name).
/// - `#[ogma(skip)]` — exclude the field from the map.
///
/// # Example
///
/// ```rust,ignore
/// use ogma::prelude::*;
///
/// #[derive(IntoGraphValue)]
/// #[ogma(label = "Movie")]
/// struct Movie {
///     id: i64,
///     title: String,
///     #[ogma(prop = "released")]
///     release_year: i64,
///     #[ogma(skip)]
///     dirty: bool,
/// }
/// ```
///
/// Field types must convert into `Value`; nested `IntoGraphValue` structs
/// and `Vec`s of them qualify, which is how typed relation properties flow
/// into the flattener.
#[proc_macro_derive(IntoGraphValue, attributes(ogma))]
pub fn into_graph_value(input: TokenStream) -> TokenStream {
    into_graph_value::expand(input)
}

/// Derive [`FromGraphRow`](ogma_core::traits::FromGraphRow) for a struct.
///
/// Maps a result row to a Rust struct. Each field is read from the row by
/// its name (the Cypher alias).
///
/// # Attributes
///
/// **Field-level:**
/// - `#[ogma(flatten)]` — instead of reading a single column, delegates to
///   the inner type's `FromGraphRow::from_row()` with the same row. Useful
///   for composing result structs.
///
/// # Field type behaviour
///
/// - **`Option<T>`** — missing row column or `null` becomes `None`.
/// - **`T: FromGraphValue`** — any type with a value conversion, including
///   `Value` itself (which unwraps returned nodes into property maps).
///
/// # Example
///
/// ```rust,ignore
/// use ogma::prelude::*;
///
/// #[derive(FromGraphRow)]
/// struct MovieRow {
///     a0: Value,
///     score: Option<f64>,
/// }
/// ```
#[proc_macro_derive(FromGraphRow, attributes(ogma))]
pub fn from_graph_row(input: TokenStream) -> TokenStream {
    from_graph_row::expand(input)
}
