
//! Error types for ogma operations.

use thiserror::Error;

/// Unified error type for all ogma operations.
///
/// Row-mapping code wraps conversion errors with [`Context`](OgmaError::Context)
/// via [`with_context`](OgmaError::with_context), producing chained messages like:
///
/// ```text
/// MovieRow::released (column 'released'): type mismatch: expected Integer, got String (i64)
/// ```
#[derive(Error, Debug)]
pub enum OgmaError {
    /// A broken node configuration, surfaced at registry-build time.
    /// The registry cannot be used; fix the configuration and rebuild.
    #[error("configuration error: {0}")]
    Config(String),

    /// Identifier enforcement is active and no configured identifier of
    /// `label` carries a value, at the given relation nesting depth.
    #[error("no identifier value found for label '{label}' at relation depth {depth}")]
    IdentifiersMissing { label: String, depth: usize },

    /// Identifier enforcement is active and a configured identifier is
    /// present but null.
    #[error("identifier '{property}' of label '{label}' is null at relation depth {depth}")]
    IdentifierNull {
        label: String,
        property: String,
        depth: usize,
    },

    /// A filter or update expression referenced a property key that is not
    /// a plain Cypher identifier. Rejected at expression-translation time,
    /// never silently ignored.
    #[error("invalid property expression: {0}")]
    Expression(String),

    /// Transaction scope misuse, e.g. opening a second transaction on a
    /// context that already has one.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// A general mapping error with a freeform message.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// A required field was not found in a result row.
    #[error("missing field '{field}' on {struct_name}")]
    MissingField { field: String, struct_name: String },

    /// A bolt value variant did not match the expected Rust type.
    #[error("type mismatch: expected {expected}, got {got} ({context})")]
    TypeMismatch {
        expected: String,
        got: String,
        context: String,
    },

    /// Wraps an inner error with additional context (struct name, field, column).
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<OgmaError>,
    },

    /// A `neo4rs::Error` from the underlying driver. Propagated unmodified;
    /// there is no retry layer in the core.
    #[error("neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),
}

impl OgmaError {
    /// Create a [`Config`](OgmaError::Config) error.
    pub fn config(msg: impl Into<String>) -> Self {
        OgmaError::Config(msg.into())
    }

    /// Create a [`TypeMismatch`](OgmaError::TypeMismatch) error.
    pub fn type_mismatch(expected: &str, got: &str, context: &str) -> Self {
        OgmaError::TypeMismatch {
            expected: expected.to_owned(),
            got: got.to_owned(),
            context: context.to_owned(),
        }
    }

    /// Create a [`MissingField`](OgmaError::MissingField) error.
    pub fn missing_field(field: &str, struct_name: &str) -> Self {
        OgmaError::MissingField {
            field: field.to_owned(),
            struct_name: struct_name.to_owned(),
        }
    }

    /// Wrap this error with additional context, producing a [`Context`](OgmaError::Context) variant.
    ///
    /// The row-mapping derive calls this to annotate errors with the struct
    /// and field name so you can trace exactly where a conversion failed.
    ///
    /// ```rust
    /// # use ogma_core::OgmaError;
    /// let err = OgmaError::type_mismatch("Integer", "String", "i64");
    /// let wrapped = err.with_context("MovieRow::released");
    /// assert!(wrapped.to_string().contains("MovieRow::released"));
    /// ```
    pub fn with_context(self, ctx: impl Into<String>) -> Self {
        OgmaError::Context {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}
