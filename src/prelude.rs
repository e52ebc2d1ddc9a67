//! Convenience re-exports for common ogma usage.
//!
//! ```rust
//! use ogma::prelude::*;
//! ```
//!
//! This imports both derive macros (`IntoGraphValue`, `FromGraphRow`), the
//! configuration builders, the value model, the filter builder, the context
//! and node-set types, the error type, and [`GraphStream`].

pub use crate::{FromGraphRow, IntoGraphValue};

pub use ogma_core::config::{
    ConfigRegistry, ConfigRegistryBuilder, Direction, NameCase, NodeConfiguration, RelationConfig,
};
pub use ogma_core::eloquent::{Conjunction, Eloquent, Operator};
pub use ogma_core::error::OgmaError;
pub use ogma_core::statement::Statement;
pub use ogma_core::traits::{
    FromGraphRow as FromGraphRowTrait, FromGraphValue, GraphEntity,
};
pub use ogma_core::value::Value;

pub use crate::context::GraphContext;
pub use crate::database::Database;
pub use crate::node_set::NodeSet;
pub use crate::query::MatchBuilder;
pub use crate::stream::GraphStream;
