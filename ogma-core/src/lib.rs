
//! The ogma engine: value model, configuration registry, graph flattener,
//! node aggregator, Cypher emitter, and the Eloquent filter builder.
//!
//! This crate turns object graphs into parameterized Cypher and never talks
//! to a database itself — the `ogma` facade crate owns the execution
//! boundary and feeds [`Statement`](statement::Statement) fragments to it.

pub mod config;
pub mod convert;
pub mod eloquent;
pub mod emit;
pub mod error;
pub mod flatten;
pub mod ident;
pub mod record;
pub mod shape;
pub mod statement;
pub mod traits;
pub mod value;

pub use config::{ConfigRegistry, ConfigRegistryBuilder, Direction, NameCase, NodeConfiguration, RelationConfig};
pub use eloquent::{Conjunction, Eloquent, Operator};
pub use error::OgmaError;
pub use shape::ShapeNode;
pub use statement::Statement;
pub use value::Value;
