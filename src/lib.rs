#![doc = r#"
An object-graph mapping layer for Neo4j in Rust.

`ogma` walks typed object models (or dictionary-shaped anonymous graphs)
and generates safely parameterized MERGE/CREATE/MATCH/SET/FOREACH Cypher,
preserving graph topology — nodes, relations, direction, cardinality —
while avoiding duplicate far-node creation and relation-cycle recursion.
Built on [`neo4rs`] 0.8.

# Quick start

## Configure labels

Configuration is explicit and registered once at startup:

```rust
use std::sync::Arc;
use ogma::prelude::*;

let registry = Arc::new(
    ConfigRegistryBuilder::new()
        .register(
            "Movie",
            NodeConfiguration::new()
                .identifier("Id")
                .relation(
                    "Actors",
                    RelationConfig::new("ACTED_IN", Direction::In)
                        .target("Person")
                        .merge_on("Id"),
                ),
        )
        .unwrap()
        .register("Person", NodeConfiguration::new().identifier("Id"))
        .unwrap()
        .build()
        .unwrap(),
);
```

The `Actors` relation above restricts its far node to the `Id` merge key:
whatever else an actor object carries, the generated Cypher only ever
matches `(:Person {Id: ...})` and never overwrites existing person data.

## Define savable types

```rust
use ogma::prelude::*;

#[derive(IntoGraphValue)]
#[ogma(label = "Person")]
struct Person {
    id: i64,
    name: String,
}

#[derive(IntoGraphValue)]
#[ogma(label = "Movie")]
struct Movie {
    id: i64,
    title: String,
    actors: Vec<Person>,
}
```

Dictionary-shaped graphs work the same way — build a `Value::Map` by hand
and queue it on any label's node set.

## Queue and flush

```rust,no_run
# use std::sync::Arc;
# use ogma::prelude::*;
# #[derive(IntoGraphValue)]
# #[ogma(label = "Movie")]
# struct Movie { id: i64, title: String }
# async fn example(graph: neo4rs::Graph, registry: Arc<ogma_core::ConfigRegistry>) -> Result<(), OgmaError> {
let mut ctx = GraphContext::connect(graph, registry);
ctx.node_set_of::<Movie>()
    .merge(Movie { id: 1, title: "Alien".into() })?;
ctx.save_changes().await?;
# Ok(())
# }
```

`save_changes` folds every pending batch into one UNWIND-driven statement
per label and runs the lot as a single script. Pending buffers are cleared
only after a successful run, so a failed flush can simply be retried.

## Query

```rust,no_run
# use std::sync::Arc;
# use ogma::prelude::*;
# async fn example(mut ctx: ogma::context::GraphContext) -> Result<(), OgmaError> {
#[derive(FromGraphRow)]
struct MovieRow {
    a0: Value,
}

let query = ctx
    .select("Movie")
    .filter(Eloquent::new().where_value("Title", "Alien"));
let rows: Vec<MovieRow> = ctx.fetch_all(&query).await?;

let all_movies = ctx.select("Movie");
let total = ctx.count(&all_movies).await?;
# Ok(())
# }
```

## Transactions

```rust,no_run
# use ogma::context::GraphContext;
# async fn example(mut ctx: GraphContext) -> Result<(), ogma_core::OgmaError> {
ctx.transaction(|ctx| {
    Box::pin(async move {
        ctx.save_changes().await?;
        Ok(())
    })
})
.await?;
# Ok(())
# }
```

The scope commits on success, rolls back and re-throws the original error
on failure, and always clears the transaction handle afterwards.

# Error handling

All operations return [`OgmaError`]. Identifier-enforcement failures name
the offending label and relation depth; row-mapping errors are chained with
struct and field context:

```text
MovieRow::released (column 'released'): type mismatch: expected Integer, got String (i64)
```

[`neo4rs`]: https://docs.rs/neo4rs
"#]

pub mod context;
pub mod database;
pub mod node_set;
pub mod prelude;
pub mod query;
pub mod stream;

pub use ogma_core as core;
pub use ogma_macros::{FromGraphRow, IntoGraphValue};

pub use ogma_core::error::OgmaError;
pub use ogma_core::{
    ConfigRegistry, ConfigRegistryBuilder, Direction, Eloquent, NameCase, NodeConfiguration,
    Operator, RelationConfig, Statement, Value,
};

pub use context::GraphContext;
pub use node_set::NodeSet;
pub use query::MatchBuilder;
