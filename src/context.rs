
//! The per-unit-of-work graph context.
//!
//! One [`GraphContext`] is meant for one logical unit of work at a time —
//! the common case being one request handler, one context. It owns the node
//! sets touched since the last flush, the statement fragments they produce,
//! and the ambient transaction state. Nothing survives a flush except the
//! shared configuration registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::debug;

use ogma_core::config::ConfigRegistry;
use ogma_core::error::OgmaError;
use ogma_core::statement::Statement;
use ogma_core::traits::{FromGraphRow, GraphEntity};
use ogma_core::value::Value;
use ogma_macros::FromGraphRow;

use crate::database::Database;
use crate::node_set::NodeSet;
use crate::query::MatchBuilder;

#[derive(FromGraphRow)]
struct CountRow {
    count: i64,
}

#[derive(FromGraphRow)]
struct AnyRow {
    any: bool,
}

/// Accumulates pending node sets and flushes them as one statement.
pub struct GraphContext {
    registry: Arc<ConfigRegistry>,
    database: Option<Database>,
    sets: Vec<NodeSet>,
    set_index: BTreeMap<String, usize>,
}

impl GraphContext {
    /// A context bound to a live connection.
    pub fn connect(graph: neo4rs::Graph, registry: Arc<ConfigRegistry>) -> Self {
        Self {
            registry,
            database: Some(Database::new(graph)),
            sets: Vec::new(),
            set_index: BTreeMap::new(),
        }
    }

    /// A context without a connection. Statement building works as usual;
    /// executing operations fail. Useful for generating scripts and for
    /// tests that assert emitted Cypher.
    pub fn detached(registry: Arc<ConfigRegistry>) -> Self {
        Self {
            registry,
            database: None,
            sets: Vec::new(),
            set_index: BTreeMap::new(),
        }
    }

    /// The node set for `label`, created on first touch. First-touch order
    /// fixes the set index used in aliases and `cp_` parameter names.
    pub fn node_set(&mut self, label: &str) -> &mut NodeSet {
        if let Some(&index) = self.set_index.get(label) {
            return &mut self.sets[index];
        }
        let index = self.sets.len();
        self.set_index.insert(label.to_string(), index);
        self.sets
            .push(NodeSet::new(label.to_string(), index, Arc::clone(&self.registry)));
        &mut self.sets[index]
    }

    /// The node set for a typed entity's label.
    pub fn node_set_of<T: GraphEntity>(&mut self) -> &mut NodeSet {
        self.node_set(T::LABEL)
    }

    /// Render everything pending into the single statement a flush would
    /// execute, without clearing anything. Returns `None` when no set has
    /// pending items.
    pub fn build_statement(&self) -> Result<Option<Statement>, OgmaError> {
        let mut fragments = Vec::new();
        for set in self.sets.iter().filter(|s| s.has_pending()) {
            fragments.extend(set.build_fragments()?);
        }
        Ok(Statement::join(fragments))
    }

    /// Flush every pending node set in one statement, then clear the
    /// pending buffers. A failed execution leaves the buffers intact so the
    /// same flush can be retried.
    pub async fn save_changes(&mut self) -> Result<(), OgmaError> {
        let statement = match self.build_statement()? {
            Some(statement) => statement,
            None => return Ok(()),
        };
        debug!(
            sets = self.sets.len(),
            parameters = statement.parameters.len(),
            "flushing pending node sets"
        );
        self.database_mut()?.run(&statement).await?;
        for set in &mut self.sets {
            set.clear();
        }
        Ok(())
    }

    /// Start a match over nodes of `label`.
    pub fn select(&self, label: &str) -> MatchBuilder {
        MatchBuilder::node(label)
    }

    /// Start a match over a typed entity's label.
    pub fn select_of<T: GraphEntity>(&self) -> MatchBuilder {
        MatchBuilder::node(T::LABEL)
    }

    /// Execute a match and collect all rows.
    pub async fn fetch_all<T: FromGraphRow>(
        &mut self,
        query: &MatchBuilder,
    ) -> Result<Vec<T>, OgmaError> {
        let statement = query.to_cypher_list()?;
        self.database_mut()?.fetch_all(&statement).await
    }

    /// Execute a match and return the first row, if any.
    pub async fn fetch_first<T: FromGraphRow>(
        &mut self,
        query: &MatchBuilder,
    ) -> Result<Option<T>, OgmaError> {
        let statement = query.to_cypher_first()?;
        self.database_mut()?.fetch_optional(&statement).await
    }

    /// Count the matched nodes.
    pub async fn count(&mut self, query: &MatchBuilder) -> Result<i64, OgmaError> {
        let statement = query.to_cypher_count()?;
        let row: CountRow = self.database_mut()?.fetch_one(&statement).await?;
        Ok(row.count)
    }

    /// Whether the match finds anything.
    pub async fn any(&mut self, query: &MatchBuilder) -> Result<bool, OgmaError> {
        let statement = query.to_cypher_any()?;
        let row: AnyRow = self.database_mut()?.fetch_one(&statement).await?;
        Ok(row.any)
    }

    /// Lock the matched rows for the duration of the open transaction.
    pub async fn lock(&mut self, query: &MatchBuilder) -> Result<(), OgmaError> {
        let statement = query.to_cypher_lock()?;
        self.database_mut()?.run(&statement).await
    }

    /// SET the given properties on every matched node.
    pub async fn update(
        &mut self,
        query: &MatchBuilder,
        changes: BTreeMap<String, Value>,
    ) -> Result<(), OgmaError> {
        let statement = query.to_cypher_update(&changes)?;
        self.database_mut()?.run(&statement).await
    }

    /// Run `body` inside a transaction scope.
    ///
    /// Commits when the body returns `Ok`, rolls back and re-throws the
    /// body's original error otherwise. The transaction handle is cleared on
    /// every exit path, so the context can open a new transaction later.
    /// Only one transaction may be open per context at a time.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use ogma::context::GraphContext;
    /// # async fn example(mut ctx: GraphContext) -> Result<(), ogma_core::OgmaError> {
    /// let created = ctx
    ///     .transaction(|ctx| {
    ///         Box::pin(async move {
    ///             ctx.node_set("Movie").add(ogma_core::value::Value::Map(Default::default()))?;
    ///             ctx.save_changes().await?;
    ///             Ok(1)
    ///         })
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn transaction<T, F>(&mut self, body: F) -> Result<T, OgmaError>
    where
        F: for<'c> FnOnce(&'c mut GraphContext) -> BoxFuture<'c, Result<T, OgmaError>>,
    {
        self.database_mut()?.begin().await?;
        match body(self).await {
            Ok(value) => {
                self.database_mut()?.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Ok(database) = self.database_mut() {
                    if let Err(rollback_err) = database.rollback().await {
                        debug!(error = %rollback_err, "rollback failed after transaction body error");
                    }
                }
                Err(err)
            }
        }
    }

    /// Whether a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.database.as_ref().is_some_and(Database::in_transaction)
    }

    /// Direct access to the execution boundary.
    pub fn database(&mut self) -> Result<&mut Database, OgmaError> {
        self.database_mut()
    }

    fn database_mut(&mut self) -> Result<&mut Database, OgmaError> {
        self.database.as_mut().ok_or_else(|| {
            OgmaError::config("this context was built detached; no database connection")
        })
    }
}
