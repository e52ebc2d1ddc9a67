
//! The command execution boundary.
//!
//! [`Database`] wraps a [`neo4rs::Graph`] together with the context's
//! ambient transaction handle. The engine never talks to it directly — it
//! hands over finished [`Statement`]s and gets rows (or nothing) back. When
//! a transaction is open, every statement routes through it transparently.

use neo4rs::{Graph, Txn};
use tracing::debug;

use ogma_core::convert::to_bolt;
use ogma_core::error::OgmaError;
use ogma_core::statement::Statement;
use ogma_core::traits::FromGraphRow;

use crate::stream::GraphStream;

fn build_query(statement: &Statement) -> neo4rs::Query {
    let mut query = neo4rs::query(&statement.text);
    for (name, value) in &statement.parameters {
        query = query.param(name, to_bolt(value.clone()));
    }
    query
}

/// A connection plus the ambient transaction state of one context.
pub struct Database {
    graph: Graph,
    txn: Option<Txn>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("txn", &self.txn.is_some())
            .finish()
    }
}

impl Database {
    /// Wrap an established connection.
    pub fn new(graph: Graph) -> Self {
        Self { graph, txn: None }
    }

    /// Whether a transaction is currently open.
    pub fn in_transaction(&self) -> bool {
        self.txn.is_some()
    }

    /// Execute a statement, discarding any result rows.
    pub async fn run(&mut self, statement: &Statement) -> Result<(), OgmaError> {
        let query = build_query(statement);
        match self.txn.as_mut() {
            Some(txn) => txn.run(query).await?,
            None => self.graph.run(query).await?,
        }
        Ok(())
    }

    /// Execute a statement and collect all rows, mapped to `T`.
    pub async fn fetch_all<T: FromGraphRow>(
        &mut self,
        statement: &Statement,
    ) -> Result<Vec<T>, OgmaError> {
        let query = build_query(statement);
        let mut out = Vec::new();
        match self.txn.as_mut() {
            Some(txn) => {
                let mut stream = txn.execute(query).await?;
                while let Some(row) = stream.next(txn.handle()).await? {
                    out.push(T::from_row(&row)?);
                }
            }
            None => {
                let mut stream = self.graph.execute(query).await?;
                while let Some(row) = stream.next().await? {
                    out.push(T::from_row(&row)?);
                }
            }
        }
        Ok(out)
    }

    /// Execute a statement and return zero or one row, mapped to `T`.
    pub async fn fetch_optional<T: FromGraphRow>(
        &mut self,
        statement: &Statement,
    ) -> Result<Option<T>, OgmaError> {
        let query = build_query(statement);
        let row = match self.txn.as_mut() {
            Some(txn) => {
                let mut stream = txn.execute(query).await?;
                stream.next(txn.handle()).await?
            }
            None => {
                let mut stream = self.graph.execute(query).await?;
                stream.next().await?
            }
        };
        match row {
            Some(row) => Ok(Some(T::from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Execute a statement and return exactly one row, mapped to `T`.
    ///
    /// Returns [`OgmaError::MissingField`] if the result set is empty.
    pub async fn fetch_one<T: FromGraphRow>(
        &mut self,
        statement: &Statement,
    ) -> Result<T, OgmaError> {
        self.fetch_optional(statement)
            .await?
            .ok_or_else(|| OgmaError::missing_field("row", "fetch_one"))
    }

    /// Execute a statement and return a streaming iterator of `T`.
    ///
    /// Unlike [`fetch_all`](Self::fetch_all), rows are converted one at a
    /// time as they arrive from the server. Only available outside a
    /// transaction (use [`fetch_all`](Self::fetch_all) inside one).
    pub async fn fetch_stream<T: FromGraphRow>(
        &self,
        statement: &Statement,
    ) -> Result<GraphStream<T>, OgmaError> {
        use futures::TryStreamExt;
        let query = build_query(statement);
        let detached = self.graph.execute(query).await?;
        let stream = detached.into_stream().into_stream();
        Ok(GraphStream::new(Box::pin(stream)))
    }

    /// Open a transaction. All subsequent statements on this database run
    /// inside it until [`commit`](Self::commit) or
    /// [`rollback`](Self::rollback). Only one may be open at a time.
    pub async fn begin(&mut self) -> Result<(), OgmaError> {
        if self.txn.is_some() {
            return Err(OgmaError::Transaction(
                "a transaction is already open on this context".into(),
            ));
        }
        self.txn = Some(self.graph.start_txn().await?);
        debug!("transaction opened");
        Ok(())
    }

    /// Commit the open transaction. The handle is cleared before the commit
    /// is awaited, so the context can start a new transaction afterwards
    /// whatever the outcome.
    pub async fn commit(&mut self) -> Result<(), OgmaError> {
        match self.txn.take() {
            Some(txn) => {
                txn.commit().await?;
                debug!("transaction committed");
                Ok(())
            }
            None => Err(OgmaError::Transaction("no open transaction to commit".into())),
        }
    }

    /// Roll back the open transaction. Clears the handle like
    /// [`commit`](Self::commit).
    pub async fn rollback(&mut self) -> Result<(), OgmaError> {
        match self.txn.take() {
            Some(txn) => {
                txn.rollback().await?;
                debug!("transaction rolled back");
                Ok(())
            }
            None => Err(OgmaError::Transaction("no open transaction to roll back".into())),
        }
    }
}
