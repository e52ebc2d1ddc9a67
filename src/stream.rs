
//! Streaming query results with automatic type mapping.

use std::marker::PhantomData;
use std::pin::Pin;

use futures::stream::Stream;

use ogma_core::error::OgmaError;
use ogma_core::traits::FromGraphRow;

/// A typed stream of query results mapped via [`FromGraphRow`].
///
/// Created by [`Database::fetch_stream`](crate::database::Database::fetch_stream).
/// Each call to [`next()`](Self::next) pulls the next row from the database
/// and maps it to `T`, keeping memory usage constant on large result sets.
pub struct GraphStream<T> {
    inner: Pin<Box<dyn Stream<Item = Result<neo4rs::Row, neo4rs::Error>> + Send>>,
    _marker: PhantomData<T>,
}

impl<T: FromGraphRow> GraphStream<T> {
    pub(crate) fn new(
        inner: Pin<Box<dyn Stream<Item = Result<neo4rs::Row, neo4rs::Error>> + Send>>,
    ) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Pull the next row from the stream and map it to `T`.
    ///
    /// Returns `None` when the stream is exhausted.
    pub async fn next(&mut self) -> Option<Result<T, OgmaError>> {
        use futures::StreamExt;
        match self.inner.next().await {
            None => None,
            Some(Err(e)) => Some(Err(OgmaError::Neo4j(e))),
            Some(Ok(row)) => Some(T::from_row(&row)),
        }
    }
}
