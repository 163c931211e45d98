//! Traced statement execution.
//!
//! Wraps an [`Executor`] and logs every statement via tracing.

use crate::connection::Executor;
use crate::error::Error;
use crate::row::{Row, Value};
use tracing::Instrument;

/// A wrapper around a database handle that logs all statements via tracing.
///
/// This is a thin wrapper that delegates to the underlying executor but adds
/// `tracing::debug_span!` around each query/execute call.
///
/// # Example
///
/// ```ignore
/// use trueup::ConnectionExt;
///
/// let traced = client.traced();
/// traced.execute("DROP TABLE IF EXISTS \"user\" CASCADE", &[]).await?;
/// ```
pub struct TracedConn<'a, C: Executor + ?Sized> {
    conn: &'a C,
}

impl<'a, C: Executor + ?Sized> TracedConn<'a, C> {
    /// Create a new traced wrapper.
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Execute a statement, returning the number of rows affected.
    pub async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, Error> {
        let span = tracing::debug_span!(
            "db.execute",
            sql = %sql,
            params = params.len(),
            affected = tracing::field::Empty,
        );
        let affected = self
            .conn
            .execute(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("affected", affected);
        Ok(affected)
    }

    /// Execute a query, returning all rows.
    pub async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, Error> {
        let span = tracing::debug_span!(
            "db.query",
            sql = %sql,
            params = params.len(),
            rows = tracing::field::Empty,
        );
        let rows = self
            .conn
            .query(sql, params)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());
        Ok(rows)
    }
}

/// Extension trait to get a traced wrapper from any executor.
pub trait ConnectionExt: Executor {
    /// Wrap this handle in a [`TracedConn`] for statement logging.
    fn traced(&self) -> TracedConn<'_, Self> {
        TracedConn::new(self)
    }
}

impl<C: Executor + ?Sized> ConnectionExt for C {}
