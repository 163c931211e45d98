//! Connection capability traits.
//!
//! The service never accepts a bare duck-typed handle: anything that wants to
//! be synchronized has to satisfy an explicit capability set. [`Executor`]
//! covers raw statements, [`SchemaConnection`] adds the dialect and the
//! collective sync primitive, and [`SyncTarget`] is the granularity both
//! single tables and whole connections share.

use crate::dialect::Dialect;
use crate::error::Error;
use crate::row::{Row, Value, pg_row_to_row};
use postgres_types::ToSql;
use std::future::Future;
use std::pin::Pin;

/// Boxed future type returned by the capability traits.
///
/// Implementors wrap their async bodies with `Box::pin`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for database handles that can execute raw statements.
///
/// This is implemented for `tokio_postgres::Client` and
/// `deadpool_postgres::Object`; test doubles implement it directly.
pub trait Executor: Send + Sync {
    /// Execute a statement, returning the number of rows affected.
    fn execute<'a>(&'a self, sql: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<u64, Error>>;

    /// Execute a query, returning all rows.
    fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, Error>>;
}

fn as_pg_params(params: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

impl Executor for tokio_postgres::Client {
    fn execute<'a>(&'a self, sql: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<u64, Error>> {
        Box::pin(async move {
            let params = as_pg_params(params);
            Ok(tokio_postgres::Client::execute(self, sql, &params).await?)
        })
    }

    fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, Error>> {
        Box::pin(async move {
            let params = as_pg_params(params);
            let rows = tokio_postgres::Client::query(self, sql, &params).await?;
            rows.iter().map(pg_row_to_row).collect()
        })
    }
}

impl Executor for deadpool_postgres::Object {
    fn execute<'a>(&'a self, sql: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<u64, Error>> {
        // Deref to the underlying Client to avoid recursion
        use std::ops::Deref;
        let client: &tokio_postgres::Client = self.deref();
        Executor::execute(client, sql, params)
    }

    fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, Error>> {
        use std::ops::Deref;
        let client: &tokio_postgres::Client = self.deref();
        Executor::query(client, sql, params)
    }
}

/// Options for a synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Drop the target table(s) and recreate them from the current
    /// definition, discarding existing data.
    pub force: bool,
}

impl SyncOptions {
    /// Options for a forced (drop and recreate) pass.
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Outcome of a synchronization pass, as reported by the sync primitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Names of the tables whose DDL actually ran during this pass.
    pub tables: Vec<String>,

    /// Whether this was a forced (destructive) pass.
    pub forced: bool,
}

/// A database connection the service can synchronize.
///
/// On top of raw statements this exposes the dialect (which decides the
/// constraint-toggle statement form) and the sync primitive scoped to the
/// connection's full registered table set.
pub trait SchemaConnection: Executor {
    /// The dialect this connection speaks.
    fn dialect(&self) -> &Dialect;

    /// Reconcile every registered table with the database.
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>>;
}

/// Something that can be synchronized: a single table or a whole connection.
///
/// Connection types implement this alongside [`SchemaConnection`] (a
/// connection is its own sync target, at the collective granularity);
/// table-scoped handles implement it for the single-table granularity. The
/// synchronizer applies the same two operations uniformly to both.
pub trait SyncTarget: Send + Sync {
    /// Reconcile this target with the database.
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>>;

    /// The connection statements should be issued against.
    fn connection(&self) -> &dyn SchemaConnection;
}

/// Connect to a database and spawn the connection driver task.
///
/// The returned client implements [`Executor`] and is ready to be wrapped by
/// an adapter such as [`crate::PgConnection`].
pub async fn connect(database_url: &str) -> Result<tokio_postgres::Client, Error> {
    let (client, connection) = tokio_postgres::connect(database_url, tokio_postgres::NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!(error = %e, "database connection error");
        }
    });

    Ok(client)
}
