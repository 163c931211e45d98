//! Postgres-backed [`SchemaConnection`] over a [`SchemaRegistry`].
//!
//! The sync primitive here is deliberately plan-free: a forced pass drops
//! and recreates every registered table from its registered DDL, a soft pass
//! creates the tables that are missing and touches nothing else. Anything
//! that requires diffing live columns against the definition belongs to a
//! real migration engine, not this adapter.

use crate::connection::{BoxFuture, Executor, SchemaConnection, SyncOptions, SyncReport, SyncTarget};
use crate::dialect::Dialect;
use crate::error::Error;
use crate::registry::{SchemaRegistry, TableSpec};
use crate::row::{Row, Value};
use crate::traced::ConnectionExt;

const TABLE_PROBE: &str =
    "SELECT 1 FROM pg_catalog.pg_tables WHERE schemaname = current_schema() AND tablename = $1";

/// A [`SchemaConnection`] over a raw executor and a registered table set.
///
/// The executor is typically a `tokio_postgres::Client` (see
/// [`crate::connect`]) or a pooled `deadpool_postgres::Object`.
pub struct PgConnection<E: Executor> {
    executor: E,
    registry: SchemaRegistry,
    dialect: Dialect,
}

impl<E: Executor> PgConnection<E> {
    pub fn new(executor: E, registry: SchemaRegistry) -> Self {
        Self {
            executor,
            registry,
            dialect: Dialect::Postgres,
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The underlying executor (for cases where you need the raw handle).
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// A sync target scoped to a single registered table.
    pub fn table(&self, name: &str) -> Result<TableHandle<'_, E>, Error> {
        let spec = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownTable(name.to_owned()))?;
        Ok(TableHandle { conn: self, spec })
    }

    async fn table_exists(&self, name: &str) -> Result<bool, Error> {
        let rows = self
            .executor
            .traced()
            .query(TABLE_PROBE, &[Value::from(name)])
            .await?;
        Ok(!rows.is_empty())
    }

    async fn sync_one(&self, spec: &TableSpec, options: SyncOptions) -> Result<SyncReport, Error> {
        let conn = self.executor.traced();
        let mut tables = Vec::new();

        if options.force {
            conn.execute(&spec.drop_sql(), &[]).await?;
            conn.execute(&spec.create_sql, &[]).await?;
            tables.push(spec.name.clone());
        } else if !self.table_exists(&spec.name).await? {
            conn.execute(&spec.create_sql, &[]).await?;
            tables.push(spec.name.clone());
        }

        Ok(SyncReport {
            tables,
            forced: options.force,
        })
    }

    async fn sync_all(&self, options: SyncOptions) -> Result<SyncReport, Error> {
        let conn = self.executor.traced();
        let mut tables = Vec::new();

        if options.force {
            for stmt in self.registry.drop_statements() {
                conn.execute(&stmt, &[]).await?;
            }
            for spec in self.registry.tables() {
                conn.execute(&spec.create_sql, &[]).await?;
                tables.push(spec.name.clone());
            }
        } else {
            for spec in self.registry.tables() {
                if !self.table_exists(&spec.name).await? {
                    conn.execute(&spec.create_sql, &[]).await?;
                    tables.push(spec.name.clone());
                }
            }
        }

        Ok(SyncReport {
            tables,
            forced: options.force,
        })
    }
}

impl<E: Executor> Executor for PgConnection<E> {
    fn execute<'a>(&'a self, sql: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<u64, Error>> {
        self.executor.execute(sql, params)
    }

    fn query<'a>(
        &'a self,
        sql: &'a str,
        params: &'a [Value],
    ) -> BoxFuture<'a, Result<Vec<Row>, Error>> {
        self.executor.query(sql, params)
    }
}

impl<E: Executor> SchemaConnection for PgConnection<E> {
    fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        Box::pin(self.sync_all(options))
    }
}

impl<E: Executor> SyncTarget for PgConnection<E> {
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        SchemaConnection::sync(self, options)
    }

    fn connection(&self) -> &dyn SchemaConnection {
        self
    }
}

/// A single registered table, usable as a [`SyncTarget`].
pub struct TableHandle<'c, E: Executor> {
    conn: &'c PgConnection<E>,
    spec: &'c TableSpec,
}

impl<'c, E: Executor> TableHandle<'c, E> {
    pub fn name(&self) -> &str {
        &self.spec.name
    }
}

impl<'c, E: Executor> std::fmt::Debug for TableHandle<'c, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableHandle")
            .field("table", &self.spec.name)
            .finish()
    }
}

impl<'c, E: Executor> SyncTarget for TableHandle<'c, E> {
    fn sync<'a>(&'a self, options: SyncOptions) -> BoxFuture<'a, Result<SyncReport, Error>> {
        Box::pin(self.conn.sync_one(self.spec, options))
    }

    fn connection(&self) -> &dyn SchemaConnection {
        self.conn
    }
}
