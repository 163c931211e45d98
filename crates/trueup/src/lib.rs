//! Schema synchronization and extension provisioning for Postgres-family
//! databases.
//!
//! This crate is the thin layer between an application's table definitions
//! and the database they live in:
//!
//! - Drop-and-recreate or alter-in-place a single table or a connection's
//!   whole registered table set, with foreign-key enforcement toggled off
//!   around the destructive path.
//! - Idempotently install named PostgreSQL extensions.
//!
//! There is no schema-diff engine here. The sync primitive is whatever the
//! connection supplies; the bundled [`PgConnection`] adapter implements it
//! over a [`SchemaRegistry`] of `CREATE TABLE` statements.
//!
//! # Example
//!
//! ```ignore
//! use trueup::{PgConnection, SchemaRegistry, SchemaService, TableSpec};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(TableSpec::new(
//!     "user",
//!     "CREATE TABLE \"user\" (id BIGSERIAL PRIMARY KEY, email TEXT NOT NULL UNIQUE)",
//! ));
//!
//! let client = trueup::connect("postgres://localhost/app").await?;
//! let conn = PgConnection::new(client, registry);
//!
//! let service = SchemaService::new();
//! service.install_extensions(&["pgcrypto"], &conn).await?;
//! service.alter_database(&conn).await?;
//! ```
//!
//! Every statement issued through the service is logged via `tracing` at
//! debug level; install a subscriber to see them.

mod connection;
mod dialect;
mod error;
mod extension;
mod pg;
mod registry;
mod row;
mod service;
mod sync;
mod traced;

pub use connection::{
    BoxFuture, Executor, SchemaConnection, SyncOptions, SyncReport, SyncTarget, connect,
};
pub use dialect::{Dialect, toggle_constraints};
pub use error::Error;
pub use extension::{ExtensionName, ensure_extension, ensure_extensions};
pub use pg::{PgConnection, TableHandle};
pub use registry::{SchemaRegistry, TableSpec};
pub use row::{Row, Value};
pub use service::SchemaService;
pub use sync::{alter_in_place, drop_and_recreate};
pub use traced::{ConnectionExt, TracedConn};

// Re-export the quoting helpers so embedders don't need a direct
// trueup-sql dependency for the common case.
pub use trueup_sql::{Ident, Lit, quote_ident};
