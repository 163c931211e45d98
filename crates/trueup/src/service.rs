//! The schema service facade.
//!
//! One entry point per outbound operation, delegating to the synchronizer
//! and the extension provisioner. Embedding applications hold one of these
//! next to their connection and call it during startup or administrative
//! flows.

use crate::connection::{Executor, SchemaConnection, SyncReport, SyncTarget};
use crate::error::Error;
use crate::extension::{self, ExtensionName};
use crate::sync;

/// Schema synchronization service.
///
/// # Example
///
/// ```ignore
/// use trueup::{SchemaService, PgConnection, SchemaRegistry};
///
/// let service = SchemaService::new();
/// let conn = PgConnection::new(client, registry);
/// service.drop_database(&conn).await?;
/// service.install_extensions(&["pgcrypto", "uuid-ossp"], &conn).await?;
/// ```
pub struct SchemaService;

impl SchemaService {
    pub fn new() -> Self {
        Self
    }

    /// Drop a single model's backing table and recreate it from its current
    /// definition. Existing rows are lost.
    pub async fn drop_model<T: SyncTarget + ?Sized>(&self, model: &T) -> Result<SyncReport, Error> {
        sync::drop_and_recreate(model).await
    }

    /// Alter a single model's backing table to match its current definition.
    pub async fn alter_model<T: SyncTarget + ?Sized>(&self, model: &T) -> Result<SyncReport, Error> {
        sync::alter_in_place(model).await
    }

    /// Drop every table registered on the connection and recreate them.
    /// Existing rows are lost.
    pub async fn drop_database<C>(&self, connection: &C) -> Result<SyncReport, Error>
    where
        C: SchemaConnection + SyncTarget,
    {
        sync::drop_and_recreate(connection).await
    }

    /// Alter every table registered on the connection to match its current
    /// definition.
    pub async fn alter_database<C>(&self, connection: &C) -> Result<SyncReport, Error>
    where
        C: SchemaConnection + SyncTarget,
    {
        sync::alter_in_place(connection).await
    }

    /// Ensure a PostgreSQL extension is installed. Returns whether this call
    /// installed it.
    pub async fn install_extension<C: Executor + ?Sized>(
        &self,
        name: &str,
        connection: &C,
    ) -> Result<bool, Error> {
        extension::ensure_extension(connection, name).await
    }

    /// Ensure a batch of PostgreSQL extensions is installed, in order.
    /// Returns the names actually installed by this call.
    pub async fn install_extensions<C: Executor + ?Sized>(
        &self,
        names: &[&str],
        connection: &C,
    ) -> Result<Vec<ExtensionName>, Error> {
        extension::ensure_extensions(connection, names).await
    }
}

impl Default for SchemaService {
    fn default() -> Self {
        Self::new()
    }
}
