//! The registered table set.
//!
//! A [`SchemaRegistry`] holds the declared shape of a database: each table's
//! name plus the full `CREATE TABLE` statement for its current definition.
//! Registration order is preserved, so collective synchronization is
//! deterministic: parents registered before children create cleanly.

use indexmap::IndexMap;
use trueup_sql::quote_ident;

/// A registered table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Table name, unquoted.
    pub name: String,

    /// Complete `CREATE TABLE` DDL for the table's current shape.
    pub create_sql: String,
}

impl TableSpec {
    pub fn new(name: impl Into<String>, create_sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create_sql: create_sql.into(),
        }
    }

    /// The statement that removes this table and everything depending on it.
    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(&self.name))
    }
}

/// An insertion-ordered set of table definitions.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: IndexMap<String, TableSpec>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table definition, replacing any previous definition with
    /// the same name (the replacement keeps the original position).
    pub fn register(&mut self, spec: TableSpec) -> &mut Self {
        self.tables.insert(spec.name.clone(), spec);
        self
    }

    /// Look up a registered table by name.
    pub fn get(&self, name: &str) -> Option<&TableSpec> {
        self.tables.get(name)
    }

    /// Registered tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSpec> {
        self.tables.values()
    }

    /// Registered table names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Drop statements for every registered table, in registration order.
    ///
    /// `CASCADE` covers dependency order, so these do not need to run in
    /// reverse.
    pub fn drop_statements(&self) -> Vec<String> {
        self.tables.values().map(TableSpec::drop_sql).collect()
    }

    /// Create statements for every registered table, in registration order.
    pub fn create_statements(&self) -> Vec<String> {
        self.tables
            .values()
            .map(|spec| spec.create_sql.clone())
            .collect()
    }
}
