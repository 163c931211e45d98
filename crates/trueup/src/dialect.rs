//! Dialect identification and the constraint toggle.

use crate::connection::SchemaConnection;
use crate::error::Error;
use crate::traced::ConnectionExt;
use std::fmt;

/// The database engine variant a connection targets.
///
/// The dialect decides which statement form toggles referential-integrity
/// enforcement; everything that is not SQLite gets the
/// `SET FOREIGN_KEY_CHECKS` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
    Sqlite,
    /// A dialect this crate has no special handling for.
    Other(String),
}

impl Dialect {
    /// Parse a dialect from its connection-reported name.
    ///
    /// Unknown names are accepted as [`Dialect::Other`]; an empty name is
    /// rejected.
    pub fn from_name(name: &str) -> Result<Dialect, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyDialect);
        }

        Ok(match name.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Dialect::Postgres,
            "mysql" | "mariadb" => Dialect::MySql,
            "sqlite" | "sqlite3" => Dialect::Sqlite,
            _ => Dialect::Other(name.to_owned()),
        })
    }

    /// The canonical name of this dialect.
    pub fn name(&self) -> &str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
            Dialect::Other(name) => name,
        }
    }

    /// The statement that enables or disables foreign-key enforcement.
    pub fn foreign_key_checks_sql(&self, enabled: bool) -> &'static str {
        match self {
            Dialect::Sqlite => trueup_sql::pragma_foreign_keys(enabled),
            _ => trueup_sql::set_foreign_key_checks(enabled),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enable or disable foreign-key enforcement on a connection.
///
/// Issues the dialect-appropriate statement. Destructive synchronization
/// wraps its DDL in an off/on pair of these.
pub async fn toggle_constraints(
    conn: &dyn SchemaConnection,
    enabled: bool,
) -> Result<(), Error> {
    let sql = conn.dialect().foreign_key_checks_sql(enabled);
    conn.traced().execute(sql, &[]).await?;
    Ok(())
}
