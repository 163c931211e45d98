//! PostgreSQL extension provisioning.
//!
//! Idempotently ensures named extensions are present. Existence is
//! authoritative in `pg_extension`; installs that fail are reported, not
//! raised.

use crate::connection::Executor;
use crate::error::Error;
use crate::row::Value;
use crate::traced::ConnectionExt;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};
use trueup_sql::Ident;

const CATALOG_PROBE: &str = "SELECT 1 FROM pg_extension WHERE extname = $1";

/// A validated extension name.
///
/// `CREATE EXTENSION` does not take bind parameters, so the name ends up in
/// statement text. This type only admits names matching a strict allow-list
/// (ASCII alphanumerics, `_` and `-`, not starting with a digit or `-`),
/// which covers every extension shipped in contrib (`pgcrypto`,
/// `uuid-ossp`, ...) while keeping quoting trouble out entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Validate a name against the allow-list.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();

        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            }
            None => false,
        };

        if valid {
            Ok(Self(name))
        } else {
            Err(Error::InvalidExtensionName(name))
        }
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExtensionName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ExtensionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ensure a named extension is installed.
///
/// Returns `Ok(true)` if this call installed it, `Ok(false)` if it was
/// already present or the install itself failed (install failure is logged,
/// never fatal). A failing catalog probe is a real error and propagates.
pub async fn ensure_extension<C: Executor + ?Sized>(conn: &C, name: &str) -> Result<bool, Error> {
    let name = ExtensionName::new(name)?;
    ensure_named(conn, &name).await
}

async fn ensure_named<C: Executor + ?Sized>(
    conn: &C,
    name: &ExtensionName,
) -> Result<bool, Error> {
    debug!(extension = %name, "checking for installed extension");
    let rows = conn
        .traced()
        .query(CATALOG_PROBE, &[Value::from(name.as_str())])
        .await?;

    if !rows.is_empty() {
        debug!(extension = %name, "extension is already installed");
        return Ok(false);
    }

    debug!(extension = %name, "missing extension, attempting to install");
    let create = format!("CREATE EXTENSION IF NOT EXISTS {}", Ident(name.as_str()));
    match conn.traced().execute(&create, &[]).await {
        Ok(_) => Ok(true),
        Err(err) => {
            warn!(extension = %name, error = %err, "failed to install extension");
            Ok(false)
        }
    }
}

/// Ensure a batch of extensions is installed, strictly in input order.
///
/// Returns the names whose installation actually occurred this call;
/// pre-existing extensions are present but not listed. An empty input
/// returns immediately without touching the connection. Names are processed
/// sequentially (concurrent `CREATE EXTENSION` against one connection is
/// not safe), and one install failure does not stop the names after it.
pub async fn ensure_extensions<C: Executor + ?Sized>(
    conn: &C,
    names: &[&str],
) -> Result<Vec<ExtensionName>, Error> {
    // If no extensions are required, we skip this
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let mut installed = Vec::new();
    for name in names {
        let name = ExtensionName::new(*name)?;
        if ensure_named(conn, &name).await? {
            installed.push(name);
        }
    }

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_names() {
        for name in ["pgcrypto", "uuid-ossp", "pg_trgm", "postgis", "_private"] {
            assert!(ExtensionName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_invalid_names() {
        for name in [
            "",
            "1pg",
            "-leading-dash",
            "pg crypto",
            "pgcrypto\"; DROP TABLE \"user",
            "pg'crypto",
            "name;--",
        ] {
            assert!(
                ExtensionName::new(name).is_err(),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_from_str() {
        let name: ExtensionName = "uuid-ossp".parse().unwrap();
        assert_eq!(name.as_str(), "uuid-ossp");
        assert!("uuid ossp".parse::<ExtensionName>().is_err());
    }

    proptest! {
        /// Accepted names never contain anything outside the allow-list, so
        /// the rendered CREATE EXTENSION statement cannot be escaped from.
        #[test]
        fn accepted_names_are_clean(name in ".*") {
            if let Ok(valid) = ExtensionName::new(name.as_str()) {
                prop_assert!(valid
                    .as_str()
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
                let rendered = format!("{}", Ident(valid.as_str()));
                prop_assert!(!rendered[1..rendered.len() - 1].contains('"'));
            }
        }
    }
}
