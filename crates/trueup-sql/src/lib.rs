//! SQL text helpers for trueup.
//!
//! Everything that turns a Rust value into SQL text lives here: quoting for
//! identifiers and string literals, and the fixed statement forms used to
//! toggle referential-integrity enforcement per dialect.

/// A PostgreSQL string literal wrapper.
///
/// Display writes the value escaped and quoted with single quotes.
///
/// # Example
/// ```
/// use trueup_sql::Lit;
/// assert_eq!(format!("{}", Lit("foo")), "'foo'");
/// assert_eq!(format!("{}", Lit("it's")), "'it''s'");
/// ```
pub struct Lit<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Lit<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'")?;
        for c in self.0.as_ref().chars() {
            if c == '\'' {
                write!(f, "''")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "'")
    }
}

/// A PostgreSQL identifier wrapper.
///
/// Display writes the value escaped and quoted with double quotes.
///
/// # Example
/// ```
/// use trueup_sql::Ident;
/// assert_eq!(format!("{}", Ident("user")), "\"user\"");
/// assert_eq!(format!("{}", Ident("bla\"h")), "\"bla\"\"h\"");
/// ```
pub struct Ident<T: AsRef<str>>(pub T);

impl<T: AsRef<str>> std::fmt::Display for Ident<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"")?;
        for c in self.0.as_ref().chars() {
            if c == '"' {
                write!(f, "\"\"")?;
            } else {
                write!(f, "{}", c)?;
            }
        }
        write!(f, "\"")
    }
}

/// Escape a string literal for SQL.
pub fn escape_string(s: &str) -> String {
    format!("{}", Lit(s))
}

/// Quote a PostgreSQL identifier.
///
/// Always quotes identifiers to avoid issues with reserved keywords like
/// `user`, `order`, `table`, `group`, etc. Doubles any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("{}", Ident(name))
}

/// SQLite's statement to enable or disable foreign-key enforcement.
///
/// # Examples
///
/// ```
/// assert_eq!(trueup_sql::pragma_foreign_keys(false), "PRAGMA foreign_keys = OFF");
/// assert_eq!(trueup_sql::pragma_foreign_keys(true), "PRAGMA foreign_keys = ON");
/// ```
pub fn pragma_foreign_keys(enabled: bool) -> &'static str {
    if enabled {
        "PRAGMA foreign_keys = ON"
    } else {
        "PRAGMA foreign_keys = OFF"
    }
}

/// The MySQL-style statement to enable or disable foreign-key checks.
///
/// This is the form every non-SQLite dialect gets.
///
/// # Examples
///
/// ```
/// assert_eq!(trueup_sql::set_foreign_key_checks(false), "SET FOREIGN_KEY_CHECKS = 0");
/// assert_eq!(trueup_sql::set_foreign_key_checks(true), "SET FOREIGN_KEY_CHECKS = 1");
/// ```
pub fn set_foreign_key_checks(enabled: bool) -> &'static str {
    if enabled {
        "SET FOREIGN_KEY_CHECKS = 1"
    } else {
        "SET FOREIGN_KEY_CHECKS = 0"
    }
}
