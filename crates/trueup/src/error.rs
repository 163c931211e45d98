use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("statement failed: {0}")]
    Statement(String),

    #[error("synchronization failed: {0}")]
    Sync(String),

    #[error("dialect name must not be empty")]
    EmptyDialect,

    #[error("invalid extension name: {0:?}")]
    InvalidExtensionName(String),

    #[error("no table named {0:?} is registered")]
    UnknownTable(String),

    #[error("cannot decode column {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: String,
    },
}
