//! Owned row and value types.
//!
//! Statements issued through this crate bind parameters as [`Value`] and read
//! results back as [`Row`], so callers and test doubles never have to produce
//! a live `tokio_postgres::Row`.

use bytes::BytesMut;
use postgres_types::{IsNull, ToSql, Type as PgTypeInfo, to_sql_checked};

/// A runtime SQL value.
///
/// Used for statement parameters and row data.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL
    Null,

    /// Boolean
    Bool(bool),

    /// 16-bit signed integer (SMALLINT)
    I16(i16),

    /// 32-bit signed integer (INTEGER)
    I32(i32),

    /// 64-bit signed integer (BIGINT)
    I64(i64),

    /// 32-bit float (REAL)
    F32(f32),

    /// 64-bit float (DOUBLE PRECISION)
    F64(f64),

    /// Text (TEXT, VARCHAR, NAME, etc.)
    String(String),

    /// Binary data (BYTEA)
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true if this is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &PgTypeInfo,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql(ty, out),
            Value::I16(v) => v.to_sql(ty, out),
            Value::I32(v) => v.to_sql(ty, out),
            Value::I64(v) => v.to_sql(ty, out),
            Value::F32(v) => v.to_sql(ty, out),
            Value::F64(v) => v.to_sql(ty, out),
            Value::String(v) => v.to_sql(ty, out),
            Value::Bytes(v) => v.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &PgTypeInfo) -> bool {
        // The actual check happens per-variant in to_sql.
        true
    }

    to_sql_checked!();
}

/// A row of data as column name → value pairs.
pub type Row = Vec<(String, Value)>;

/// Convert a tokio_postgres Row to our Row type.
///
/// Conversion is driven by the runtime column types reported by the server.
pub fn pg_row_to_row(pg_row: &tokio_postgres::Row) -> Result<Row, crate::Error> {
    let mut row = Vec::with_capacity(pg_row.len());

    for (i, col) in pg_row.columns().iter().enumerate() {
        let value = pg_value_to_value(pg_row, i, col)?;
        row.push((col.name().to_owned(), value));
    }

    Ok(row)
}

/// Extract a value from a Postgres row at a given index.
fn pg_value_to_value(
    row: &tokio_postgres::Row,
    idx: usize,
    col: &tokio_postgres::Column,
) -> Result<Value, crate::Error> {
    let ty = col.type_();

    let value = if *ty == PgTypeInfo::BOOL {
        row.try_get::<_, Option<bool>>(idx)?.map(Value::Bool)
    } else if *ty == PgTypeInfo::INT2 {
        row.try_get::<_, Option<i16>>(idx)?.map(Value::I16)
    } else if *ty == PgTypeInfo::INT4 {
        row.try_get::<_, Option<i32>>(idx)?.map(Value::I32)
    } else if *ty == PgTypeInfo::INT8 {
        row.try_get::<_, Option<i64>>(idx)?.map(Value::I64)
    } else if *ty == PgTypeInfo::FLOAT4 {
        row.try_get::<_, Option<f32>>(idx)?.map(Value::F32)
    } else if *ty == PgTypeInfo::FLOAT8 {
        row.try_get::<_, Option<f64>>(idx)?.map(Value::F64)
    } else if *ty == PgTypeInfo::TEXT
        || *ty == PgTypeInfo::VARCHAR
        || *ty == PgTypeInfo::NAME
        || *ty == PgTypeInfo::BPCHAR
    {
        row.try_get::<_, Option<String>>(idx)?.map(Value::String)
    } else if *ty == PgTypeInfo::BYTEA {
        row.try_get::<_, Option<Vec<u8>>>(idx)?.map(Value::Bytes)
    } else {
        return Err(crate::Error::TypeMismatch {
            column: col.name().to_owned(),
            expected: "a supported scalar type",
            actual: ty.name().to_owned(),
        });
    };

    Ok(value.unwrap_or(Value::Null))
}
