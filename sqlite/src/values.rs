//! SQLite value type and its conversions.

use std::borrow::Cow;

use inscribe_core::FilterValue;
use serde_json::{Number, Value};

/// Represents a SQLite value
#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub enum SQLiteValue<'a> {
    /// Integer value (i64)
    Integer(i64),
    /// Real value (f64)
    Real(f64),
    /// Text value (borrowed or owned string)
    Text(Cow<'a, str>),
    /// Blob value (borrowed or owned binary data)
    Blob(Cow<'a, [u8]>),
    /// NULL value
    #[default]
    Null,
}

impl<'a> SQLiteValue<'a> {
    /// Returns true if this value is NULL.
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, SQLiteValue::Null)
    }

    /// Returns the integer value if this is an INTEGER.
    #[inline]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            SQLiteValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value if this is TEXT.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SQLiteValue::Text(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Converts a stored value into JSON.
    ///
    /// Non-finite reals become `null`; blobs are decoded as lossy UTF-8.
    pub fn into_json(self) -> Value {
        match self {
            SQLiteValue::Integer(i) => Value::Number(i.into()),
            SQLiteValue::Real(r) => Number::from_f64(r).map_or(Value::Null, Value::Number),
            SQLiteValue::Text(s) => Value::String(s.into_owned()),
            SQLiteValue::Blob(b) => Value::String(String::from_utf8_lossy(&b).into_owned()),
            SQLiteValue::Null => Value::Null,
        }
    }
}

impl<'a> core::fmt::Display for SQLiteValue<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SQLiteValue::Integer(i) => write!(f, "{i}"),
            SQLiteValue::Real(r) => write!(f, "{r}"),
            SQLiteValue::Text(cow) => f.write_str(cow),
            SQLiteValue::Blob(cow) => f.write_str(&String::from_utf8_lossy(cow)),
            SQLiteValue::Null => Ok(()),
        }
    }
}

impl<'a> From<i64> for SQLiteValue<'a> {
    fn from(value: i64) -> Self {
        SQLiteValue::Integer(value)
    }
}

impl<'a> From<u64> for SQLiteValue<'a> {
    /// Saturates at `i64::MAX`.
    fn from(value: u64) -> Self {
        SQLiteValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl<'a> From<f64> for SQLiteValue<'a> {
    fn from(value: f64) -> Self {
        SQLiteValue::Real(value)
    }
}

impl<'a> From<bool> for SQLiteValue<'a> {
    fn from(value: bool) -> Self {
        SQLiteValue::Integer(i64::from(value))
    }
}

impl<'a> From<&'a str> for SQLiteValue<'a> {
    fn from(value: &'a str) -> Self {
        SQLiteValue::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<String> for SQLiteValue<'a> {
    fn from(value: String) -> Self {
        SQLiteValue::Text(Cow::Owned(value))
    }
}

/// Booleans bind as `0` / `1`, matching how SQLite stores them.
impl<'a> From<&'a FilterValue> for SQLiteValue<'a> {
    fn from(value: &'a FilterValue) -> Self {
        match value {
            FilterValue::Integer(i) => SQLiteValue::Integer(*i),
            FilterValue::Real(r) => SQLiteValue::Real(*r),
            FilterValue::Text(t) => SQLiteValue::Text(Cow::Borrowed(t)),
            FilterValue::Bool(b) => SQLiteValue::from(*b),
        }
    }
}

//------------------------------------------------------------------------------
// rusqlite implementations
//------------------------------------------------------------------------------

#[cfg(feature = "rusqlite")]
impl<'a> rusqlite::ToSql for SQLiteValue<'a> {
    fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
        use rusqlite::types::{ToSqlOutput, Value, ValueRef};

        Ok(match self {
            SQLiteValue::Null => ToSqlOutput::Owned(Value::Null),
            SQLiteValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SQLiteValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SQLiteValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SQLiteValue::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b.as_ref())),
        })
    }
}

#[cfg(feature = "rusqlite")]
impl<'a> rusqlite::types::FromSql for SQLiteValue<'a> {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        use rusqlite::types::ValueRef;

        Ok(match value {
            ValueRef::Null => SQLiteValue::Null,
            ValueRef::Integer(i) => SQLiteValue::Integer(i),
            ValueRef::Real(r) => SQLiteValue::Real(r),
            ValueRef::Text(items) => SQLiteValue::Text(String::from_utf8_lossy(items).into_owned().into()),
            ValueRef::Blob(items) => SQLiteValue::Blob(items.to_vec().into()),
        })
    }
}
