//! Field values and their SQL representation
//!
//! Scalars map to SQLite `TEXT`/`INTEGER`. Sequence fields are stored as JSON
//! arrays in `TEXT` columns and decoded back using the field's [`FieldKind`].

use crate::paper::FieldKind;
use crate::{Error, Result};
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

/// A single field value, independent of which field holds it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Text(String),
    TextList(Vec<String>),
    NestedTextList(Vec<Vec<String>>),
    IntegerList(Vec<i64>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Decode a raw column value as a value of `kind`.
    ///
    /// `field` only names the field in the error.
    pub fn from_sql(field: &str, kind: FieldKind, raw: ValueRef<'_>) -> Result<Self> {
        let mismatch = || Error::FieldType {
            field: field.to_string(),
            expected: kind,
        };

        match (kind, raw) {
            (_, ValueRef::Null) => Ok(FieldValue::Null),
            (FieldKind::Integer, ValueRef::Integer(i)) => Ok(FieldValue::Integer(i)),
            (FieldKind::Text, ValueRef::Text(bytes)) => std::str::from_utf8(bytes)
                .map(|s| FieldValue::Text(s.to_string()))
                .map_err(|_| mismatch()),
            (FieldKind::TextList, ValueRef::Text(bytes)) => {
                Ok(FieldValue::TextList(serde_json::from_slice(bytes)?))
            }
            (FieldKind::NestedTextList, ValueRef::Text(bytes)) => {
                Ok(FieldValue::NestedTextList(serde_json::from_slice(bytes)?))
            }
            (FieldKind::IntegerList, ValueRef::Text(bytes)) => {
                Ok(FieldValue::IntegerList(serde_json::from_slice(bytes)?))
            }
            _ => Err(mismatch()),
        }
    }

    pub fn into_text(self, field: &str) -> Result<Option<String>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(s) => Ok(Some(s)),
            _ => Err(type_error(field, FieldKind::Text)),
        }
    }

    pub fn into_integer(self, field: &str) -> Result<Option<i64>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Integer(i) => Ok(Some(i)),
            _ => Err(type_error(field, FieldKind::Integer)),
        }
    }

    pub fn into_text_list(self, field: &str) -> Result<Option<Vec<String>>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::TextList(list) => Ok(Some(list)),
            _ => Err(type_error(field, FieldKind::TextList)),
        }
    }

    pub fn into_nested_text_list(self, field: &str) -> Result<Option<Vec<Vec<String>>>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::NestedTextList(list) => Ok(Some(list)),
            _ => Err(type_error(field, FieldKind::NestedTextList)),
        }
    }

    pub fn into_integer_list(self, field: &str) -> Result<Option<Vec<i64>>> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::IntegerList(list) => Ok(Some(list)),
            _ => Err(type_error(field, FieldKind::IntegerList)),
        }
    }
}

fn type_error(field: &str, expected: FieldKind) -> Error {
    Error::FieldType {
        field: field.to_string(),
        expected,
    }
}

fn json_text<T: serde::Serialize>(value: &T) -> rusqlite::Result<ToSqlOutput<'static>> {
    let json = serde_json::to_string(value)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
    Ok(ToSqlOutput::Owned(Value::Text(json)))
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FieldValue::Null => Ok(ToSqlOutput::Owned(Value::Null)),
            FieldValue::Integer(i) => Ok(ToSqlOutput::Owned(Value::Integer(*i))),
            FieldValue::Text(s) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
            FieldValue::TextList(list) => json_text(list),
            FieldValue::NestedTextList(list) => json_text(list),
            FieldValue::IntegerList(list) => json_text(list),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Integer)
    }
}

impl From<Option<Vec<String>>> for FieldValue {
    fn from(value: Option<Vec<String>>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::TextList)
    }
}

impl From<Option<Vec<Vec<String>>>> for FieldValue {
    fn from(value: Option<Vec<Vec<String>>>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::NestedTextList)
    }
}

impl From<Option<Vec<i64>>> for FieldValue {
    fn from(value: Option<Vec<i64>>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::IntegerList)
    }
}
