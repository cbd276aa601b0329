//! Parameters and row objects exchanged with a store

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

use crate::error::DomainError;

/// A plain row object, column name to JSON value.
pub type Row = Map<String, JsonValue>;

/// A typed, nullable statement parameter.
///
/// The type travels with `None` as well so that a null is bound with the
/// column's type rather than an untyped placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    BigInt(Option<i64>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
    Time(Option<NaiveTime>),
    Timestamp(Option<DateTime<Utc>>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        match self {
            SqlValue::BigInt(v) => v.is_none(),
            SqlValue::Text(v) => v.is_none(),
            SqlValue::Date(v) => v.is_none(),
            SqlValue::Time(v) => v.is_none(),
            SqlValue::Timestamp(v) => v.is_none(),
        }
    }

    /// Value of an amount column: null becomes `0`, anything other than an integer is rejected.
    pub fn or_zero(self, column: &str) -> Result<Self, DomainError> {
        match self {
            SqlValue::BigInt(Some(v)) => Ok(SqlValue::BigInt(Some(v))),
            value if value.is_null() => Ok(SqlValue::BigInt(Some(0))),
            _ => Err(DomainError::ValidationError(format!("{} must be an integer amount", column))),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            SqlValue::BigInt(Some(v)) => JsonValue::from(*v),
            SqlValue::Text(Some(v)) => JsonValue::String(v.clone()),
            SqlValue::Date(Some(v)) => JsonValue::String(v.to_string()),
            SqlValue::Time(Some(v)) => JsonValue::String(v.to_string()),
            SqlValue::Timestamp(Some(v)) => JsonValue::String(v.to_rfc3339()),
            _ => JsonValue::Null,
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::BigInt(Some(v))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(v: Option<i64>) -> Self {
        SqlValue::BigInt(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        SqlValue::Text(v)
    }
}

impl From<Option<NaiveDate>> for SqlValue {
    fn from(v: Option<NaiveDate>) -> Self {
        SqlValue::Date(v)
    }
}

impl From<Option<NaiveTime>> for SqlValue {
    fn from(v: Option<NaiveTime>) -> Self {
        SqlValue::Time(v)
    }
}

impl From<Option<DateTime<Utc>>> for SqlValue {
    fn from(v: Option<DateTime<Utc>>) -> Self {
        SqlValue::Timestamp(v)
    }
}

/// One column assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub column: &'static str,
    pub value: SqlValue,
}

impl Field {
    pub fn new(column: &'static str, value: impl Into<SqlValue>) -> Self {
        Self { column, value: value.into() }
    }

    /// Text field where an empty or blank string is stored as null.
    pub fn text_or_null(column: &'static str, value: Option<&str>) -> Self {
        let value = value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        Self::new(column, value)
    }
}

/// The complete replacement set of one child table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRows {
    pub child: &'static str,
    pub rows: Vec<Vec<Field>>,
}

impl ChildRows {
    pub fn new(child: &'static str, rows: Vec<Vec<Field>>) -> Self {
        Self { child, rows }
    }
}

/// A parent row with its child rows grouped by child set name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateRecord {
    pub parent: Row,
    pub children: BTreeMap<&'static str, Vec<Row>>,
}

impl AggregateRecord {
    pub fn decode_parent<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        Ok(serde_json::from_value(JsonValue::Object(self.parent.clone()))?)
    }

    /// Decode one child set; an absent set decodes as empty.
    pub fn decode_children<T: DeserializeOwned>(&self, child: &str) -> Result<Vec<T>, DomainError> {
        self.children
            .get(child)
            .map(|rows| {
                rows.iter()
                    .map(|row| serde_json::from_value(JsonValue::Object(row.clone())).map_err(DomainError::from))
                    .collect()
            })
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Decode a single row object into an entity.
pub fn decode_row<T: DeserializeOwned>(row: Row) -> Result<T, DomainError> {
    Ok(serde_json::from_value(JsonValue::Object(row))?)
}

pub(crate) fn row_i64(row: &Row, column: &str) -> Option<i64> {
    row.get(column).and_then(JsonValue::as_i64)
}
