//! Field values and the kinds they belong to.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Semantic category of a field's value.
///
/// Type rules are keyed by kind, and the kind decides whether a field
/// accepts a format pattern at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Identifier,
    /// Catch-all for values rendered through their generic string form.
    Other,
}

impl ValueKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValueKind; 7] = [
        ValueKind::Text,
        ValueKind::Integer,
        ValueKind::Decimal,
        ValueKind::Boolean,
        ValueKind::DateTime,
        ValueKind::Identifier,
        ValueKind::Other,
    ];

    /// Returns true if values of this kind can be rendered with a format pattern.
    ///
    /// Only numeric and date/time kinds carry a pattern grammar.
    pub fn supports_pattern(&self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Decimal | ValueKind::DateTime
        )
    }

    /// Returns the canonical lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Boolean => "boolean",
            ValueKind::DateTime => "datetime",
            ValueKind::Identifier => "identifier",
            ValueKind::Other => "other",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    /// Parse a kind name (case-insensitive, common aliases accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "text" | "string" => Ok(ValueKind::Text),
            "integer" | "int" => Ok(ValueKind::Integer),
            "decimal" | "number" => Ok(ValueKind::Decimal),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "datetime" | "date" => Ok(ValueKind::DateTime),
            "identifier" | "uuid" | "guid" => Ok(ValueKind::Identifier),
            "other" => Ok(ValueKind::Other),
            _ => Err(format!("Unknown value kind: {}", s)),
        }
    }
}

impl TryFrom<String> for ValueKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A present field value, tagged with its kind.
///
/// Absence is modelled outside this type as `Option<Value>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Identifier(Uuid),
    /// Value already converted to its generic string form by the record.
    Other(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Identifier(_) => ValueKind::Identifier,
            Value::Other(_) => ValueKind::Other,
        }
    }

    /// Wraps any displayable value as [`Value::Other`].
    pub fn other(value: impl fmt::Display) -> Self {
        Value::Other(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    /// Dates are widened to midnight.
    fn from(value: NaiveDate) -> Self {
        Value::DateTime(value.and_time(chrono::NaiveTime::MIN))
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Identifier(value)
    }
}
