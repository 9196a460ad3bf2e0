//! Dynamically typed values used for bindings and result rows.

use crate::error::{OrmError, OrmResult};
use crate::expression::Expression;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::BTreeMap;

/// Column name to value map used as INSERT/UPDATE input.
///
/// Keys are kept sorted, which fixes the column order of the compiled
/// statement and of its bindings.
pub type Record = BTreeMap<String, Value>;

/// A value bound to a placeholder or read back from a result row.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 64-bit integer
    I64(i64),

    /// Unsigned 64-bit integer
    U64(u64),

    /// Double precision float
    F64(f64),

    /// Text value
    String(String),

    /// Binary value
    Bytes(Vec<u8>),

    /// Calendar date
    Date(NaiveDate),

    /// Date and time without zone (UTC by convention)
    DateTime(NaiveDateTime),

    /// JSON document
    Json(serde_json::Value),

    /// Raw SQL rendered verbatim, never bound
    Expression(Expression),

    /// A sequence; flattened element-wise when added to the binding ledger
    List(Vec<Value>),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_expression(&self) -> bool {
        matches!(self, Self::Expression(_))
    }

    /// Build a [`Value::List`] from any sequence of convertible values.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        items.into_iter().collect()
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Whether the value equals the zero value of its type.
    ///
    /// A record whose primary key is blank has not been persisted yet.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(v) => !v,
            Self::I64(v) => *v == 0,
            Self::U64(v) => *v == 0,
            Self::F64(v) => *v == 0.0,
            Self::String(v) => v.is_empty(),
            Self::Bytes(v) => v.is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Json(v) => v.is_null(),
            Self::Date(_) | Self::DateTime(_) | Self::Expression(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Self::Expression(expr) => Some(expr),
            _ => None,
        }
    }

    /// Short type name, used in conversion error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Bool(_) => "bool",
            Self::I64(_) => "i64",
            Self::U64(_) => "u64",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Json(_) => "json",
            Self::Expression(_) => "expression",
            Self::List(_) => "list",
        }
    }

    /// Decode into a Rust type, coercing where the conversion is lossless.
    pub fn decode<T: FromValue>(self) -> OrmResult<T> {
        T::from_value(self)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::I64(v as i64)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::U64(v as u64)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::F64(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.naive_utc())
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(v: uuid::Uuid) -> Self {
        Value::String(v.hyphenated().to_string())
    }
}

impl From<Expression> for Value {
    fn from(v: Expression) -> Self {
        Value::Expression(v)
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

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Types that can be decoded from a [`Value`].
///
/// Implementations coerce between representations where no information is
/// lost (a numeric string into an integer, an integer into a bool). A value
/// that does not fit the target type is a [`OrmError::Conversion`] error.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> OrmResult<Self>;
}

fn mismatch<T>(value: &Value, target: &str) -> OrmResult<T> {
    Err(OrmError::conversion(format!(
        "cannot convert {} value {:?} to {}",
        value.kind(),
        value,
        target
    )))
}

fn utf8(bytes: Vec<u8>, target: &str) -> OrmResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| OrmError::conversion(format!("cannot convert bytes to {target}: {e}")))
}

impl FromValue for Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::U64(v) => Ok(v != 0),
            Value::String(ref s) => match s.as_str() {
                "1" | "true" | "TRUE" => Ok(true),
                "0" | "false" | "FALSE" => Ok(false),
                _ => mismatch(&value, "bool"),
            },
            Value::Bytes(bytes) => bool::from_value(Value::String(utf8(bytes, "bool")?)),
            other => mismatch(&other, "bool"),
        }
    }
}

macro_rules! impl_from_value_int {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> OrmResult<Self> {
                    let target = stringify!($ty);
                    match value {
                        Value::I64(v) => <$ty>::try_from(v).map_err(|_| {
                            OrmError::conversion(format!("{v} is out of range for {target}"))
                        }),
                        Value::U64(v) => <$ty>::try_from(v).map_err(|_| {
                            OrmError::conversion(format!("{v} is out of range for {target}"))
                        }),
                        Value::Bool(v) => Ok(<$ty>::from(v)),
                        Value::F64(v) if v.fract() == 0.0 && v.is_finite() => {
                            <$ty>::from_value(Value::String(format!("{v:.0}")))
                        }
                        Value::String(ref s) => match s.trim().parse::<$ty>() {
                            Ok(v) => Ok(v),
                            Err(_) => mismatch(&value, target),
                        },
                        Value::Bytes(bytes) => <$ty>::from_value(Value::String(utf8(bytes, target)?)),
                        other => mismatch(&other, target),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            Value::U64(v) => Ok(v as f64),
            Value::String(ref s) => match s.trim().parse::<f64>() {
                Ok(v) => Ok(v),
                Err(_) => mismatch(&value, "f64"),
            },
            Value::Bytes(bytes) => f64::from_value(Value::String(utf8(bytes, "f64")?)),
            other => mismatch(&other, "f64"),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> OrmResult<Self> {
        let v = f64::from_value(value)?;
        if v.is_finite() && v.abs() > f32::MAX as f64 {
            return Err(OrmError::conversion(format!("{v} is out of range for f32")));
        }
        Ok(v as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Bytes(bytes) => utf8(bytes, "String"),
            Value::I64(v) => Ok(v.to_string()),
            Value::U64(v) => Ok(v.to_string()),
            Value::F64(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Date(v) => Ok(v.format("%Y-%m-%d").to_string()),
            Value::DateTime(v) => Ok(v.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
            Value::Json(v) => Ok(v.to_string()),
            other => mismatch(&other, "String"),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            other => mismatch(&other, "Vec<u8>"),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::DateTime(v) => Ok(v),
            Value::Date(v) => Ok(v.and_time(NaiveTime::MIN)),
            Value::String(ref s) => match parse_datetime(s) {
                Some(v) => Ok(v),
                None => mismatch(&value, "NaiveDateTime"),
            },
            Value::Bytes(bytes) => {
                NaiveDateTime::from_value(Value::String(utf8(bytes, "NaiveDateTime")?))
            }
            other => mismatch(&other, "NaiveDateTime"),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Date(v) => Ok(v),
            Value::DateTime(v) => Ok(v.date()),
            Value::String(ref s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
                Ok(v) => Ok(v),
                Err(_) => match parse_datetime(s) {
                    Some(v) => Ok(v.date()),
                    None => mismatch(&value, "NaiveDate"),
                },
            },
            Value::Bytes(bytes) => NaiveDate::from_value(Value::String(utf8(bytes, "NaiveDate")?)),
            other => mismatch(&other, "NaiveDate"),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> OrmResult<Self> {
        NaiveDateTime::from_value(value).map(|v| v.and_utc())
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::Json(v) => Ok(v),
            Value::String(s) => Ok(serde_json::from_str(&s)?),
            Value::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(v) => Ok(v.into()),
            Value::I64(v) => Ok(v.into()),
            Value::U64(v) => Ok(v.into()),
            other => mismatch(&other, "serde_json::Value"),
        }
    }
}

impl FromValue for uuid::Uuid {
    fn from_value(value: Value) -> OrmResult<Self> {
        match value {
            Value::String(ref s) => match uuid::Uuid::parse_str(s.trim()) {
                Ok(v) => Ok(v),
                Err(_) => mismatch(&value, "Uuid"),
            },
            Value::Bytes(ref bytes) if bytes.len() == 16 => uuid::Uuid::from_slice(bytes)
                .map_err(|e| OrmError::conversion(format!("invalid uuid bytes: {e}"))),
            Value::Bytes(bytes) => uuid::Uuid::from_value(Value::String(utf8(bytes, "Uuid")?)),
            other => mismatch(&other, "Uuid"),
        }
    }
}
