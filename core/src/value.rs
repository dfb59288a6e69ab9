//! Scalar values produced by a row source and their coercion into
//! destination fields.
//!
//! A [`RowSource`](crate::source::RowSource) decodes every column into a
//! [`Value`]. The assembler then hands each value to the destination field's
//! [`FromValue`] impl, which dispatches on the source kind:
//!
//! | Destination          | Accepted source kinds                             |
//! |----------------------|---------------------------------------------------|
//! | integers             | INTEGER (range checked), integral REAL            |
//! | `f32` / `f64`        | INTEGER, REAL (`f32` range checked)               |
//! | `bool`               | BOOLEAN, INTEGER (non-zero is `true`)             |
//! | `String`             | TEXT, UTF-8 BLOB                                  |
//! | `Vec<u8>`            | BLOB, TEXT                                        |
//! | chrono types         | TEXT (parsed per kind), INTEGER unix seconds      |
//! | `uuid::Uuid`         | TEXT, 16 byte BLOB                                |
//!
//! NULL becomes `None` for `Option<T>` and the zero value otherwise.

use core::fmt;

use compact_str::CompactString;

use crate::error::CoercionError;

/// A single decoded column value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// Integer value (i64)
    Integer(i64),
    /// Real value (f64)
    Real(f64),
    /// Text value
    Text(String),
    /// Blob value
    Blob(Vec<u8>),
    /// Boolean value, for drivers with a native boolean type
    Bool(bool),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL name of the value's storage class, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
            Value::Bool(_) => "BOOLEAN",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Blob(b) => write!(f, "<{} bytes>", b.len()),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

macro_rules! impl_from_int_for_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::Integer(value as i64)
                }
            }
        )*
    };
}

impl_from_int_for_value!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Blob(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Blob(value.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Declared kind of a scalar destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Text,
    Bytes,
    Date,
    Time,
    DateTime,
    DateTimeUtc,
    Uuid,
    /// A user type implementing [`FromValue`] directly.
    Custom(&'static str),
}

impl ScalarKind {
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ScalarKind::Date | ScalarKind::Time | ScalarKind::DateTime | ScalarKind::DateTimeUtc
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int8 => "i8",
            ScalarKind::Int16 => "i16",
            ScalarKind::Int32 => "i32",
            ScalarKind::Int64 => "i64",
            ScalarKind::UInt8 => "u8",
            ScalarKind::UInt16 => "u16",
            ScalarKind::UInt32 => "u32",
            ScalarKind::UInt64 => "u64",
            ScalarKind::Float32 => "f32",
            ScalarKind::Float64 => "f64",
            ScalarKind::Text => "text",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Date => "date",
            ScalarKind::Time => "time",
            ScalarKind::DateTime => "datetime",
            ScalarKind::DateTimeUtc => "datetime (UTC)",
            ScalarKind::Uuid => "uuid",
            ScalarKind::Custom(name) => name,
        };
        f.write_str(name)
    }
}

/// Conversion from a decoded [`Value`] into a destination scalar.
///
/// Each `from_*` method handles one source kind; the defaults reject the
/// kind with [`CoercionError::Mismatch`]. `from_null` is required so that
/// every scalar decides its own zero value.
pub trait FromValue: Sized {
    /// Declared kind, recorded in the destination descriptor.
    const KIND: ScalarKind;

    /// Whether NULL maps to an explicit "unset" representation.
    const NULLABLE: bool = false;

    fn from_null() -> Result<Self, CoercionError>;

    fn from_integer(_value: i64) -> Result<Self, CoercionError> {
        Err(CoercionError::mismatch(Self::KIND, "INTEGER"))
    }

    fn from_real(_value: f64) -> Result<Self, CoercionError> {
        Err(CoercionError::mismatch(Self::KIND, "REAL"))
    }

    fn from_text(_value: String) -> Result<Self, CoercionError> {
        Err(CoercionError::mismatch(Self::KIND, "TEXT"))
    }

    fn from_blob(_value: Vec<u8>) -> Result<Self, CoercionError> {
        Err(CoercionError::mismatch(Self::KIND, "BLOB"))
    }

    fn from_bool(_value: bool) -> Result<Self, CoercionError> {
        Err(CoercionError::mismatch(Self::KIND, "BOOLEAN"))
    }

    fn from_value(value: Value) -> Result<Self, CoercionError> {
        match value {
            Value::Null => Self::from_null(),
            Value::Integer(i) => Self::from_integer(i),
            Value::Real(r) => Self::from_real(r),
            Value::Text(s) => Self::from_text(s),
            Value::Blob(b) => Self::from_blob(b),
            Value::Bool(b) => Self::from_bool(b),
        }
    }
}

fn checked_real_to_int<T>(value: f64, kind: ScalarKind) -> Result<T, CoercionError>
where
    T: TryFrom<i128>,
{
    if !value.is_finite() || value % 1.0 != 0.0 {
        return Err(CoercionError::parse(
            kind,
            &value.to_string(),
            "not an integral REAL",
        ));
    }

    if value < i128::MIN as f64 || value > i128::MAX as f64 {
        return Err(CoercionError::overflow(kind, "REAL", value));
    }

    (value as i128)
        .try_into()
        .map_err(|_| CoercionError::overflow(kind, "REAL", value))
}

macro_rules! impl_from_value_int {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                const KIND: ScalarKind = ScalarKind::$kind;

                fn from_null() -> Result<Self, CoercionError> {
                    Ok(0)
                }

                fn from_integer(value: i64) -> Result<Self, CoercionError> {
                    value
                        .try_into()
                        .map_err(|_| CoercionError::overflow(Self::KIND, "INTEGER", value))
                }

                fn from_real(value: f64) -> Result<Self, CoercionError> {
                    checked_real_to_int(value, Self::KIND)
                }
            }
        )+
    };
}

impl_from_value_int!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    usize => UInt64,
);

impl FromValue for f64 {
    const KIND: ScalarKind = ScalarKind::Float64;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(0.0)
    }

    fn from_integer(value: i64) -> Result<Self, CoercionError> {
        Ok(value as f64)
    }

    fn from_real(value: f64) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl FromValue for f32 {
    const KIND: ScalarKind = ScalarKind::Float32;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(0.0)
    }

    fn from_integer(value: i64) -> Result<Self, CoercionError> {
        Ok(value as f32)
    }

    fn from_real(value: f64) -> Result<Self, CoercionError> {
        if value.is_finite() && value.abs() > f32::MAX as f64 {
            return Err(CoercionError::overflow(Self::KIND, "REAL", value));
        }
        Ok(value as f32)
    }
}

impl FromValue for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(false)
    }

    fn from_integer(value: i64) -> Result<Self, CoercionError> {
        Ok(value != 0)
    }

    fn from_bool(value: bool) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

impl FromValue for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(String::new())
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        Ok(value)
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        String::from_utf8(value).map_err(|e| {
            CoercionError::parse(Self::KIND, "<BLOB>", format!("invalid UTF-8: {e}"))
        })
    }
}

impl FromValue for CompactString {
    const KIND: ScalarKind = ScalarKind::Text;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(CompactString::default())
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        Ok(CompactString::from(value))
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        String::from_blob(value).map(CompactString::from)
    }
}

impl FromValue for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Bytes;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(Vec::new())
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        Ok(value.into_bytes())
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        Ok(value)
    }
}

/// Keeps the decoded value untouched.
impl FromValue for Value {
    const KIND: ScalarKind = ScalarKind::Custom("value");
    const NULLABLE: bool = true;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(Value::Null)
    }

    fn from_integer(value: i64) -> Result<Self, CoercionError> {
        Ok(Value::Integer(value))
    }

    fn from_real(value: f64) -> Result<Self, CoercionError> {
        Ok(Value::Real(value))
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        Ok(Value::Text(value))
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        Ok(Value::Blob(value))
    }

    fn from_bool(value: bool) -> Result<Self, CoercionError> {
        Ok(Value::Bool(value))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    const KIND: ScalarKind = T::KIND;
    const NULLABLE: bool = true;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(None)
    }

    fn from_integer(value: i64) -> Result<Self, CoercionError> {
        T::from_integer(value).map(Some)
    }

    fn from_real(value: f64) -> Result<Self, CoercionError> {
        T::from_real(value).map(Some)
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        T::from_text(value).map(Some)
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        T::from_blob(value).map(Some)
    }

    fn from_bool(value: bool) -> Result<Self, CoercionError> {
        T::from_bool(value).map(Some)
    }
}

#[cfg(feature = "chrono")]
mod temporal {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    use super::{FromValue, ScalarKind};
    use crate::error::CoercionError;

    const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    fn parse_naive_datetime(value: &str, kind: ScalarKind) -> Result<NaiveDateTime, CoercionError> {
        let mut last_error = None;
        for format in DATETIME_FORMATS {
            match NaiveDateTime::parse_from_str(value, format) {
                Ok(parsed) => return Ok(parsed),
                Err(e) => last_error = Some(e),
            }
        }
        // Bare dates are midnight
        if let Ok(date) = value.parse::<NaiveDate>() {
            return Ok(date.and_time(NaiveTime::MIN));
        }
        Err(CoercionError::parse(
            kind,
            value,
            last_error.map_or_else(String::new, |e| e.to_string()),
        ))
    }

    fn from_unix_seconds(value: i64, kind: ScalarKind) -> Result<DateTime<Utc>, CoercionError> {
        DateTime::from_timestamp(value, 0)
            .ok_or_else(|| CoercionError::overflow(kind, "INTEGER", value))
    }

    impl FromValue for NaiveDate {
        const KIND: ScalarKind = ScalarKind::Date;

        fn from_null() -> Result<Self, CoercionError> {
            Ok(NaiveDate::default())
        }

        fn from_text(value: String) -> Result<Self, CoercionError> {
            value
                .parse()
                .map_err(|e: chrono::ParseError| CoercionError::parse(Self::KIND, &value, e))
        }
    }

    impl FromValue for NaiveTime {
        const KIND: ScalarKind = ScalarKind::Time;

        fn from_null() -> Result<Self, CoercionError> {
            Ok(NaiveTime::MIN)
        }

        fn from_text(value: String) -> Result<Self, CoercionError> {
            value
                .parse()
                .map_err(|e: chrono::ParseError| CoercionError::parse(Self::KIND, &value, e))
        }
    }

    impl FromValue for NaiveDateTime {
        const KIND: ScalarKind = ScalarKind::DateTime;

        fn from_null() -> Result<Self, CoercionError> {
            Ok(NaiveDateTime::default())
        }

        fn from_integer(value: i64) -> Result<Self, CoercionError> {
            from_unix_seconds(value, Self::KIND).map(|dt| dt.naive_utc())
        }

        fn from_text(value: String) -> Result<Self, CoercionError> {
            parse_naive_datetime(&value, Self::KIND)
        }
    }

    impl FromValue for DateTime<Utc> {
        const KIND: ScalarKind = ScalarKind::DateTimeUtc;

        fn from_null() -> Result<Self, CoercionError> {
            Ok(DateTime::<Utc>::default())
        }

        fn from_integer(value: i64) -> Result<Self, CoercionError> {
            from_unix_seconds(value, Self::KIND)
        }

        fn from_text(value: String) -> Result<Self, CoercionError> {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(&value) {
                return Ok(parsed.with_timezone(&Utc));
            }
            // Naive text is assumed to be UTC, as SQLite's CURRENT_TIMESTAMP is
            parse_naive_datetime(&value, Self::KIND).map(|ndt| ndt.and_utc())
        }
    }
}

#[cfg(feature = "uuid")]
impl FromValue for uuid::Uuid {
    const KIND: ScalarKind = ScalarKind::Uuid;

    fn from_null() -> Result<Self, CoercionError> {
        Ok(uuid::Uuid::nil())
    }

    fn from_text(value: String) -> Result<Self, CoercionError> {
        uuid::Uuid::parse_str(&value).map_err(|e| CoercionError::parse(Self::KIND, &value, e))
    }

    fn from_blob(value: Vec<u8>) -> Result<Self, CoercionError> {
        uuid::Uuid::from_slice(&value)
            .map_err(|e| CoercionError::parse(Self::KIND, "<BLOB>", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_narrow_with_overflow_check() {
        assert_eq!(i32::from_value(Value::Integer(42)), Ok(42));
        assert_eq!(
            i8::from_value(Value::Integer(300)),
            Err(CoercionError::Overflow {
                kind: ScalarKind::Int8,
                found: "INTEGER",
                value: "300".into(),
            })
        );
        assert!(u32::from_value(Value::Integer(-1)).is_err());
        assert_eq!(u64::from_value(Value::Integer(i64::MAX)), Ok(i64::MAX as u64));
    }

    #[test]
    fn integral_reals_become_integers() {
        assert_eq!(i64::from_value(Value::Real(7.0)), Ok(7));
        assert!(matches!(
            i64::from_value(Value::Real(7.5)),
            Err(CoercionError::Parse { .. })
        ));
        assert!(matches!(
            i16::from_value(Value::Real(1e9)),
            Err(CoercionError::Overflow { .. })
        ));
    }

    #[test]
    fn floats_widen_and_narrow() {
        assert_eq!(f64::from_value(Value::Integer(3)), Ok(3.0));
        assert_eq!(f32::from_value(Value::Real(1.5)), Ok(1.5));
        assert!(matches!(
            f32::from_value(Value::Real(f64::MAX)),
            Err(CoercionError::Overflow { .. })
        ));
    }

    #[test]
    fn null_maps_to_zero_or_none() {
        assert_eq!(i32::from_value(Value::Null), Ok(0));
        assert_eq!(String::from_value(Value::Null), Ok(String::new()));
        assert_eq!(bool::from_value(Value::Null), Ok(false));
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::Integer(5)), Ok(Some(5)));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        assert_eq!(
            i32::from_value(Value::Text("12".into())),
            Err(CoercionError::Mismatch {
                kind: ScalarKind::Int32,
                found: "TEXT",
            })
        );
        assert!(String::from_value(Value::Integer(1)).is_err());
        assert!(bool::from_value(Value::Real(1.0)).is_err());
    }

    #[test]
    fn text_and_bytes_pass_through() {
        assert_eq!(String::from_value(Value::Text("abc".into())), Ok("abc".into()));
        assert_eq!(Vec::<u8>::from_value(Value::Blob(vec![1, 2])), Ok(vec![1, 2]));
        assert_eq!(
            String::from_value(Value::Blob(b"hi".to_vec())),
            Ok("hi".to_owned())
        );
        assert!(String::from_value(Value::Blob(vec![0xff, 0xfe])).is_err());
    }

    #[test]
    fn booleans_from_integers() {
        assert_eq!(bool::from_value(Value::Integer(0)), Ok(false));
        assert_eq!(bool::from_value(Value::Integer(2)), Ok(true));
        assert_eq!(bool::from_value(Value::Bool(true)), Ok(true));
    }

    #[test]
    fn option_declares_nullable_kind() {
        assert!(<Option<i64> as FromValue>::NULLABLE);
        assert!(!<i64 as FromValue>::NULLABLE);
        assert_eq!(<Option<i64> as FromValue>::KIND, ScalarKind::Int64);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn temporal_text_is_parsed_per_kind() {
        use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

        let date = NaiveDate::from_value(Value::Text("2024-02-29".into())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let time = NaiveTime::from_value(Value::Text("13:45:10".into())).unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(13, 45, 10).unwrap());

        let datetime = NaiveDateTime::from_value(Value::Text("2024-02-29 13:45:10".into())).unwrap();
        assert_eq!(datetime, date.and_time(time));

        let utc = chrono::DateTime::<Utc>::from_value(Value::Text("2024-02-29T13:45:10+02:00".into()))
            .unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 2, 29, 11, 45, 10).unwrap());

        let epoch = chrono::DateTime::<Utc>::from_value(Value::Integer(0)).unwrap();
        assert_eq!(epoch, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());

        assert!(NaiveDate::from_value(Value::Text("not a date".into())).is_err());
    }
}
