use crate::{Error, Result, Value};
use rust_decimal::Decimal;
use std::{any, borrow::Cow, rc::Rc, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// representation that backs query parameters and row decoding.
///
/// This trait is the whole typed convenience surface: binding any supported
/// type goes through `as_value` and reading a column back goes through
/// `try_from_value`. Two rules apply uniformly:
/// - `Option<T>` forwards, with `None` becoming the typed NULL of `T`
///   (`as_empty_value`), so "null passed in" means "SQL NULL written".
/// - Decoding a NULL into a non-`Option` type is an invalid-argument error.
pub trait AsValue {
    /// The typed NULL for this type, e.g. `Value::Int32(None)` for `i32`.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`. Numeric decodes
    /// accept any integer variant and are range checked.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn decode_mismatch<T>(value: &Value) -> Error {
    if value.is_null() {
        Error::invalid_argument(format!(
            "cannot decode SQL NULL into {}",
            any::type_name::<T>()
        ))
    } else {
        Error::invalid_argument(format!(
            "cannot decode {} into {}",
            value.type_name(),
            any::type_name::<T>()
        ))
    }
}

fn integer_of(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Int8(Some(v)) => *v as i128,
        Value::Int16(Some(v)) => *v as i128,
        Value::Int32(Some(v)) => *v as i128,
        Value::Int64(Some(v)) => *v as i128,
        Value::UInt8(Some(v)) => *v as i128,
        Value::UInt16(Some(v)) => *v as i128,
        Value::UInt32(Some(v)) => *v as i128,
        Value::UInt64(Some(v)) => *v as i128,
        _ => return None,
    })
}

macro_rules! impl_as_value_integer {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let Some(wide) = integer_of(&value) else {
                    return Err(decode_mismatch::<Self>(&value));
                };
                <$source>::try_from(wide).map_err(|_| {
                    Error::invalid_argument(format!(
                        "value {} is out of range for {}",
                        wide,
                        any::type_name::<$source>()
                    ))
                })
            }
        }
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

macro_rules! impl_as_value {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(Some(v)) => Ok(v.into()),
                    other => Err(decode_mismatch::<Self>(&other)),
                }
            }
        }
    };
}

impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(PrimitiveDateTime, Value::Timestamp);
impl_as_value!(OffsetDateTime, Value::TimestampWithTimezone);
impl_as_value!(Uuid, Value::Uuid);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Value::Boolean(Some(v)) = value {
            return Ok(v);
        }
        match integer_of(&value) {
            Some(v) => Ok(v != 0),
            None => Err(decode_mismatch::<Self>(&value)),
        }
    }
}

impl AsValue for f64 {
    fn as_empty_value() -> Value {
        Value::Float64(None)
    }
    fn as_value(self) -> Value {
        Value::Float64(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float64(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => Ok(v as f64),
            other => Err(decode_mismatch::<Self>(&other)),
        }
    }
}

impl AsValue for f32 {
    fn as_empty_value() -> Value {
        Value::Float32(None)
    }
    fn as_value(self) -> Value {
        Value::Float32(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float32(Some(v)) => Ok(v),
            Value::Float64(Some(v)) => {
                let narrowed = v as f32;
                if narrowed.is_infinite() && v.is_finite() {
                    Err(Error::invalid_argument(format!(
                        "value {} is out of range for f32",
                        v
                    )))
                } else {
                    Ok(narrowed)
                }
            }
            other => Err(decode_mismatch::<Self>(&other)),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Value::Decimal(Some(v)) = value {
            return Ok(v);
        }
        let Some(wide) = integer_of(&value) else {
            return Err(decode_mismatch::<Self>(&value));
        };
        Decimal::try_from(wide).map_err(|_| {
            Error::invalid_argument(format!("value {} is out of range for a DECIMAL", wide))
        })
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            other => Err(decode_mismatch::<Self>(&other)),
        }
    }
}

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_owned()))
    }
    fn try_from_value(_value: Value) -> Result<Self> {
        Err(Error::invalid_argument(
            "cannot decode into a borrowed &str, decode into String instead",
        ))
    }
}

impl AsValue for &[u8] {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into()))
    }
    fn try_from_value(_value: Value) -> Result<Self> {
        Err(Error::invalid_argument(
            "cannot decode into a borrowed &[u8], decode into Vec<u8> instead",
        ))
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        T::try_from_value(value).map(Box::new)
    }
}

macro_rules! impl_as_value_shared {
    ($wrapper:ident) => {
        impl<T: AsValue + Clone> AsValue for $wrapper<T> {
            fn as_empty_value() -> Value {
                T::as_empty_value()
            }
            fn as_value(self) -> Value {
                $wrapper::try_unwrap(self)
                    .unwrap_or_else(|shared| (*shared).clone())
                    .as_value()
            }
            fn try_from_value(value: Value) -> Result<Self> {
                T::try_from_value(value).map($wrapper::new)
            }
        }
    };
}
impl_as_value_shared!(Rc);
impl_as_value_shared!(Arc);

impl AsValue for Cow<'_, str> {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.into_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        String::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Cow<'_, [u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_owned().into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Vec::<u8>::try_from_value(value).map(Cow::Owned)
    }
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}
