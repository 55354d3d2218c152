use rust_decimal::Decimal;
use std::fmt::{self, Display, Formatter, Write};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed SQL parameter / column value.
///
/// Every variant wraps an `Option` so a typed NULL is representable:
/// `Value::Int32(None)` is a NULL of integer type, which matters to backends
/// that want the declared type of a NULL parameter. `Value::Null` is the
/// untyped NULL written by the null-if-unset normalization.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

macro_rules! every_variant {
    ($self:expr, $v:ident => $some:expr, $null:expr) => {
        match $self {
            Value::Null => $null,
            Value::Boolean($v) => $some,
            Value::Int8($v) => $some,
            Value::Int16($v) => $some,
            Value::Int32($v) => $some,
            Value::Int64($v) => $some,
            Value::UInt8($v) => $some,
            Value::UInt16($v) => $some,
            Value::UInt32($v) => $some,
            Value::UInt64($v) => $some,
            Value::Float32($v) => $some,
            Value::Float64($v) => $some,
            Value::Decimal($v) => $some,
            Value::Varchar($v) => $some,
            Value::Blob($v) => $some,
            Value::Date($v) => $some,
            Value::Time($v) => $some,
            Value::Timestamp($v) => $some,
            Value::TimestampWithTimezone($v) => $some,
            Value::Uuid($v) => $some,
        }
    };
}

impl Value {
    /// True for `Value::Null` and for every typed variant holding `None`.
    pub fn is_null(&self) -> bool {
        every_variant!(self, v => v.is_none(), true)
    }

    /// SQL-ish name of the variant, used in decode error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Boolean(..) => "BOOLEAN",
            Value::Int8(..) => "TINYINT",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::UInt8(..) => "UTINYINT",
            Value::UInt16(..) => "USMALLINT",
            Value::UInt32(..) => "UINTEGER",
            Value::UInt64(..) => "UBIGINT",
            Value::Float32(..) => "FLOAT",
            Value::Float64(..) => "DOUBLE",
            Value::Decimal(..) => "DECIMAL",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::TimestampWithTimezone(..) => "TIMESTAMP WITH TIME ZONE",
            Value::Uuid(..) => "UUID",
        }
    }
}

/// Renders a SQL-literal-like preview of the value. This output is meant for
/// log lines and error messages only, it is never substituted into SQL text.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        macro_rules! write_integer {
            ($value:expr) => {{
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format($value))
            }};
        }
        macro_rules! write_float {
            ($value:expr) => {{
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format($value))
            }};
        }
        match self {
            Value::Boolean(Some(v)) => f.write_str(if *v { "true" } else { "false" }),
            Value::Int8(Some(v)) => write_integer!(*v),
            Value::Int16(Some(v)) => write_integer!(*v),
            Value::Int32(Some(v)) => write_integer!(*v),
            Value::Int64(Some(v)) => write_integer!(*v),
            Value::UInt8(Some(v)) => write_integer!(*v),
            Value::UInt16(Some(v)) => write_integer!(*v),
            Value::UInt32(Some(v)) => write_integer!(*v),
            Value::UInt64(Some(v)) => write_integer!(*v),
            Value::Float32(Some(v)) => write_float!(*v),
            Value::Float64(Some(v)) => write_float!(*v),
            Value::Decimal(Some(v)) => v.fmt(f),
            Value::Varchar(Some(v)) => {
                f.write_char('\'')?;
                let mut first = true;
                for part in v.split('\'') {
                    if !first {
                        f.write_str("''")?;
                    }
                    first = false;
                    f.write_str(part)?;
                }
                f.write_char('\'')
            }
            Value::Blob(Some(v)) => write!(f, "x'{}'", hex::encode(v)),
            Value::Date(Some(v)) => write!(f, "'{}'", v),
            Value::Time(Some(v)) => write!(f, "'{}'", v),
            Value::Timestamp(Some(v)) => write!(f, "'{}'", v),
            Value::TimestampWithTimezone(Some(v)) => write!(f, "'{}'", v),
            Value::Uuid(Some(v)) => write!(f, "'{}'", v),
            _ => f.write_str("NULL"),
        }
    }
}
