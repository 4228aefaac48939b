use rust_decimal::Decimal;
use std::fmt::{self, Display};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed value moved between callers and the wire protocol.
///
/// Each variant wraps an `Option` of its native representation, so the same
/// enum serves two roles: the `None` form is a *type template* describing a
/// declared parameter or result column, the `Some` form is a bound value.
/// The declared parameter types of a prepared statement are a fixed slice of
/// empty templates against which every bound value is coerced.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
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

impl Value {
    /// Whether the two values are of the same declared type, regardless of
    /// the presence or content of the inner value.
    pub fn same_type(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    /// True for `Null` and for any typed variant holding no value.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(..) => "Boolean",
            Value::Int8(..) => "Int8",
            Value::Int16(..) => "Int16",
            Value::Int32(..) => "Int32",
            Value::Int64(..) => "Int64",
            Value::Float32(..) => "Float32",
            Value::Float64(..) => "Float64",
            Value::Decimal(..) => "Decimal",
            Value::Varchar(..) => "Varchar",
            Value::Blob(..) => "Blob",
            Value::Date(..) => "Date",
            Value::Time(..) => "Time",
            Value::Timestamp(..) => "Timestamp",
            Value::TimestampWithTimezone(..) => "TimestampWithTimezone",
            Value::Uuid(..) => "Uuid",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! write_inner {
            ($v:expr) => {
                match $v {
                    Some(v) => write!(f, "{}", v),
                    None => write!(f, "NULL"),
                }
            };
        }
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(v) => write_inner!(v),
            Value::Int8(v) => write_inner!(v),
            Value::Int16(v) => write_inner!(v),
            Value::Int32(v) => write_inner!(v),
            Value::Int64(v) => write_inner!(v),
            Value::Float32(v) => write_inner!(v),
            Value::Float64(v) => write_inner!(v),
            Value::Decimal(v) => write_inner!(v),
            Value::Varchar(v) => write_inner!(v),
            Value::Blob(v) => match v {
                Some(v) => write!(f, "<{} bytes>", v.len()),
                None => write!(f, "NULL"),
            },
            Value::Date(v) => write_inner!(v),
            Value::Time(v) => write_inner!(v),
            Value::Timestamp(v) => write_inner!(v),
            Value::TimestampWithTimezone(v) => write_inner!(v),
            Value::Uuid(v) => write_inner!(v),
        }
    }
}

macro_rules! impl_from {
    ($source:ty, $variant:path) => {
        impl From<$source> for Value {
            fn from(value: $source) -> Self {
                $variant(Some(value.into()))
            }
        }
    };
}

impl_from!(bool, Value::Boolean);
impl_from!(i8, Value::Int8);
impl_from!(i16, Value::Int16);
impl_from!(i32, Value::Int32);
impl_from!(i64, Value::Int64);
impl_from!(f32, Value::Float32);
impl_from!(f64, Value::Float64);
impl_from!(Decimal, Value::Decimal);
impl_from!(String, Value::Varchar);
impl_from!(&str, Value::Varchar);
impl_from!(Box<[u8]>, Value::Blob);
impl_from!(Vec<u8>, Value::Blob);
impl_from!(&[u8], Value::Blob);
impl_from!(Date, Value::Date);
impl_from!(Time, Value::Time);
impl_from!(PrimitiveDateTime, Value::Timestamp);
impl_from!(OffsetDateTime, Value::TimestampWithTimezone);
impl_from!(Uuid, Value::Uuid);

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
