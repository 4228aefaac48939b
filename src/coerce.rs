use crate::{Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use time::{PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

/// Zone used to interpret ambiguous wall-clock temporal values when the
/// caller does not supply one explicitly.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

macro_rules! int_from {
    ($value:expr) => {
        match $value {
            Value::Int8(Some(v)) => Some(*v as i128),
            Value::Int16(Some(v)) => Some(*v as i128),
            Value::Int32(Some(v)) => Some(*v as i128),
            Value::Int64(Some(v)) => Some(*v as i128),
            _ => None,
        }
    };
}

macro_rules! int_into {
    ($source:expr, $target:expr, $wide:expr, $into:path, $native:ty) => {{
        let v = $wide;
        <$native>::try_from(v)
            .map(|v| $into(Some(v)))
            .map_err(|_| Error::coercion($source, $target))
    }};
}

impl Value {
    /// Coerce `self` into the type described by the `target` template.
    ///
    /// The conversion is a pure function of the value, the template and the
    /// supplied zone; it never consults statement state. Integer conversions
    /// are range checked, decimals convert to integers only when integral,
    /// and naive wall-clock timestamps are anchored to `zone` when the
    /// target carries an offset. Anything unsupported is a
    /// [`Error::TypeCoercion`].
    pub fn try_coerce(self, target: &Value, zone: UtcOffset) -> Result<Value> {
        if self.same_type(target) {
            return Ok(self);
        }
        // A typed but absent value converts to an absent value of the
        // target type without inspecting the representation.
        if self.is_null() {
            return Ok(target.clone());
        }
        if let Some(wide) = int_from!(&self) {
            return match target {
                Value::Int8(..) => int_into!(&self, target, wide, Value::Int8, i8),
                Value::Int16(..) => int_into!(&self, target, wide, Value::Int16, i16),
                Value::Int32(..) => int_into!(&self, target, wide, Value::Int32, i32),
                Value::Int64(..) => int_into!(&self, target, wide, Value::Int64, i64),
                Value::Float32(..) => Ok(Value::Float32(Some(wide as f32))),
                Value::Float64(..) => Ok(Value::Float64(Some(wide as f64))),
                Value::Decimal(..) => Decimal::from_i128(wide)
                    .map(|v| Value::Decimal(Some(v)))
                    .ok_or_else(|| Error::coercion(&self, target)),
                Value::Varchar(..) => Ok(Value::Varchar(Some(wide.to_string()))),
                Value::Boolean(..) => Ok(Value::Boolean(Some(wide != 0))),
                _ => Err(Error::coercion(&self, target)),
            };
        }
        match (&self, target) {
            (Value::Float32(Some(v)), Value::Float64(..)) => Ok(Value::Float64(Some(*v as f64))),
            (Value::Float64(Some(v)), Value::Float32(..)) => Ok(Value::Float32(Some(*v as f32))),
            (Value::Float32(Some(v)), Value::Decimal(..)) => Decimal::from_f32(*v)
                .map(|v| Value::Decimal(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Float64(Some(v)), Value::Decimal(..)) => Decimal::from_f64(*v)
                .map(|v| Value::Decimal(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Decimal(Some(v)), Value::Float32(..)) => v
                .to_f32()
                .map(|v| Value::Float32(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Decimal(Some(v)), Value::Float64(..)) => v
                .to_f64()
                .map(|v| Value::Float64(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Decimal(Some(v)), Value::Int16(..)) if v.is_integer() => v
                .to_i16()
                .map(|v| Value::Int16(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Decimal(Some(v)), Value::Int32(..)) if v.is_integer() => v
                .to_i32()
                .map(|v| Value::Int32(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Decimal(Some(v)), Value::Int64(..)) if v.is_integer() => v
                .to_i64()
                .map(|v| Value::Int64(Some(v)))
                .ok_or_else(|| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Uuid(..)) => Uuid::parse_str(v)
                .map(|v| Value::Uuid(Some(v)))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Decimal(..)) => v
                .parse()
                .map(|v| Value::Decimal(Some(v)))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Int32(..)) => v
                .parse()
                .map(|v| Value::Int32(Some(v)))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Int64(..)) => v
                .parse()
                .map(|v| Value::Int64(Some(v)))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Float64(..)) => v
                .parse()
                .map(|v| Value::Float64(Some(v)))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Varchar(Some(v)), Value::Blob(..)) => {
                Ok(Value::Blob(Some(v.as_bytes().into())))
            }
            (Value::Blob(Some(v)), Value::Varchar(..)) => std::str::from_utf8(v)
                .map(|v| Value::Varchar(Some(v.to_owned())))
                .map_err(|_| Error::coercion(&self, target)),
            (Value::Uuid(Some(v)), Value::Varchar(..)) => Ok(Value::Varchar(Some(v.to_string()))),
            (Value::Timestamp(Some(v)), Value::TimestampWithTimezone(..)) => {
                Ok(Value::TimestampWithTimezone(Some(v.assume_offset(zone))))
            }
            (Value::TimestampWithTimezone(Some(v)), Value::Timestamp(..)) => {
                let v = v.to_offset(zone);
                Ok(Value::Timestamp(Some(PrimitiveDateTime::new(
                    v.date(),
                    v.time(),
                ))))
            }
            (Value::Date(Some(v)), Value::Timestamp(..)) => {
                Ok(Value::Timestamp(Some(v.with_time(Time::MIDNIGHT))))
            }
            (Value::Date(Some(v)), Value::TimestampWithTimezone(..)) => Ok(
                Value::TimestampWithTimezone(Some(v.with_time(Time::MIDNIGHT).assume_offset(zone))),
            ),
            (Value::Timestamp(Some(v)), Value::Date(..)) => Ok(Value::Date(Some(v.date()))),
            (Value::Timestamp(Some(v)), Value::Time(..)) => Ok(Value::Time(Some(v.time()))),
            _ => Err(Error::coercion(&self, target)),
        }
    }
}
