use crate::{Context, Error, Result, Value, truncate_long};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::{any, borrow::Cow, str::FromStr};
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between Rust types and [`Value`].
///
/// Reading back is lenient: drivers return integers wider than the field,
/// decimals as text or text as bytes, and every conversion that does not lose
/// information is accepted.
pub trait AsValue {
    /// Typed null of the corresponding variant.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse the textual representation returned by a driver.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input.as_ref()),
            any::type_name::<Self>()
        )))
    }
}

fn integer_of(value: &Value) -> Option<i128> {
    Some(match value {
        Value::Int8(Some(v)) => *v as _,
        Value::Int16(Some(v)) => *v as _,
        Value::Int32(Some(v)) => *v as _,
        Value::Int64(Some(v)) => *v as _,
        Value::UInt8(Some(v)) => *v as _,
        Value::UInt16(Some(v)) => *v as _,
        Value::UInt32(Some(v)) => *v as _,
        Value::UInt64(Some(v)) => *v as _,
        _ => return None,
    })
}

fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Varchar(Some(v)) => Some(Cow::Borrowed(v)),
        Value::Blob(Some(v)) => std::str::from_utf8(v).ok().map(Cow::Borrowed),
        _ => None,
    }
}

fn cannot_convert<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

fn parse_with<T: FromStr>(input: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    input.trim().parse::<T>().with_context(|| {
        format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input),
            any::type_name::<T>()
        )
    })
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $destination(Some(v)) = value {
                    return Ok(v);
                }
                let wide = match &value {
                    Value::Decimal(Some(v)) if v.is_integer() => v.to_i128(),
                    Value::Boolean(Some(v)) => Some(*v as i128),
                    v => integer_of(v),
                };
                if let Some(v) = wide {
                    return <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Value {v} is out of range for {}",
                            any::type_name::<Self>(),
                        ))
                    });
                }
                match text_of(&value) {
                    Some(text) => <Self as AsValue>::parse(text),
                    None => Err(cannot_convert::<Self>(&value)),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                parse_with(input.as_ref())
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

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path, $to:ident) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    Value::Float32(Some(v)) => Ok(v as _),
                    Value::Float64(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v)) => v
                        .$to()
                        .ok_or_else(|| cannot_convert::<Self>(&Value::Decimal(Some(v)))),
                    ref v => {
                        if let Some(v) = integer_of(v) {
                            return Ok(v as _);
                        }
                        match text_of(v) {
                            Some(text) => <Self as AsValue>::parse(text),
                            None => Err(cannot_convert::<Self>(v)),
                        }
                    }
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                parse_with(input.as_ref())
            }
        }
    };
}
impl_as_value_float!(f32, Value::Float32, to_f32);
impl_as_value_float!(f64, Value::Float64, to_f64);

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
        if let Some(v) = integer_of(&value) {
            return Ok(v != 0);
        }
        match text_of(&value) {
            Some(text) => <Self as AsValue>::parse(text),
            None => Err(cannot_convert::<Self>(&value)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        match input.as_ref().trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            v if v.eq_ignore_ascii_case("true") => Ok(true),
            v if v.eq_ignore_ascii_case("false") => Ok(false),
            v => Err(Error::msg(format!(
                "Cannot parse `{}` as bool",
                truncate_long!(v)
            ))),
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
        match value {
            Value::Decimal(Some(v)) => Ok(v),
            Value::Float32(Some(v)) => Decimal::try_from(v).map_err(Into::into),
            Value::Float64(Some(v)) => Decimal::try_from(v).map_err(Into::into),
            ref v => {
                if let Some(v) = integer_of(v) {
                    return Decimal::try_from_i128_with_scale(v, 0).map_err(Into::into);
                }
                match text_of(v) {
                    Some(text) => <Self as AsValue>::parse(text),
                    None => Err(cannot_convert::<Self>(v)),
                }
            }
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_with(input.as_ref())
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Blob(Some(v)) => String::from_utf8(v.into_vec())
                .map_err(|e| Error::new(e).context("Blob value is not valid UTF-8 text")),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            v => Err(cannot_convert::<Self>(&v)),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        Ok(input.as_ref().into())
    }
}

impl AsValue for Box<[u8]> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v),
            Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
            v => Err(cannot_convert::<Self>(&v)),
        }
    }
}

static DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
static TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]");
static TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            ref v => match text_of(v) {
                Some(text) => <Self as AsValue>::parse(text),
                None => Err(cannot_convert::<Self>(v)),
            },
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        Date::parse(input, DATE_FORMAT)
            .with_context(|| format!("Cannot parse `{}` as Date", truncate_long!(input)))
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            ref v => match text_of(v) {
                Some(text) => <Self as AsValue>::parse(text),
                None => Err(cannot_convert::<Self>(v)),
            },
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim();
        Time::parse(input, TIME_FORMAT)
            .with_context(|| format!("Cannot parse `{}` as Time", truncate_long!(input)))
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::Date(Some(v)) => Ok(v.midnight()),
            ref v => match text_of(v) {
                Some(text) => <Self as AsValue>::parse(text),
                None => Err(cannot_convert::<Self>(v)),
            },
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let input = input.as_ref().trim().replacen('T', " ", 1);
        PrimitiveDateTime::parse(&input, TIMESTAMP_FORMAT)
            .with_context(|| format!("Cannot parse `{}` as Timestamp", truncate_long!(input)))
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Blob(Some(ref v)) if v.len() == 16 => Ok(Uuid::from_slice(v)?),
            ref v => match text_of(v) {
                Some(text) => <Self as AsValue>::parse(text),
                None => Err(cannot_convert::<Self>(v)),
            },
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_with(input.as_ref())
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
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        T::parse(input).map(Some)
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_empty_value() -> Value {
        Value::List(None, Box::new(T::as_empty_value()))
    }
    fn as_value(self) -> Value {
        Value::List(
            Some(self.into_iter().map(AsValue::as_value).collect()),
            Box::new(T::as_empty_value()),
        )
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(Some(v), ..) => v.into_iter().map(T::try_from_value).collect(),
            v => Err(cannot_convert::<Self>(&v)),
        }
    }
}

macro_rules! impl_from_as_value {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    value.as_value()
                }
            }
        )+
    };
}
impl_from_as_value!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    Box<[u8]>,
    Date,
    Time,
    PrimitiveDateTime,
    Uuid,
);

impl<T: AsValue> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.as_value()
    }
}

impl<T: AsValue> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}
