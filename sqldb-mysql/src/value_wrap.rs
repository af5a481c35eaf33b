use mysql_async::{FromValueError, prelude::FromValue};
use sqldb_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => Value::Blob(Some(v.into())),
            mysql_async::Value::Int(v) => Value::Int64(Some(v)),
            mysql_async::Value::UInt(v) => Value::UInt64(Some(v)),
            mysql_async::Value::Float(v) => Value::Float32(Some(v)),
            mysql_async::Value::Double(v) => Value::Float64(Some(v)),
            mysql_async::Value::Date(year, month, day, hour, minute, second, microsecond) => {
                let date = Month::try_from(month)
                    .and_then(|month| Date::from_calendar_date(year as _, month, day));
                let time = Time::from_hms_micro(hour, minute, second, microsecond);
                match (date, time) {
                    (Ok(date), Ok(time)) => Value::Timestamp(Some(PrimitiveDateTime::new(date, time))),
                    _ => return Err(FromValueError(value)),
                }
            }
            mysql_async::Value::Time(false, 0, hours, minutes, seconds, microseconds) => {
                match Time::from_hms_micro(hours, minutes, seconds, microseconds) {
                    Ok(v) => Value::Time(Some(v)),
                    Err(..) => return Err(FromValueError(value)),
                }
            }
            // Negative or longer than a day, not a time of day
            mysql_async::Value::Time(..) => return Err(FromValueError(value)),
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        Ok(match value.0 {
            ref v if v.is_null() => MySQLValue::NULL,
            Value::Boolean(Some(v)) => MySQLValue::from(v),
            Value::Int8(Some(v)) => MySQLValue::from(v),
            Value::Int16(Some(v)) => MySQLValue::from(v),
            Value::Int32(Some(v)) => MySQLValue::from(v),
            Value::Int64(Some(v)) => MySQLValue::from(v),
            Value::UInt8(Some(v)) => MySQLValue::from(v),
            Value::UInt16(Some(v)) => MySQLValue::from(v),
            Value::UInt32(Some(v)) => MySQLValue::from(v),
            Value::UInt64(Some(v)) => MySQLValue::from(v),
            Value::Float32(Some(v)) => MySQLValue::from(v),
            Value::Float64(Some(v)) => MySQLValue::from(v),
            Value::Decimal(Some(v)) => MySQLValue::from(v),
            Value::Varchar(Some(v)) => MySQLValue::Bytes(v.into_bytes()),
            Value::Blob(Some(v)) => MySQLValue::Bytes(v.into_vec()),
            Value::Date(Some(v)) => MySQLValue::from(v),
            Value::Time(Some(v)) => MySQLValue::from(v),
            Value::Timestamp(Some(v)) => {
                let year = v.year();
                if !(0..=9999).contains(&year) {
                    return Err(Error::msg(format!("Date {v} is out of range for MySQL")));
                }
                MySQLValue::Date(
                    year as _,
                    v.month().into(),
                    v.day(),
                    v.hour(),
                    v.minute(),
                    v.second(),
                    v.microsecond(),
                )
            }
            Value::Uuid(Some(v)) => MySQLValue::Bytes(v.hyphenated().to_string().into_bytes()),
            v => {
                return Err(Error::msg(format!(
                    "Value {v:?} cannot be bound to a MySQL parameter"
                )));
            }
        })
    }
}
