use rust_decimal::Decimal;
use sqldb_core::{Error, Result, Value};
use std::borrow::Cow;
use tiberius::{ColumnData, FromSql, IntoSql};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// A bound parameter, checked to fit a SQL Server type.
#[derive(Default, Debug)]
pub(crate) struct ValueWrap(pub(crate) Value);

impl TryFrom<Value> for ValueWrap {
    type Error = Error;
    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::UInt64(Some(v)) if i64::try_from(v).is_err() => Err(Error::msg(format!(
                "{v} does not fit the range of BIGINT"
            ))),
            Value::List(..) => Err(Error::msg(
                "A list cannot be bound on SQL Server, it must be rendered inline",
            )),
            v => Ok(Self(v)),
        }
    }
}

impl<'a> IntoSql<'a> for ValueWrap {
    fn into_sql(self) -> ColumnData<'a> {
        match self.0 {
            Value::Boolean(v) => ColumnData::Bit(v),
            Value::Int8(v) => ColumnData::I16(v.map(Into::into)),
            Value::Int16(v) => ColumnData::I16(v),
            Value::Int32(v) => ColumnData::I32(v),
            Value::Int64(v) => ColumnData::I64(v),
            Value::UInt8(v) => ColumnData::U8(v),
            Value::UInt16(v) => ColumnData::I32(v.map(Into::into)),
            Value::UInt32(v) => ColumnData::I64(v.map(Into::into)),
            Value::UInt64(v) => ColumnData::I64(v.map(|v| v as i64)),
            Value::Float32(v) => ColumnData::F32(v),
            Value::Float64(v) => ColumnData::F64(v),
            Value::Decimal(Some(v)) => v.into_sql(),
            Value::Decimal(None) => ColumnData::Numeric(None),
            Value::Varchar(v) => ColumnData::String(v.map(Cow::Owned)),
            Value::Blob(v) => ColumnData::Binary(v.map(|v| Cow::Owned(v.into_vec()))),
            Value::Date(Some(v)) => v.into_sql(),
            Value::Date(None) => ColumnData::Date(None),
            Value::Time(Some(v)) => v.into_sql(),
            Value::Time(None) => ColumnData::Time(None),
            Value::Timestamp(Some(v)) => v.into_sql(),
            Value::Timestamp(None) => ColumnData::DateTime2(None),
            Value::Uuid(v) => ColumnData::Guid(v),
            Value::Null | Value::List(..) => ColumnData::String(None),
        }
    }
}

/// Convert a column of a result row.
pub(crate) fn column_value(data: ColumnData<'static>) -> Result<Value> {
    Ok(match data {
        ColumnData::U8(v) => Value::UInt8(v),
        ColumnData::I16(v) => Value::Int16(v),
        ColumnData::I32(v) => Value::Int32(v),
        ColumnData::I64(v) => Value::Int64(v),
        ColumnData::F32(v) => Value::Float32(v),
        ColumnData::F64(v) => Value::Float64(v),
        ColumnData::Bit(v) => Value::Boolean(v),
        ColumnData::String(v) => Value::Varchar(v.map(Cow::into_owned)),
        ColumnData::Guid(v) => Value::Uuid(v),
        ColumnData::Binary(v) => Value::Blob(v.map(|v| v.into_owned().into_boxed_slice())),
        ColumnData::Numeric(v) => Value::Decimal(
            v.map(|v| {
                Decimal::try_from_i128_with_scale(v.value(), v.scale() as u32).map_err(|e| {
                    Error::new(e).context(format!("Numeric {v} does not fit a decimal"))
                })
            })
            .transpose()?,
        ),
        ColumnData::Xml(v) => Value::Varchar(v.map(|v| v.into_owned().into_string())),
        data @ ColumnData::Date(..) => Value::Date(Date::from_sql(&data)?),
        data @ ColumnData::Time(..) => Value::Time(Time::from_sql(&data)?),
        data @ (ColumnData::DateTime(..)
        | ColumnData::SmallDateTime(..)
        | ColumnData::DateTime2(..)) => Value::Timestamp(PrimitiveDateTime::from_sql(&data)?),
        data @ ColumnData::DateTimeOffset(..) => Value::Timestamp(
            OffsetDateTime::from_sql(&data)?
                .map(|v| v.to_offset(UtcOffset::UTC))
                .map(|v| PrimitiveDateTime::new(v.date(), v.time())),
        ),
    })
}
