use crate::ValueWrap;
use mysql_async::{Column, FromRowError, consts::ColumnType, prelude::FromRow};
use rust_decimal::Decimal;
use sqldb_core::{RowLabeled, RowNames, Value};

/// Character set id MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

pub(crate) struct RowWrap(pub(crate) RowLabeled);

impl FromRow for RowWrap {
    fn from_row_opt(mut row: mysql_async::Row) -> Result<Self, FromRowError>
    where
        Self: Sized,
    {
        let columns = row.columns();
        let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
        let mut values = Vec::with_capacity(row.len());
        for (i, column) in columns.iter().enumerate() {
            match row.take_opt::<ValueWrap, _>(i) {
                Some(Ok(v)) => values.push(refine(v.0, column)),
                _ => return Err(FromRowError(row)),
            }
        }
        Ok(RowWrap(RowLabeled::new(names, values.into_boxed_slice())))
    }
}

/// Narrow the protocol value using the column metadata: text columns come as
/// bytes, decimals as their textual form and dates as datetimes.
fn refine(value: Value, column: &Column) -> Value {
    match (value, column.column_type()) {
        (
            Value::Blob(Some(v)),
            ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL,
        ) => match std::str::from_utf8(&v).ok().and_then(|v| v.parse::<Decimal>().ok()) {
            Some(decimal) => Value::Decimal(Some(decimal)),
            None => Value::Blob(Some(v)),
        },
        (Value::Blob(Some(v)), _) if column.character_set() != BINARY_CHARSET => {
            match String::from_utf8(v.into_vec()) {
                Ok(text) => Value::Varchar(Some(text)),
                Err(e) => Value::Blob(Some(e.into_bytes().into())),
            }
        }
        (Value::Timestamp(Some(v)), ColumnType::MYSQL_TYPE_DATE) => Value::Date(Some(v.date())),
        (value, _) => value,
    }
}
