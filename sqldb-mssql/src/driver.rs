use crate::{MSSQLConnection, MSSQLPrepared, MSSQLSqlWriter, MSSQLTransaction};
use sqldb_core::Driver;

#[derive(Debug, Clone, Copy, Default)]
pub struct MSSQLDriver;
impl MSSQLDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MSSQLDriver {
    type Connection = MSSQLConnection;
    type Transaction = MSSQLTransaction;
    type SqlWriter = MSSQLSqlWriter;
    type Prepared = MSSQLPrepared;

    const NAME: &'static str = "sqlserver";
    fn sql_writer(&self) -> Self::SqlWriter {
        MSSQLSqlWriter::default()
    }
}
